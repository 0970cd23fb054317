use actix_web::{HttpResponse, Responder};

// Health check endpoint for the service itself
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("OK")
}
