use actix_web::{HttpResponse, web};
use log::info;

use crate::errors::ApiError;
use crate::models::check::{CheckEnvelope, CheckRequest};
use crate::state::AppState;

// Run the liveness check for a domain
//
// The body is parsed by hand rather than through the Json extractor so that
// an unreadable body comes back as the endpoint's own 500 envelope instead of
// the framework's default 400.
pub async fn check_domain(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request: CheckRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("Invalid request body: {}", e)))?;

    let domain = request.domain.trim().to_string();
    if domain.is_empty() {
        return Err(ApiError::Internal("Empty domain in request body".to_string()));
    }

    info!("Liveness check requested for domain: {}", domain);
    let verdict = data.liveness.check(&domain).await;
    info!(
        "Liveness check for {} finished: {}",
        domain,
        if verdict.is_online { "online" } else { "offline" }
    );

    Ok(HttpResponse::Ok().json(CheckEnvelope::completed(verdict.is_online)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    macro_rules! check_app {
        () => {{
            let state = web::Data::new(AppState::new().unwrap());
            test::init_service(
                App::new()
                    .app_data(state)
                    .route("/api/domains/check", web::post().to(check_domain)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn malformed_body_yields_the_error_envelope() {
        let app = check_app!();
        let req = test::TestRequest::post()
            .uri("/api/domains/check")
            .set_payload("not json")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 500);
        assert!(body["data"].is_null());
    }

    #[actix_web::test]
    async fn missing_domain_field_yields_the_error_envelope() {
        let app = check_app!();
        let req = test::TestRequest::post()
            .uri("/api/domains/check")
            .set_json(serde_json::json!({ "hostname": "example.com" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
