use actix_web::{HttpResponse, web};
use log::info;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    domain: Option<String>,
}

// Run both raw probes for a domain and return the report verbatim
pub async fn debug_check(
    data: web::Data<AppState>,
    query: web::Query<DebugQuery>,
) -> Result<HttpResponse, ApiError> {
    let domain = match query.domain.as_deref().map(str::trim) {
        Some(domain) if !domain.is_empty() => domain.to_string(),
        _ => {
            return Err(ApiError::InvalidInput(
                "Missing domain parameter".to_string(),
            ));
        }
    };

    info!("Diagnostic check requested for domain: {}", domain);
    let report = data.diagnostics.diagnose(&domain).await;

    Ok(HttpResponse::Ok().json(report))
}
