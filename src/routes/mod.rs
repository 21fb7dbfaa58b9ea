// Route exports
pub mod matches;

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(web::scope("/api/v1").configure(matches::configure));
}

fn bad_request(error: &str, message: String) -> actix_web::Error {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.clone(),
        status_code: 400,
    };
    error::InternalError::from_response(message, HttpResponse::BadRequest().json(body)).into()
}

/// Malformed bodies come back as an `ErrorResponse` instead of plain text
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        tracing::info!("Rejected JSON body on {}: {}", req.path(), err);
        bad_request("invalid_json", format!("Invalid JSON: {}", err))
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req: &HttpRequest| {
        tracing::info!("Rejected query on {}: {}", req.path(), err);
        bad_request("invalid_query", format!("Invalid query: {}", err))
    })
}
