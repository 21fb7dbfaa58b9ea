use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, HealthResponse, PetCreatedRequest, PetCreatedResponse, PotentialMatchResponse,
    PotentialMatchesQuery, PotentialMatchesResponse,
};
use crate::services::{DiscoveryError, DiscoveryService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub discovery: DiscoveryService,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/pets/created", web::post().to(pet_created))
        .route("/pets/{pet_id}/potential-matches", web::get().to(potential_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn discovery_error_response(err: DiscoveryError) -> HttpResponse {
    match err {
        DiscoveryError::PetNotFound(pet_id) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Pet not found".to_string(),
            message: format!("No pet with id {}", pet_id),
            status_code: 404,
        }),
        DiscoveryError::Repository(e) => {
            tracing::error!("Pet directory failure: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Pet directory unavailable".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

/// Potential matches endpoint
///
/// GET /api/v1/pets/{petId}/potential-matches?purpose=Breeding
///
/// Results are ranked closest first. Each result notifies the matched pet's owner.
async fn potential_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PotentialMatchesQuery>,
) -> impl Responder {
    let pet_id = path.into_inner();

    match state.discovery.discover(&pet_id, query.purpose).await {
        Ok(outcome) => HttpResponse::Ok().json(PotentialMatchesResponse {
            pet_id,
            matches: outcome.matches.into_iter().map(PotentialMatchResponse::from).collect(),
            total_candidates: outcome.total_candidates,
            notifications_sent: outcome.notifications_sent,
        }),
        Err(e) => discovery_error_response(e),
    }
}

/// Pet created hook
///
/// POST /api/v1/pets/created
///
/// Request body:
/// ```json
/// { "petId": "string" }
/// ```
async fn pet_created(
    state: web::Data<AppState>,
    req: web::Json<PetCreatedRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.discovery.announce_new_pet(&req.pet_id).await {
        Ok(outcome) => HttpResponse::Ok().json(PetCreatedResponse {
            pet_id: req.pet_id.clone(),
            pets_scanned: outcome.pets_scanned,
            notifications_sent: outcome.notifications_sent,
        }),
        Err(e) => discovery_error_response(e),
    }
}
