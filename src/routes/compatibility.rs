use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::core::compatibility::assess_compatibility;
use crate::core::personality::QUESTIONS;
use crate::models::{
    ErrorResponse, HealthResponse, RankCompanionsRequest, RankCompanionsResponse,
    ScoreProfilesRequest, SubmitAnswersRequest,
};
use crate::routes::{authenticate, AppState};
use crate::services::ProfileServiceError;

/// Configure personality and compatibility routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/personality/questions", web::get().to(list_questions))
        .route("/personality/results", web::post().to(submit_results))
        .route("/personality/results/me", web::get().to(get_own_result))
        .route("/compatibility/score", web::post().to(score_profiles))
        .route("/compatibility/{other_user_id}", web::get().to(get_compatibility))
        .route("/companions/rank", web::post().to(rank_companions));
}

fn store_failure(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    HttpResponse::ServiceUnavailable().json(ErrorResponse::new(context, e.to_string(), 503))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.profiles.store().health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/personality/questions
async fn list_questions() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "questions": QUESTIONS,
        "scale": { "min": 1, "max": 5 },
    }))
}

/// Submit questionnaire answers
///
/// POST /api/v1/personality/results
///
/// Request body:
/// ```json
/// {
///   "answers": [{ "questionId": 1, "value": 4 }]
/// }
/// ```
async fn submit_results(
    state: web::Data<AppState>,
    req: web::Json<SubmitAnswersRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match authenticate(&http_req, &state.verifier) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    match state.profiles.submit(&claims.sub, &req.answers).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(ProfileServiceError::InvalidAnswers(e)) => {
            tracing::info!("Rejected answers from {}: {}", claims.sub, e);
            HttpResponse::BadRequest().json(ErrorResponse::new("Invalid answers", e.to_string(), 400))
        }
        Err(ProfileServiceError::Store(e)) => store_failure("Failed to store personality result", e),
    }
}

/// GET /api/v1/personality/results/me
async fn get_own_result(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let claims = match authenticate(&http_req, &state.verifier) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    match state.profiles.result(&claims.sub).await {
        Ok(Some(result)) => HttpResponse::Ok().json(result),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "Not found",
            "No personality test taken yet",
            404,
        )),
        Err(e) => store_failure("Failed to fetch personality result", e),
    }
}

/// Score two caller-supplied profiles
///
/// POST /api/v1/compatibility/score
///
/// Request body (either side may be omitted):
/// ```json
/// {
///   "a": { "openness": 50, "conscientiousness": 50, "extraversion": 50, "agreeableness": 50, "neuroticism": 50 },
///   "b": { "openness": 60, "conscientiousness": 40, "extraversion": 70, "agreeableness": 55, "neuroticism": 30 }
/// }
/// ```
async fn score_profiles(req: web::Json<ScoreProfilesRequest>) -> impl Responder {
    HttpResponse::Ok().json(assess_compatibility(req.a.as_ref(), req.b.as_ref()))
}

/// GET /api/v1/compatibility/{other_user_id}
async fn get_compatibility(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match authenticate(&http_req, &state.verifier) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let other_user_id = path.into_inner();

    match state.profiles.compatibility(&claims.sub, &other_user_id).await {
        Ok(report) => {
            tracing::debug!("Compatibility {} <-> {}: {}", claims.sub, other_user_id, report.score);
            HttpResponse::Ok().json(report)
        }
        Err(e) => store_failure("Failed to fetch personality results", e),
    }
}

/// Rank candidate companions
///
/// POST /api/v1/companions/rank
///
/// Request body:
/// ```json
/// {
///   "candidateIds": ["string"],
///   "limit": 20
/// }
/// ```
async fn rank_companions(
    state: web::Data<AppState>,
    req: web::Json<RankCompanionsRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match authenticate(&http_req, &state.verifier) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let own_profile = match state.profiles.profile(&claims.sub).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Failed to fetch own profile for {}, ranking with fallback: {}", claims.sub, e);
            None
        }
    };

    let candidates = state.profiles.candidates(&req.candidate_ids).await;
    let result = state
        .matcher
        .rank(&claims.sub, own_profile.as_ref(), candidates, req.limit as usize);

    tracing::info!(
        "Returning {} companions for user {} (from {} candidates)",
        result.companions.len(),
        claims.sub,
        result.total_candidates
    );

    HttpResponse::Ok().json(RankCompanionsResponse {
        companions: result.companions,
        total_candidates: result.total_candidates,
    })
}
