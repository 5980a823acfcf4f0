use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, RefreshRequest, SessionResponse, SignInRequest};
use crate::routes::{authenticate, AppState};
use crate::services::{AuthError, SessionError, SessionMachine};

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/auth/sign-in", web::post().to(sign_in))
        .route("/auth/refresh", web::post().to(refresh))
        .route("/auth/sign-out", web::post().to(sign_out));
}

fn session_error(e: SessionError) -> HttpResponse {
    match e {
        SessionError::Auth(AuthError::InvalidCredentials) => HttpResponse::Unauthorized()
            .json(ErrorResponse::new("Invalid credentials", "Email or password is incorrect", 401)),
        SessionError::Auth(AuthError::SessionExpired) => HttpResponse::Unauthorized()
            .json(ErrorResponse::new("Session expired", "Please sign in again", 401)),
        other => {
            tracing::error!("Auth provider failure: {}", other);
            HttpResponse::BadGateway().json(ErrorResponse::new("Auth provider error", other.to_string(), 502))
        }
    }
}

fn session_response(machine: SessionMachine) -> HttpResponse {
    let state = machine.state().name().to_string();
    HttpResponse::Ok().json(SessionResponse {
        state,
        session: machine.into_session(),
    })
}

/// POST /api/v1/auth/sign-in
async fn sign_in(state: web::Data<AppState>, req: web::Json<SignInRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let mut machine = SessionMachine::new();
    if let Err(e) = machine.sign_in(&*state.auth, &req.email, &req.password).await {
        return session_error(e);
    }

    session_response(machine)
}

/// POST /api/v1/auth/refresh
async fn refresh(state: web::Data<AppState>, req: web::Json<RefreshRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let mut machine = SessionMachine::new();
    if let Err(e) = machine.restore(&*state.auth, &req.refresh_token).await {
        return session_error(e);
    }

    session_response(machine)
}

/// POST /api/v1/auth/sign-out
async fn sign_out(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let claims = match authenticate(&http_req, &state.verifier) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let token = http_req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    match state.auth.sign_out(token).await {
        Ok(()) => {
            tracing::info!("Signed out user {}", claims.sub);
            HttpResponse::Ok().json(SessionResponse {
                state: "anonymous".to_string(),
                session: None,
            })
        }
        Err(e) => session_error(e.into()),
    }
}
