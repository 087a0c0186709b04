//! Authentication handlers.

use actix_web::{HttpResponse, web};

use tripgenius_core::domain::{User, mask_email};
use tripgenius_core::error::RepoError;
use tripgenius_core::ports::AuthError;
use tripgenius_shared::dto::{AuthResponse, LoginRequest, SignupRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;
const DUPLICATE_EMAIL: &str = "Email already registered";

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.email, &user.name)?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        user: user_response(user),
    })
}

fn validate_signup(req: &SignupRequest) -> AppResult<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_signup(&req)?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::BadRequest(DUPLICATE_EMAIL.to_string()));
    }

    let passwords = state.passwords.clone();
    let password = req.password;
    let password_hash = web::block(move || passwords.hash(&password)).await??;
    let user = User::new(req.name, &req.email, password_hash);

    // A concurrent signup may have won the race since the lookup above.
    let user = state.users.save(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::BadRequest(DUPLICATE_EMAIL.to_string()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %user.id, email = %mask_email(&user.email), "User signed up");
    Ok(HttpResponse::Created().json(auth_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let passwords = state.passwords.clone();
    let stored_hash = user.password_hash.clone();
    let password = req.password;
    let matches = web::block(move || passwords.verify(&password, &stored_hash)).await??;

    if !matches {
        tracing::info!(email = %mask_email(&user.email), "Failed login attempt");
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(HttpResponse::Ok().json(auth_response(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(email = %mask_email(&identity.email), "Token refers to a deleted user");
            AppError::NotFound("User no longer exists".to_string())
        })?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}
