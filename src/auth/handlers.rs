use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest},
        password::{hash_password, verify_dummy_password, verify_password},
    },
    error::{AppError, AppResult},
    state::AppState,
    users::repo_types::{NewUser, PublicUser, User},
    validation,
};

/// Same text for unknown email, wrong password and disabled account.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let Json(payload) = payload?;

    let email = validation::email(&payload.email).map_err(|e| {
        warn!(email = %payload.email, "invalid email");
        e
    })?;
    validation::password(&payload.password)?;
    let name = validation::name(&payload.name)?;

    let password_hash = hash_password(&payload.password)?;

    let user = state
        .store
        .create(NewUser {
            email,
            password_hash,
            name,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create user failed");
            AppError::from(e)
        })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;

    let email = validation::email(&payload.email)?;
    if payload.password.is_empty() {
        return Err(AppError::Validation("password is required".into()));
    }

    let user = match state.store.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            verify_dummy_password(&payload.password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        e
    })?;

    if !ok {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    if !user.is_active {
        warn!(user_id = user.id, "login for inactive account");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let response = issue_tokens(&state, &user)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;

    let claims = state
        .keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| {
            warn!(error = %e, "refresh rejected");
            AppError::Unauthorized("invalid or expired token".into())
        })?;

    let user = state
        .store
        .find_by_id(claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            warn!(user_id = claims.sub, "refresh for missing or inactive user");
            AppError::Unauthorized("user not found".into())
        })?;

    Ok(Json(issue_tokens(&state, &user)?))
}

fn issue_tokens(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        e
    })?;
    let refresh_token = state.keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        e
    })?;
    Ok(AuthResponse {
        token,
        refresh_token,
        user: PublicUser::from(user),
    })
}
