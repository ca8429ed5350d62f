use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::gate::Identity,
    error::{AppError, AppResult},
    state::AppState,
    users::{
        dto::{MessageResponse, UpdateUserRequest},
        repo_types::{User, UserChanges},
    },
    validation,
};

pub const USER_NOT_FOUND: &str = "user not found";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// Ids that don't parse can't name a record, so they are reported the same
/// way as unknown ones.
fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(USER_NOT_FOUND.into()))
}

fn not_found() -> AppError {
    AppError::NotFound(USER_NOT_FOUND.into())
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id)?;
    let user = state.store.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;

    let name = payload
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let email = match payload.email.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(validation::email(raw)?),
        _ => None,
    };
    let changes = UserChanges { name, email };

    let updated = if changes.is_empty() {
        state.store.find_by_id(id).await?
    } else {
        state.store.update(id, changes).await.map_err(|e| {
            warn!(error = %e, user_id = id, "update user failed");
            AppError::from(e)
        })?
    };
    let user = updated.ok_or_else(not_found)?;

    info!(user_id = user.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(not_found());
    }
    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse {
        message: "user deleted".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = identity.user_id, "token for missing user");
            AppError::Unauthorized(USER_NOT_FOUND.into())
        })?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_maps_garbage_to_not_found() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id(""), Err(AppError::NotFound(_))));
    }
}
