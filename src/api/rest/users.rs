use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{ValidJson, ValidPath};
use crate::auth::policy::{require_role, ADMIN_ONLY};
use crate::auth::Caller;
use crate::error::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;
use crate::store::users::ProfilePatch;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/user", get(current_user).patch(update_profile))
        .route("/api/users", get(list_users))
        .route("/api/users/:id/role", patch(update_role))
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

async fn current_user(Caller(user): Caller) -> Json<User> {
    Json(user)
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidJson(payload): ValidJson<ProfilePatch>,
) -> Result<Json<User>, AppError> {
    let updated = state.users.update_profile(user.id, payload)?;
    Ok(Json(updated))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> Result<Json<Vec<User>>, AppError> {
    require_role(&user, ADMIN_ONLY)?;
    Ok(Json(state.users.list()))
}

async fn update_role(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateRoleRequest>,
) -> Result<Json<User>, AppError> {
    require_role(&user, ADMIN_ONLY)?;

    let updated = state.users.set_role(id, payload.role)?;
    tracing::info!(user_id = %id, role = ?payload.role, changed_by = %user.id, "user role changed");
    Ok(Json(updated))
}
