use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use goaltrack_core::users::{NewUser, User};

use super::extract::{ApiJson, ApiPath};
use crate::{error::ApiResult, main_lib::AppState};

async fn register_user(
    State(state): State<Arc<AppState>>,
    ApiJson(new_user): ApiJson<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    new_user.validate()?;
    let user = state.user_service.register_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&id)?;
    Ok(Json(user))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/{id}", get(get_user))
}
