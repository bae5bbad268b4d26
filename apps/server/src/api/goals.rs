use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use goaltrack_core::goals::{GoalDayDto, GoalDto, GoalFilter, GoalProgress, GoalUpdate, NewGoal};
use serde::{Deserialize, Serialize};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::identity::CurrentUser;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
struct ListGoalsQuery {
    #[serde(default)]
    filter: GoalFilter,
}

#[derive(Debug, Serialize)]
struct ToggleResponse {
    completed: bool,
    message: &'static str,
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    ApiQuery(query): ApiQuery<ListGoalsQuery>,
) -> ApiResult<Json<Vec<GoalDto>>> {
    let goals = state.goal_service.list_goals(Some(&user_id), query.filter)?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(new_goal): ApiJson<NewGoal>,
) -> ApiResult<(StatusCode, Json<GoalDto>)> {
    new_goal.validate(state.clock.today())?;
    let goal = state.goal_service.create_goal(&user_id, new_goal).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn get_goal(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<GoalDto>> {
    let goal = state.goal_service.get_goal(&id)?;
    Ok(Json(goal))
}

async fn update_goal(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ApiJson(update): ApiJson<GoalUpdate>,
) -> ApiResult<Json<GoalDto>> {
    update.validate()?;
    let goal = state.goal_service.update_goal(&id, update).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<StatusCode> {
    state.goal_service.delete_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_day(
    ApiPath((id, date)): ApiPath<(String, NaiveDate)>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<ToggleResponse>> {
    let completed = state.goal_service.toggle_day(&id, date).await?;
    let message = if completed {
        "Day marked as completed!"
    } else {
        "Day marked as not completed"
    };
    Ok(Json(ToggleResponse { completed, message }))
}

async fn get_progress(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<GoalProgress>> {
    let progress = state.goal_service.get_goal_progress(&id)?;
    Ok(Json(progress))
}

async fn get_days(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<GoalDayDto>>> {
    let days = state.goal_service.get_goal_days(&id)?;
    Ok(Json(days.into_iter().map(GoalDayDto::from).collect()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/days/{date}/toggle", post(toggle_day))
        .route("/goals/{id}/progress", get(get_progress))
        .route("/goals/{id}/days", get(get_days))
}
