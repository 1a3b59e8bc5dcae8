use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::tasks::model::{CreateTask, Task, UpdateTask};

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let tasks = state.tasks().list().await;
    info!(count = tasks.len(), "Fetching all tasks");
    Json(tasks)
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    let Some(title) = req.title.filter(|t| !t.is_empty()) else {
        warn!("Task creation failed - missing title");
        return Err(ApiError::bad_request("Title is required"));
    };

    let task = state
        .tasks()
        .create(title, req.description.unwrap_or_default())
        .await;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    // A body sent without a JSON content type is read as an empty patch.
    let patch = match payload {
        Ok(Json(patch)) => Ok(patch),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(UpdateTask::default()),
        Err(rejection) => Err(rejection),
    };

    let known = match parse_id(&id) {
        Some(uuid) => state.tasks().contains(uuid).await.then_some(uuid),
        None => None,
    };
    let updated = match known {
        Some(uuid) => state.tasks().update(uuid, patch?).await,
        None => None,
    };
    match updated {
        Some(task) => Ok(Json(task)),
        None => {
            warn!(taskId = %id, "Task update failed - not found");
            Err(ApiError::not_found("Task not found"))
        }
    }
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let removed = match parse_id(&id) {
        Some(uuid) => state.tasks().delete(uuid).await,
        None => None,
    };
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => {
            warn!(taskId = %id, "Task deletion failed - not found");
            Err(ApiError::not_found("Task not found"))
        }
    }
}

// Malformed ids cannot match any task, so they share the not-found path.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}
