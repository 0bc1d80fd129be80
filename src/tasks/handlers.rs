use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::projects::repo::Project;
use crate::state::AppState;
use crate::tasks::dto::{
    CreateTaskRequest, StatusFilterParams, TaskListResponse, TaskResponse, UpdateTaskRequest,
};
use crate::tasks::repo::{Task, TaskPatch, TaskStatus};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/project/:project_id", get(tasks_by_project))
        .route("/tasks/status", get(tasks_by_status))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(ApiError::Validation("Description is required".into()));
    }

    // The parent reference is untrusted input: a task may only be created
    // under a project the caller owns.
    Project::find_owned(&state.db, user.0.id, payload.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;

    let task = Task::create(
        &state.db,
        payload.project_id,
        title,
        description,
        payload.status.unwrap_or(TaskStatus::Todo),
        payload.due_date,
    )
    .await?;

    info!(task_id = %task.id, project_id = %task.project_id, "task created");
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            task,
        }),
    ))
}

#[instrument(skip(state, user, params), fields(user_id = %user.0.id))]
async fn tasks_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Query(params): Query<StatusFilterParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let project = Project::find_owned(&state.db, user.0.id, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;

    let tasks = Task::list_by_project(&state.db, project.id, params.status).await?;
    Ok(Json(TaskListResponse {
        success: true,
        tasks,
    }))
}

#[instrument(skip(state, user, params), fields(user_id = %user.0.id))]
async fn tasks_by_status(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<StatusFilterParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let status = params
        .status
        .ok_or_else(|| ApiError::Validation("Status is required".into()))?;

    let tasks = Task::list_by_status(&state.db, user.0.id, status).await?;
    Ok(Json(TaskListResponse {
        success: true,
        tasks,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = Task::find_owned(&state.db, user.0.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;
    Ok(Json(TaskResponse {
        success: true,
        task,
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let patch = TaskPatch {
        title: payload.title,
        description: payload.description,
        status: payload.status,
        due_date: payload.due_date,
    };
    let task = Task::update_owned(&state.db, user.0.id, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    info!(task_id = %task.id, "task updated");
    Ok(Json(TaskResponse {
        success: true,
        task,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = Task::delete_owned(&state.db, user.0.id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".into()));
    }

    info!(task_id = %id, "task deleted");
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Task deleted" }),
    ))
}
