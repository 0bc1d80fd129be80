use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::pagination::{escape_like, Page};
use crate::projects::dto::{
    CreateProjectRequest, ListProjectsParams, ProjectListResponse, ProjectResponse,
    UpdateProjectRequest,
};
use crate::projects::repo::{Project, ProjectPatch, ProjectStatus};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }

    let project = Project::create(
        &state.db,
        user.0.id,
        title,
        payload.description.as_deref(),
        payload.status.unwrap_or(ProjectStatus::Active),
    )
    .await?;

    info!(project_id = %project.id, "project created");
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            success: true,
            project,
        }),
    ))
}

#[instrument(skip(state, user, params), fields(user_id = %user.0.id))]
async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListProjectsParams>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let page = Page::new(params.page, params.limit);
    // An empty search term matches everything.
    let search = params
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(escape_like);

    let total =
        Project::count_for_owner(&state.db, user.0.id, search.as_deref(), params.status).await?;
    let projects = Project::list_for_owner(
        &state.db,
        user.0.id,
        search.as_deref(),
        params.status,
        page.limit,
        page.offset(),
    )
    .await?;

    Ok(Json(ProjectListResponse {
        success: true,
        projects,
        page: page.number,
        total_pages: page.total_pages(total),
        total_projects: total,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = Project::find_owned(&state.db, user.0.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;
    Ok(Json(ProjectResponse {
        success: true,
        project,
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let patch = ProjectPatch {
        title: payload.title,
        description: payload.description,
        status: payload.status,
    };
    let project = Project::update_owned(&state.db, user.0.id, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;

    info!(project_id = %project.id, "project updated");
    Ok(Json(ProjectResponse {
        success: true,
        project,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = Project::delete_owned(&state.db, user.0.id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Project not found".into()));
    }

    info!(project_id = %id, "project deleted");
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Project deleted" }),
    ))
}
