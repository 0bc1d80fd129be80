use serde::{Deserialize, Serialize};

use crate::projects::repo::{Project, ProjectStatus};

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

/// Untrusted list parameters; clamping happens in [`crate::pagination::Page`].
#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Project,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
    pub page: i64,
    pub total_pages: i64,
    pub total_projects: i64,
}
