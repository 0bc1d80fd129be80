use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tasks::repo::{Task, TaskStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub project_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_wire_field_names() {
        let body = serde_json::json!({
            "title": "T1",
            "description": "first task",
            "status": "todo",
            "dueDate": "2026-09-01T00:00:00Z",
            "projectId": "6e1f5d2e-8f5a-4f7e-9b0a-1c2d3e4f5a6b"
        });
        let req: CreateTaskRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.title, "T1");
        assert_eq!(req.status, Some(TaskStatus::Todo));
        assert!(req.due_date.is_some());
    }

    #[test]
    fn update_request_fields_are_all_optional() {
        let req: UpdateTaskRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.title.is_none());
        assert!(req.description.is_none());
        assert!(req.status.is_none());
        assert!(req.due_date.is_none());
    }
}
