use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// A task carries no owner of its own; its effective owner is always the
/// owner of its parent project, re-derived by a join on every access.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub project_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Partial update with the same falsy-ignore rule as projects: `None` and
/// empty strings both leave the stored value unchanged.
#[derive(Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<OffsetDateTime>,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl TaskPatch {
    pub fn normalized(self) -> Self {
        Self {
            title: none_if_empty(self.title),
            description: none_if_empty(self.description),
            status: self.status,
            due_date: self.due_date,
        }
    }
}

impl Task {
    /// The caller must already have resolved the project through an
    /// ownership-scoped lookup; no owner is stored here.
    pub async fn create(
        db: &PgPool,
        project_id: Uuid,
        title: &str,
        description: &str,
        status: TaskStatus,
        due_date: Option<OffsetDateTime>,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, due_date, project_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, project_id, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(due_date)
        .bind(project_id)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn list_by_project(
        db: &PgPool,
        project_id: Uuid,
        status: Option<TaskStatus>,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, project_id, created_at
            FROM tasks
            WHERE project_id = $1
              AND ($2::task_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .bind(status)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Cross-project query: every row is still filtered through the parent
    /// project's owner, so orphaned tasks and other users' tasks never
    /// appear.
    pub async fn list_by_status(
        db: &PgPool,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.due_date, t.project_id, t.created_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.owner_id = $1 AND t.status = $2
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(status)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Bare-id lookup always dereferences the parent project and checks its
    /// owner; a task under someone else's (or a deleted) project is `None`.
    pub async fn find_owned(db: &PgPool, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.due_date, t.project_id, t.created_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1 AND p.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    pub async fn update_owned(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> anyhow::Result<Option<Task>> {
        let patch = patch.normalized();
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks t
            SET title = COALESCE($3, t.title),
                description = COALESCE($4, t.description),
                status = COALESCE($5, t.status),
                due_date = COALESCE($6, t.due_date)
            FROM projects p
            WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2
            RETURNING t.id, t.title, t.description, t.status, t.due_date, t.project_id, t.created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.status)
        .bind(patch.due_date)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    pub async fn delete_owned(db: &PgPool, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING projects p
            WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Todo).unwrap(), "\"todo\"");
        let parsed: TaskStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(parsed, TaskStatus::Done);
    }

    #[test]
    fn patch_drops_empty_strings_but_keeps_due_date() {
        let due = OffsetDateTime::now_utc();
        let patch = TaskPatch {
            title: Some("".into()),
            description: Some("updated".into()),
            status: None,
            due_date: Some(due),
        }
        .normalized();
        assert!(patch.title.is_none());
        assert_eq!(patch.description.as_deref(), Some("updated"));
        assert_eq!(patch.due_date, Some(due));
    }
}
