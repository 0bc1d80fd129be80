use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Partial update; `None` leaves the stored value unchanged. Empty strings
/// are normalized to `None` before they reach SQL, so an explicit empty
/// title or description is silently ignored rather than applied.
#[derive(Debug, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl ProjectPatch {
    pub fn normalized(self) -> Self {
        Self {
            title: none_if_empty(self.title),
            description: none_if_empty(self.description),
            status: self.status,
        }
    }
}

impl Project {
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
        status: ProjectStatus,
    ) -> anyhow::Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, status, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, owner_id, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(owner_id)
        .fetch_one(db)
        .await?;
        Ok(project)
    }

    /// Count of the owner's projects matching the (pre-escaped) search term
    /// and status filter, ignoring pagination.
    pub async fn count_for_owner(
        db: &PgPool,
        owner_id: Uuid,
        search: Option<&str>,
        status: Option<ProjectStatus>,
    ) -> anyhow::Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM projects
            WHERE owner_id = $1
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
              AND ($3::project_status IS NULL OR status = $3)
            "#,
        )
        .bind(owner_id)
        .bind(search)
        .bind(status)
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    pub async fn list_for_owner(
        db: &PgPool,
        owner_id: Uuid,
        search: Option<&str>,
        status: Option<ProjectStatus>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, status, owner_id, created_at
            FROM projects
            WHERE owner_id = $1
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
              AND ($3::project_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(owner_id)
        .bind(search)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Absent and not-owned are indistinguishable on purpose: both come back
    /// as `None` so another user's project never leaks its existence.
    pub async fn find_owned(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, status, owner_id, created_at
            FROM projects
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(project)
    }

    pub async fn update_owned(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        patch: ProjectPatch,
    ) -> anyhow::Result<Option<Project>> {
        let patch = patch.normalized();
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status)
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, status, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.status)
        .fetch_optional(db)
        .await?;
        Ok(project)
    }

    /// Removes the project only. Its tasks are deliberately left behind;
    /// they become unreachable because every task read joins back through
    /// an owned project.
    pub async fn delete_owned(db: &PgPool, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM projects
            WHERE id = $1 AND owner_id = $2
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
    fn patch_drops_empty_strings() {
        let patch = ProjectPatch {
            title: Some("".into()),
            description: Some("   ".into()),
            status: Some(ProjectStatus::Completed),
        }
        .normalized();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert_eq!(patch.status, Some(ProjectStatus::Completed));
    }

    #[test]
    fn patch_keeps_present_values() {
        let patch = ProjectPatch {
            title: Some("New title".into()),
            description: None,
            status: None,
        }
        .normalized();
        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert!(patch.description.is_none());
        assert!(patch.status.is_none());
    }

    #[test]
    fn status_uses_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Active).unwrap(),
            "\"active\""
        );
        let parsed: ProjectStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Completed);
    }
}
