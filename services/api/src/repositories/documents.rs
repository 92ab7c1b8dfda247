//! Document repository for database operations
//!
//! Every query that reads or changes an existing row is scoped to its owner.

use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use sequence::{ToolKind, slugify};

use crate::models::document::DocumentRecord;

const COLUMNS: &str = "id, user_id, tool_slug, story_slug, document_data, is_public, reported, creator_email, created_at, updated_at";

fn from_row(row: PgRow) -> DocumentRecord {
    DocumentRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        tool_slug: row.get("tool_slug"),
        story_slug: row.get("story_slug"),
        document_data: row.get("document_data"),
        is_public: row.get("is_public"),
        reported: row.get("reported"),
        creator_email: row.get("creator_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Document repository for database operations
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new private document. The slug is derived from its title.
    pub async fn insert(
        &self,
        user_id: Uuid,
        creator_email: Option<&str>,
        kind: ToolKind,
        title: &str,
        data: serde_json::Value,
    ) -> Result<DocumentRecord> {
        let now = Utc::now();
        let story_slug = slugify(title, now.timestamp_millis());

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO user_documents
                (id, user_id, document_type, tool_slug, story_slug, document_data, is_public, creator_email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind.document_type())
        .bind(kind.tool_slug())
        .bind(story_slug)
        .bind(data)
        .bind(creator_email)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(from_row(row))
    }

    /// Replace the data of an owned document
    pub async fn update_data(
        &self,
        id: Uuid,
        user_id: Uuid,
        kind: ToolKind,
        data: serde_json::Value,
    ) -> Result<Option<DocumentRecord>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE user_documents
            SET document_data = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND tool_slug = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(kind.tool_slug())
        .bind(data)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// Get an owned document of the given tool
    pub async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
        kind: ToolKind,
    ) -> Result<Option<DocumentRecord>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM user_documents
            WHERE id = $1 AND user_id = $2 AND tool_slug = $3
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(kind.tool_slug())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// List a user's documents, newest first, optionally for one tool
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<ToolKind>,
    ) -> Result<Vec<DocumentRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM user_documents
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR tool_slug = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(kind.map(|kind| kind.tool_slug()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    /// Flag any document as reported by a viewer. Unpublishing also takes
    /// it private and marks its data unpublished. `None` when no row matched.
    pub async fn mark_reported(&self, id: Uuid, unpublish: bool) -> Result<Option<DocumentRecord>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE user_documents
            SET reported = TRUE,
                is_public = is_public AND NOT $2,
                document_data = CASE
                    WHEN $2 THEN document_data || jsonb_build_object('is_published', 'false')
                    ELSE document_data
                END
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(unpublish)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// Delete an owned document; false when nothing matched
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
