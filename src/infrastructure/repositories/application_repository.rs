//! Application Repository Implementation
//!
//! PostgreSQL implementation of the ApplicationRepository trait.
//! The field set is stored as a single JSONB column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{ApplicationRecord, ApplicationRepository, ApplicationStatus, VisaApplicationDraft};
use crate::shared::error::AppError;

/// Database row representation matching the applications table schema.
#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    status: String,
    fields: Json<VisaApplicationDraft>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    /// Convert database row to domain ApplicationRecord entity.
    fn into_record(self) -> ApplicationRecord {
        ApplicationRecord {
            id: self.id,
            status: ApplicationStatus::from_str(&self.status),
            fields: self.fields.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
            submitted_at: self.submitted_at,
        }
    }
}

/// PostgreSQL application repository implementation.
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    /// Create a new PgApplicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(&self, record: &ApplicationRecord) -> Result<ApplicationRecord, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, status, fields, created_at, updated_at, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, status, fields, created_at, updated_at, submitted_at
            "#,
        )
        .bind(record.id)
        .bind(record.status.as_str())
        .bind(Json(&record.fields))
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.submitted_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationRecord>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, status, fields, created_at, updated_at, submitted_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn update_fields(
        &self,
        id: Uuid,
        fields: &VisaApplicationDraft,
    ) -> Result<Option<ApplicationRecord>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET fields = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, status, fields, created_at, updated_at, submitted_at
            "#,
        )
        .bind(id)
        .bind(Json(fields))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn submit_draft(
        &self,
        id: Uuid,
        fields: &VisaApplicationDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET fields = $2, status = $3, submitted_at = $4, updated_at = $4
            WHERE id = $1 AND status = $5
            RETURNING id, status, fields, created_at, updated_at, submitted_at
            "#,
        )
        .bind(id)
        .bind(Json(fields))
        .bind(ApplicationStatus::Submitted.as_str())
        .bind(submitted_at)
        .bind(ApplicationStatus::Draft.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_record()))
    }
}
