use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::controller::RegistrationSession;
use crate::error::AppError;
use crate::models::Coordinator;

/// Fixed-width UTC timestamps so stored values compare as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::BadRequest(format!("Failed to serialize state: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse stored state: {}", e)))
}

pub async fn insert_draft(db: &SqlitePool, session: &RegistrationSession) -> Result<String, AppError> {
    let id = Uuid::new_v4().to_string();
    let now = timestamp(Utc::now());
    let state = to_json(session)?;

    sqlx::query("INSERT INTO registration_drafts (id, state, updated_at) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(&state)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(id)
}

pub async fn find_draft(db: &SqlitePool, id: &str) -> Result<Option<RegistrationSession>, AppError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT state FROM registration_drafts WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await?;

    row.map(|(state,)| from_json(&state)).transpose()
}

pub async fn update_draft(
    db: &SqlitePool,
    id: &str,
    session: &RegistrationSession,
) -> Result<bool, AppError> {
    let now = timestamp(Utc::now());
    let state = to_json(session)?;

    let result = sqlx::query(
        r#"
        UPDATE registration_drafts
        SET state = ?1,
            updated_at = ?2
        WHERE id = ?3
        "#,
    )
    .bind(&state)
    .bind(&now)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_draft(db: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM registration_drafts WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Deletes drafts last touched before `cutoff`. Returns how many went.
pub async fn delete_drafts_older_than(
    db: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM registration_drafts WHERE updated_at < ?1")
        .bind(timestamp(cutoff))
        .execute(db)
        .await?
        .rows_affected();

    Ok(result)
}

pub async fn insert_session(db: &SqlitePool, coordinator: &Coordinator) -> Result<String, AppError> {
    let id = Uuid::new_v4().to_string();
    let now = timestamp(Utc::now());
    let record = to_json(coordinator)?;

    sqlx::query("INSERT INTO sessions (id, coordinator, created_at) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(&record)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(id)
}

pub async fn find_session(db: &SqlitePool, id: &str) -> Result<Option<Coordinator>, AppError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT coordinator FROM sessions WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await?;

    row.map(|(record,)| from_json(&record)).transpose()
}

pub async fn delete_session(db: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
