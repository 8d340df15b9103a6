use std::time::Duration;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use super::{NoteRepository, RepositoryError, embedded::migrations};
use crate::models::Note;

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at";

pub struct PgRepository {
    client: Client,
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Connects, retrying up to `attempts` times with `retry_delay` between tries.
    pub async fn connect_with_retry(
        database_dsn: &str,
        attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self, RepositoryError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            match Self::new(database_dsn).await {
                Ok(repo) => {
                    tracing::info!("Connected to database on attempt {attempt}/{attempts}");
                    return Ok(repo);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "Database connection attempt {attempt}/{attempts} failed: {e}; retrying in {retry_delay:?}"
                    );
                    tokio::time::sleep(retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn migrate(&mut self) -> Result<(), RepositoryError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgRepository {
    async fn create_note(&self, title: String, content: String) -> Result<Note, RepositoryError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (title, content) VALUES ($1, $2) RETURNING {NOTE_COLUMNS}"
                ),
                &[&title, &content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update_note(
        &self,
        id: i64,
        title: String,
        content: String,
    ) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET title = $1, content = $2, updated_at = NOW() \
                     WHERE id = $3 RETURNING {NOTE_COLUMNS}"
                ),
                &[&title, &content, &id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_note(&self, id: i64) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }

    async fn get_one_note(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .query(
                &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, id DESC"),
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }
}
