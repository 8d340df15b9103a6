//! Note storage.
//!
//! Both backends implement [`NoteRepository`]; absent ids surface as `None`
//! or `false`, never as errors.

mod embedded;
mod memory;
mod postgres;

use async_trait::async_trait;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create_note(&self, title: String, content: String) -> Result<Note, RepositoryError>;

    async fn update_note(
        &self,
        id: i64,
        title: String,
        content: String,
    ) -> Result<Option<Note>, RepositoryError>;

    /// Returns `true` if a note was removed.
    async fn delete_note(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn get_one_note(&self, id: i64) -> Result<Option<Note>, RepositoryError>;

    /// All notes, newest first.
    async fn get_all_notes(&self) -> Result<Vec<Note>, RepositoryError>;
}
