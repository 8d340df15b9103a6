use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{NoteRepository, RepositoryError};
use crate::models::Note;

/// In-process store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    notes: BTreeMap<i64, Note>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn create_note(&self, title: String, content: String) -> Result<Note, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let now = Utc::now();
        let note = Note {
            id: inner.last_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(
        &self,
        id: i64,
        title: String,
        content: String,
    ) -> Result<Option<Note>, RepositoryError> {
        let mut inner = self.inner.write().await;

        Ok(inner.notes.get_mut(&id).map(|note| {
            note.title = title;
            note.content = content;
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    async fn delete_note(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.inner.write().await.notes.remove(&id).is_some())
    }

    async fn get_one_note(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        Ok(self.inner.read().await.notes.get(&id).cloned())
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>, RepositoryError> {
        let mut notes: Vec<Note> = self.inner.read().await.notes.values().cloned().collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryRepository::new();
        let first = repo.create_note("a".into(), "b".into()).await.unwrap();
        assert!(repo.delete_note(first.id).await.unwrap());

        let second = repo.create_note("c".into(), "d".into()).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn update_bumps_updated_at_only() {
        let repo = MemoryRepository::new();
        let note = repo.create_note("a".into(), "b".into()).await.unwrap();

        let updated = repo
            .update_note(note.id, "x".into(), "y".into())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(updated.title, "x");
        assert_eq!(updated.content, "y");
    }

    #[tokio::test]
    async fn missing_ids_are_not_errors() {
        let repo = MemoryRepository::new();
        assert!(repo.get_one_note(7).await.unwrap().is_none());
        assert!(repo.update_note(7, "a".into(), "b".into()).await.unwrap().is_none());
        assert!(!repo.delete_note(7).await.unwrap());
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let repo = MemoryRepository::new();
        for title in ["one", "two", "three"] {
            repo.create_note(title.into(), "body".into()).await.unwrap();
        }

        let titles: Vec<String> = repo
            .get_all_notes()
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.title)
            .collect();

        assert_eq!(titles, ["three", "two", "one"]);
    }
}
