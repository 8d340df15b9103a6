use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    repository::{NoteRepository, RepositoryError},
};

use std::sync::Arc;

pub const MISSING_FIELDS_MESSAGE: &str = "Title and content are required";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

/// Both fields must hold something other than whitespace.
pub fn validate_fields(title: &str, content: &str) -> Result<(), ServiceError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ServiceError::Validation(MISSING_FIELDS_MESSAGE));
    }
    Ok(())
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        validate_fields(&request.title, &request.content)?;

        let note = self
            .repo
            .create_note(request.title, request.content)
            .await?;

        tracing::debug!("created note {}", note.id);
        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<Option<NoteResponse>, ServiceError> {
        validate_fields(&request.title, &request.content)?;

        Ok(self
            .repo
            .update_note(id, request.title, request.content)
            .await?
            .map(NoteResponse::from))
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.repo.delete_note(id).await?)
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<NoteResponse>, ServiceError> {
        Ok(self.repo.get_one_note(id).await?.map(NoteResponse::from))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ServiceError> {
        Ok(self
            .repo
            .get_all_notes()
            .await?
            .into_iter()
            .map(NoteResponse::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn service() -> NoteService {
        NoteService::new(Arc::new(MemoryRepository::new()))
    }

    fn create(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn blank_fields_fail_validation() {
        assert!(validate_fields("title", "content").is_ok());
        assert!(matches!(
            validate_fields("", "content"),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            validate_fields("title", "  \n"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn rejected_create_does_not_persist() {
        let service = service();
        assert!(service.create_note(create("", "content")).await.is_err());
        assert!(service.get_all_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn created_note_is_retrievable() {
        let service = service();
        let created = service
            .create_note(create("Groceries", "milk, eggs"))
            .await
            .unwrap();

        let fetched = service.get_one_note(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn rejected_update_keeps_previous_values() {
        let service = service();
        let created = service.create_note(create("a", "b")).await.unwrap();

        let result = service
            .update_note(
                created.id,
                UpdateNoteRequest {
                    title: "new".to_string(),
                    content: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let fetched = service.get_one_note(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "b");
    }
}
