//! HTTP client for the notes REST API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, StatusCode, header::RETRY_AFTER};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

const MISSING_FIELDS: &str = "Title and content are required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Both fields must contain something besides whitespace.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check(input: &NoteInput) -> ClientResult<()> {
        if input.is_complete() {
            Ok(())
        } else {
            Err(ClientError::InvalidInput(MISSING_FIELDS))
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: i64) -> String {
        format!("{}/notes/{id}", self.base_url)
    }

    pub async fn list_notes(&self) -> ClientResult<Vec<Note>> {
        self.send(self.http.get(self.notes_url())).await
    }

    pub async fn get_note(&self, id: i64) -> ClientResult<Note> {
        self.send(self.http.get(self.note_url(id))).await
    }

    /// Blank fields are refused locally without a request.
    pub async fn create_note(&self, input: &NoteInput) -> ClientResult<Note> {
        Self::check(input)?;
        self.send(self.http.post(self.notes_url()).json(input)).await
    }

    pub async fn update_note(&self, id: i64, input: &NoteInput) -> ClientResult<Note> {
        Self::check(input)?;
        self.send(self.http.put(self.note_url(id)).json(input)).await
    }

    pub async fn delete_note(&self, id: i64) -> ClientResult<()> {
        let _: MessageBody = self.send(self.http.delete(self.note_url(id))).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{} {}", status, response.url());

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ClientError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let fallback = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            let message = response
                .json::<MessageBody>()
                .await
                .map_or(fallback, |body| body.message);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_ignored() {
        let client = ApiClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(client.notes_url(), "http://localhost:3000/api/notes");
        assert_eq!(client.note_url(7), "http://localhost:3000/api/notes/7");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn blank_input_is_incomplete() {
        assert!(NoteInput::new("a", "b").is_complete());
        assert!(!NoteInput::new(" ", "b").is_complete());
        assert!(!NoteInput::new("a", "").is_complete());
    }

    #[test]
    fn note_uses_camel_case_timestamps() {
        let note: Note = serde_json::from_str(
            r#"{"id":1,"title":"t","content":"c","createdAt":"2026-10-19T08:00:00Z","updatedAt":"2026-10-19T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(note.id, 1);
        assert!(note.updated_at > note.created_at);
    }
}
