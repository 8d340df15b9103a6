use crate::{
    api::{ApiClient, Note},
    error::ClientError,
    toast::Toast,
};

/// The note list.
#[derive(Debug, Clone)]
pub struct HomePage {
    pub notes: Vec<Note>,
    pub loading: bool,
    pub is_rate_limited: bool,
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

impl HomePage {
    pub const fn new() -> Self {
        Self {
            notes: Vec::new(),
            loading: true,
            is_rate_limited: false,
        }
    }

    /// Fetches all notes. A 429 raises the rate-limited banner instead of a toast.
    pub async fn load(&mut self, api: &ApiClient) -> Option<Toast> {
        self.loading = true;
        let result = api.list_notes().await;
        self.loading = false;

        match result {
            Ok(notes) => {
                self.notes = notes;
                self.is_rate_limited = false;
                None
            }
            Err(ClientError::RateLimited { .. }) => {
                self.is_rate_limited = true;
                None
            }
            Err(e) => {
                tracing::error!("Error fetching notes: {e}");
                Some(Toast::error("Something went wrong"))
            }
        }
    }

    /// Notes to draw; hidden while the banner is up.
    pub fn visible_notes(&self) -> &[Note] {
        if self.is_rate_limited {
            &[]
        } else {
            &self.notes
        }
    }

    pub async fn delete_note(&mut self, api: &ApiClient, id: i64) -> Toast {
        match api.delete_note(id).await {
            Ok(()) => {
                self.notes.retain(|note| note.id != id);
                Toast::success("Note deleted successfully")
            }
            Err(e) => {
                tracing::error!("Error deleting note: {e}");
                Toast::error("Failed to delete note")
            }
        }
    }
}
