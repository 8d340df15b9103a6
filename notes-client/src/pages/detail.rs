use crate::{
    api::{ApiClient, Note, NoteInput},
    routes::Route,
    toast::Toast,
};

use super::{FILL_ALL_FIELDS, Outcome};

/// View and edit a single note.
#[derive(Debug, Clone)]
pub struct NoteDetailPage {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub note: Option<Note>,
    pub is_loading: bool,
    pub is_saving: bool,
    pub is_deleting: bool,
}

impl NoteDetailPage {
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
            note: None,
            is_loading: true,
            is_saving: false,
            is_deleting: false,
        }
    }

    pub async fn load(&mut self, api: &ApiClient) -> Option<Toast> {
        self.is_loading = true;
        let result = api.get_note(self.id).await;
        self.is_loading = false;

        match result {
            Ok(note) => {
                self.title.clone_from(&note.title);
                self.content.clone_from(&note.content);
                self.note = Some(note);
                None
            }
            Err(e) => {
                tracing::error!("Error fetching note: {e}");
                Some(Toast::error("Failed to fetch note details"))
            }
        }
    }

    pub async fn save(&mut self, api: &ApiClient) -> Outcome {
        let input = NoteInput::new(self.title.clone(), self.content.clone());
        if !input.is_complete() {
            return Outcome::toast(Toast::error(FILL_ALL_FIELDS));
        }

        self.is_saving = true;
        let result = api.update_note(self.id, &input).await;
        self.is_saving = false;

        match result {
            Ok(note) => {
                self.note = Some(note);
                Outcome::toast(Toast::success("Note updated successfully")).then(Route::Home)
            }
            Err(e) => {
                tracing::error!("Error updating note: {e}");
                Outcome::toast(Toast::error("Failed to update note"))
            }
        }
    }

    /// Deletes only once the user has `confirmed`.
    pub async fn delete(&mut self, api: &ApiClient, confirmed: bool) -> Outcome {
        if !confirmed {
            return Outcome::none();
        }

        self.is_deleting = true;
        let result = api.delete_note(self.id).await;
        self.is_deleting = false;

        match result {
            Ok(()) => Outcome::toast(Toast::success("Note deleted successfully")).then(Route::Home),
            Err(e) => {
                tracing::error!("Error deleting note: {e}");
                Outcome::toast(Toast::error("Failed to delete note"))
            }
        }
    }
}
