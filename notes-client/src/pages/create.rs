use crate::{
    api::{ApiClient, NoteInput},
    routes::Route,
    toast::Toast,
};

use super::{FILL_ALL_FIELDS, Outcome};

#[derive(Debug, Clone, Default)]
pub struct CreatePage {
    pub title: String,
    pub content: String,
    pub is_loading: bool,
}

impl CreatePage {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_loading: false,
        }
    }

    pub async fn submit(&mut self, api: &ApiClient) -> Outcome {
        let input = NoteInput::new(self.title.clone(), self.content.clone());
        if !input.is_complete() {
            return Outcome::toast(Toast::error(FILL_ALL_FIELDS));
        }

        self.is_loading = true;
        let result = api.create_note(&input).await;
        self.is_loading = false;

        match result {
            Ok(_) => Outcome::toast(Toast::success("Note created successfully")).then(Route::Home),
            Err(e) => {
                tracing::error!("Error creating note: {e}");
                Outcome::toast(Toast::error("Failed to create note"))
            }
        }
    }
}
