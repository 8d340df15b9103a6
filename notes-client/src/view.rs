//! Plain-text layouts for the terminal front end.

use chrono::Local;

use crate::{api::Note, format::format_date};

pub const RATE_LIMITED_TITLE: &str = "Rate Limit Reached";
pub const RATE_LIMITED_BODY: &str =
    "You've made too many requests in a short period. Please wait a moment.";
pub const RATE_LIMITED_HINT: &str = "Try again in a few seconds for the best experience.";

/// Header, body and footer lines of a note card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub header: String,
    pub body: String,
    pub footer: String,
}

impl NoteCard {
    pub fn new(note: &Note) -> Self {
        Self {
            header: format!("#{} {}", note.id, note.title),
            body: note.content.clone(),
            footer: format_date(&note.created_at.with_timezone(&Local)),
        }
    }
}

pub fn empty_list_hint() -> &'static str {
    "No notes yet. Create one with `notes create --title <TITLE> --content <CONTENT>`."
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    #[test]
    fn card_shows_id_title_and_content() {
        let created = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let card = NoteCard::new(&Note {
            id: 4,
            title: "Groceries".to_string(),
            content: "milk".to_string(),
            created_at: created,
            updated_at: created,
        });

        assert_eq!(card.header, "#4 Groceries");
        assert_eq!(card.body, "milk");
        assert!(card.footer.ends_with(", 2026"));
    }
}
