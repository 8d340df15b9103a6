//! notes-client: the notes front end as a library.
//!
//! [`api::ApiClient`] talks to notes-api; [`pages`] hold the state of the
//! list, create and detail views and turn API results into toasts and
//! navigation; [`view`] lays notes out for the terminal.

pub mod api;
pub mod error;
pub mod format;
pub mod pages;
pub mod routes;
pub mod toast;
pub mod view;

pub use api::{ApiClient, Note, NoteInput};
pub use error::{ClientError, ClientResult};
pub use routes::Route;
pub use toast::{Toast, ToastKind};
