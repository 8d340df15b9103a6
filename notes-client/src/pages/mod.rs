//! Page state for the list, create and detail views.
//!
//! Each page owns its form fields and busy flags. Actions perform one API
//! call and report back an [`Outcome`]: an optional toast and an optional
//! route to move to.

mod create;
mod detail;
mod home;

pub use create::CreatePage;
pub use detail::NoteDetailPage;
pub use home::HomePage;

use crate::{routes::Route, toast::Toast};

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub toast: Option<Toast>,
    pub navigate: Option<Route>,
}

impl Outcome {
    pub const fn none() -> Self {
        Self {
            toast: None,
            navigate: None,
        }
    }

    pub fn toast(toast: Toast) -> Self {
        Self {
            toast: Some(toast),
            navigate: None,
        }
    }

    pub fn then(mut self, route: Route) -> Self {
        self.navigate = Some(route);
        self
    }
}
