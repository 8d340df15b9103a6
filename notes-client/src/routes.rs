use std::{fmt, str::FromStr};

/// Client-side views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Create,
    Note(i64),
}

#[derive(Debug, thiserror::Error)]
#[error("no page at '{0}'")]
pub struct UnknownRoute(String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Ok(Self::Home),
            "/create" => Ok(Self::Create),
            _ => trimmed
                .strip_prefix("/note/")
                .and_then(|id| id.parse().ok())
                .map(Self::Note)
                .ok_or_else(|| UnknownRoute(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Create => f.write_str("/create"),
            Self::Note(id) => write!(f, "/note/{id}"),
        }
    }
}
