use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed {annotation} annotation on '{member}': {reason}")]
    MalformedAnnotation {
        member: String,
        annotation: String,
        reason: String,
    },
    #[error("unknown member '{0}'")]
    UnknownMember(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    pub fn malformed(
        member: impl Into<String>,
        annotation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedAnnotation {
            member: member.into(),
            annotation: annotation.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::Render(e.to_string())
    }
}
