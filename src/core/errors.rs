use std::time::Duration;
use thiserror::Error;

use super::outcome::ErrorKind;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error(
        "Parcel Number not found or the assessor page failed to render \
         ({what} did not appear within {timeout:?})"
    )]
    RenderTimeout { what: String, timeout: Duration },

    #[error("Parcel Number not found in {county} County's Assessor Page!")]
    NotFound { county: String },

    #[error("County not supported: {url}")]
    UnsupportedSource { url: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

impl ScraperError {
    pub fn transport(url: impl ToString, reason: impl ToString) -> Self {
        ScraperError::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScraperError::Transport { .. } | ScraperError::Url(_) => ErrorKind::Transport,
            ScraperError::RenderTimeout { .. } => ErrorKind::RenderTimeout,
            ScraperError::NotFound { .. } => ErrorKind::NotFound,
            ScraperError::UnsupportedSource { .. } => ErrorKind::UnsupportedSource,
            ScraperError::Browser(_) => ErrorKind::Browser,
        }
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
