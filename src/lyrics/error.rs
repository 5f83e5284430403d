use thiserror::Error;

use super::notice::{Notice, NoticeKind};

/// Failures and negative results surfaced by lyric operations.
///
/// None of these are fatal: the session turns each one into a [`Notice`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LyricsError {
    /// Request rejected before dispatch (e.g. missing lookup keys)
    #[error("{0}")]
    Validation(String),

    /// Stored-lyrics read or write failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Online lookup failed (transport, status or decode)
    #[error("network error: {0}")]
    Network(String),

    /// Lookup succeeded but matched nothing
    #[error("no lyrics found")]
    NotFound,
}

impl LyricsError {
    pub fn storage(err: &anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }

    pub fn network(err: &anyhow::Error) -> Self {
        Self::Network(format!("{err:#}"))
    }

    pub fn notice_kind(&self) -> NoticeKind {
        match self {
            Self::NotFound => NoticeKind::Info,
            Self::Validation(_) | Self::Storage(_) | Self::Network(_) => NoticeKind::Error,
        }
    }

    /// User-facing notice for this error.
    pub fn to_notice(&self) -> Notice {
        let message = match self {
            Self::Validation(msg) => msg.clone(),
            Self::Storage(_) => "Could not access saved lyrics.".to_string(),
            Self::Network(_) => "Could not fetch lyrics. Try again later.".to_string(),
            Self::NotFound => "No lyrics found for this song".to_string(),
        };
        Notice::new(message, self.notice_kind())
    }
}
