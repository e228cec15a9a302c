//! Shared error types for the services crate.

use thiserror::Error;

use content::repository::ContentError;
use quest_core::model::SessionSummaryError;

/// Errors emitted by session and game services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The retrieved item sequence was empty. Surfaced to the player with
    /// a retry action.
    #[error("no content available")]
    NoContent,

    /// An answer arrived after the session finished. Callers treat this
    /// as a silent no-op; session state is untouched.
    #[error("session already completed")]
    Completed,

    #[error(transparent)]
    Retrieval(#[from] ContentError),

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Store(#[from] ContentError),
}
