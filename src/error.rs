//! Failure taxonomy for catalog operations. Every variant's display string is
//! written to be shown directly in the footer, so messages stay short and end
//! with a period like the rest of the status text.

use thiserror::Error;

use crate::models::BookId;

/// Errors produced by the in-memory library operations. Validation variants
/// reject bad add-form input; `UnknownBook` covers stale handles passed to
/// remove or toggle. Persistence write failures are reported separately at
/// the store layer and never reach this enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("Book title is required.")]
    EmptyTitle,
    #[error("Author is required.")]
    EmptyAuthor,
    #[error("Publication year must be between {min} and {max}.")]
    YearOutOfRange { min: i32, max: i32 },
    #[error("That book no longer exists.")]
    UnknownBook(BookId),
}
