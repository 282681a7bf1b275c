//! Core library surface for the Personal Library Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the domain types, the in-memory library operations, the JSON
//! document store, the aggregate statistics, and the interactive front end.

pub mod animation;
pub mod error;
pub mod library;
pub mod models;
pub mod stats;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are
/// typically used by `main.rs` to locate and read the library document.
pub use store::{document_path, load, save};

/// The decorative header animation fetch, performed once at startup.
pub use animation::fetch_animation;

/// The primary domain types that other layers manipulate.
pub use library::{Library, NewBook, SearchField};
pub use models::{Book, BookId, Genre};

/// Aggregates for the statistics page.
pub use stats::{library_stats, LibraryStats};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
