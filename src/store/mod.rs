//! Persistence module for the on-disk library document.

mod document;

pub use document::{document_path, load, save};
