//! Persistence helpers around the JSON library document. The whole
//! collection is read and written in one piece; at the scale of a personal
//! list that keeps the store trivial to reason about, and the in-memory
//! library always survives a failed write.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

use crate::library::Library;
use crate::models::Book;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library-manager";
/// Document file name stored inside the application data directory.
const DOCUMENT_FILE_NAME: &str = "library.json";

/// Resolve the absolute path to the library document inside the user's home.
pub fn document_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(DOCUMENT_FILE_NAME))
}

/// Read the persisted document if present and well formed. A missing file,
/// unreadable content, or malformed JSON all yield an empty library; starting
/// over beats refusing to start, and the next save rewrites the document
/// wholesale anyway.
pub fn load(path: &Path) -> Library {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Library::new(),
    };
    match serde_json::from_str::<Vec<Book>>(&raw) {
        Ok(books) => Library::hydrate(books),
        Err(_) => Library::new(),
    }
}

/// Serialize the full library and overwrite the document. The parent
/// directory is created lazily so a fresh install works without setup. On
/// failure the caller keeps its in-memory state and decides how to warn the
/// user.
pub fn save(path: &Path, library: &Library) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }
    let raw =
        serde_json::to_string_pretty(library.books()).context("failed to serialize library")?;
    fs::write(path, raw).context("failed to write library document")?;
    Ok(())
}
