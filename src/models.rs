//! Domain models that mirror the persisted JSON document and get passed
//! throughout the TUI. The intent is that these types stay light-weight data
//! holders so other layers can focus on presentation and persistence logic.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-scoped handle for a book record. Identifiers are assigned from a
/// monotonic counter when a record is created or loaded and are never written
/// to disk, so a stale handle (for example from a double-triggered remove)
/// can fail cleanly instead of silently hitting a shifted list position.
pub type BookId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One catalog entry. The serialized shape is exactly the six schema fields
/// of the persisted document; `id` is skipped and reassigned on load.
pub struct Book {
    /// In-memory identifier used by every mutation. Skipped during
    /// serialization so the on-disk document stays schema-exact.
    #[serde(skip)]
    pub id: BookId,
    /// Title displayed in lists and search results. Non-empty after trimming.
    pub title: String,
    /// Author field used both for display and filtering. Non-empty after
    /// trimming.
    pub author: String,
    /// Publication year, constrained to 1000 through the current calendar
    /// year at creation time.
    pub publication_year: i32,
    /// One of the closed genre set.
    pub genre: Genre,
    /// Whether the user has finished the book.
    pub read_status: bool,
    /// Creation timestamp, stamped once and never mutated. Serializes as an
    /// RFC 3339 string.
    pub added_date: DateTime<Utc>,
}

impl Book {
    /// Compose a `Title by Author` string for views that want a single line.
    pub fn display_title(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }

    /// Publication year floored to the lower multiple of ten. Years are at
    /// least 1000, so plain integer division is enough.
    pub fn decade(&self) -> i32 {
        (self.publication_year / 10) * 10
    }
}

/// Closed set of genres a book can carry. Kept as an enum so the add form can
/// cycle through the options and the document never holds free-form text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    Technology,
    Fantasy,
    Romance,
    History,
    Other,
}

impl Genre {
    /// Every genre in form/display order. The add form and the search page
    /// both iterate this list, so it is the single source of truth for how
    /// genres are presented.
    pub const ALL: [Genre; 8] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::Technology,
        Genre::Fantasy,
        Genre::Romance,
        Genre::History,
        Genre::Other,
    ];

    /// Human-readable label, identical to the persisted string.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Science => "Science",
            Genre::Technology => "Technology",
            Genre::Fantasy => "Fantasy",
            Genre::Romance => "Romance",
            Genre::History => "History",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    /// Write the genre label to any formatter. Display is implemented so the
    /// type plays nicely with Ratatui widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(year: i32) -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: year,
            genre: Genre::Fiction,
            read_status: false,
            added_date: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn decade_floors_to_lower_multiple_of_ten() {
        assert_eq!(sample(1995).decade(), 1990);
        assert_eq!(sample(2001).decade(), 2000);
        assert_eq!(sample(2000).decade(), 2000);
    }

    #[test]
    fn serialized_book_omits_id_and_spells_non_fiction_with_hyphen() {
        let mut book = sample(1965);
        book.genre = Genre::NonFiction;
        let json = serde_json::to_value(&book).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert_eq!(object.len(), 6);
        assert_eq!(object["genre"], "Non-Fiction");
        assert_eq!(object["publication_year"], 1965);
        assert_eq!(object["read_status"], false);
        assert!(object["added_date"].is_string());
    }
}
