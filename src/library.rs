//! The in-memory record store and its operations. Every function here tries
//! to encapsulate one mutation or query so the rest of the codebase can stay
//! focused on UI state management; persistence is the caller's concern and
//! happens after the operation succeeds.

use chrono::{Datelike, Local, Utc};

use crate::error::LibraryError;
use crate::models::{Book, BookId, Genre};

/// Lowest publication year the add form accepts.
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// The current local calendar year, used as the upper bound for publication
/// years. Resolved per call so a session running across New Year picks up the
/// new bound.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Validated input for a new record. The form layer builds one of these from
/// raw field strings; `Library::add` runs the validation and stamps the rest.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: Genre,
    pub read_status: bool,
}

impl NewBook {
    /// Check the schema constraints without touching any library state.
    /// Returns the trimmed title and author so callers store the normalized
    /// form.
    fn validate(&self) -> Result<(String, String), LibraryError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(LibraryError::EmptyTitle);
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(LibraryError::EmptyAuthor);
        }
        let max = current_year();
        if self.publication_year < MIN_PUBLICATION_YEAR || self.publication_year > max {
            return Err(LibraryError::YearOutOfRange {
                min: MIN_PUBLICATION_YEAR,
                max,
            });
        }
        Ok((title.to_string(), author.to_string()))
    }
}

/// Field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    /// Every searchable field in the order the search page cycles them.
    pub const ALL: [SearchField; 3] = [SearchField::Title, SearchField::Author, SearchField::Genre];

    /// Label shown in the search page's field selector.
    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
            SearchField::Genre => "Genre",
        }
    }
}

/// The full ordered collection of book records for one user. Order is
/// insertion order and nothing about a record is unique, so the only handle
/// the rest of the application uses is the session-stable `BookId`.
#[derive(Debug)]
pub struct Library {
    books: Vec<Book>,
    next_id: BookId,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// An empty library, the state of a fresh session with no document.
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a library from previously persisted records. Identifiers are
    /// reassigned in document order; they are session-scoped and never round
    /// trip through the file.
    pub fn hydrate(books: Vec<Book>) -> Self {
        let mut library = Self::new();
        for mut book in books {
            book.id = library.next_id;
            library.next_id += 1;
            library.books.push(book);
        }
        library
    }

    /// The records in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Look up a record by its session handle.
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Validate the input, stamp the creation date, append the record at the
    /// tail, and echo the hydrated struct so the caller can update UI state
    /// without re-reading the collection. Validation failures leave the
    /// library untouched.
    pub fn add(&mut self, draft: NewBook) -> Result<&Book, LibraryError> {
        let (title, author) = draft.validate()?;
        let book = Book {
            id: self.next_id,
            title,
            author,
            publication_year: draft.publication_year,
            genre: draft.genre,
            read_status: draft.read_status,
            added_date: Utc::now(),
        };
        self.next_id += 1;
        let index = self.books.len();
        self.books.push(book);
        Ok(&self.books[index])
    }

    /// Delete the record with the given handle and return it. Later records
    /// keep their handles, so selections held by other views stay valid. We
    /// surface an explicit error when nothing matches so the UI can show a
    /// friendly message instead of silently continuing.
    pub fn remove(&mut self, id: BookId) -> Result<Book, LibraryError> {
        let position = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(LibraryError::UnknownBook(id))?;
        Ok(self.books.remove(position))
    }

    /// Flip the read flag of one record and return the new value. No other
    /// field is touched, so toggling twice restores the original state.
    pub fn toggle_read(&mut self, id: BookId) -> Result<bool, LibraryError> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(LibraryError::UnknownBook(id))?;
        book.read_status = !book.read_status;
        Ok(book.read_status)
    }

    /// Case-insensitive substring match of the trimmed term against the
    /// chosen field of every record, preserving library order. An empty or
    /// whitespace-only term matches nothing rather than everything, so the
    /// search page starts blank instead of mirroring the whole collection.
    pub fn search(&self, term: &str, field: SearchField) -> Vec<&Book> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.books
            .iter()
            .filter(|book| {
                let haystack = match field {
                    SearchField::Title => book.title.as_str(),
                    SearchField::Author => book.author.as_str(),
                    SearchField::Genre => book.genre.label(),
                };
                haystack.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, author: &str, year: i32, genre: Genre, read: bool) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            publication_year: year,
            genre,
            read_status: read,
        }
    }

    fn seeded() -> Library {
        let mut library = Library::new();
        library
            .add(draft("Dune", "Frank Herbert", 1965, Genre::Fiction, true))
            .unwrap();
        library
            .add(draft(
                "A Brief History of Time",
                "Stephen Hawking",
                1988,
                Genre::NonFiction,
                false,
            ))
            .unwrap();
        library
            .add(draft(
                "The Hobbit",
                "J.R.R. Tolkien",
                1937,
                Genre::Fantasy,
                true,
            ))
            .unwrap();
        library
    }

    #[test]
    fn add_appends_at_tail_with_requested_fields() {
        let mut library = seeded();
        let before = library.len();

        let id = {
            let book = library
                .add(draft("Emma", "Jane Austen", 1815, Genre::Romance, false))
                .unwrap();
            assert_eq!(book.title, "Emma");
            assert_eq!(book.author, "Jane Austen");
            assert_eq!(book.publication_year, 1815);
            assert_eq!(book.genre, Genre::Romance);
            assert!(!book.read_status);
            book.id
        };

        assert_eq!(library.len(), before + 1);
        assert_eq!(library.books().last().unwrap().id, id);
    }

    #[test]
    fn add_trims_title_and_author() {
        let mut library = Library::new();
        let book = library
            .add(draft("  Emma  ", " Jane Austen ", 1815, Genre::Romance, false))
            .unwrap();
        assert_eq!(book.title, "Emma");
        assert_eq!(book.author, "Jane Austen");
    }

    #[test]
    fn add_rejects_blank_title_and_author_without_mutating() {
        let mut library = seeded();
        let before = library.len();

        let err = library
            .add(draft("", "Author", 2020, Genre::Fiction, false))
            .unwrap_err();
        assert_eq!(err, LibraryError::EmptyTitle);

        let err = library
            .add(draft("Title", "   ", 2020, Genre::Fiction, false))
            .unwrap_err();
        assert_eq!(err, LibraryError::EmptyAuthor);

        assert_eq!(library.len(), before);
    }

    #[test]
    fn add_rejects_years_outside_range() {
        let mut library = Library::new();

        let err = library
            .add(draft("T", "A", 999, Genre::Fiction, false))
            .unwrap_err();
        assert!(matches!(err, LibraryError::YearOutOfRange { min: 1000, .. }));

        let future = current_year() + 1;
        let err = library
            .add(draft("T", "A", future, Genre::Fiction, false))
            .unwrap_err();
        assert!(matches!(err, LibraryError::YearOutOfRange { .. }));

        assert!(library.is_empty());
    }

    #[test]
    fn remove_deletes_exactly_one_record_and_keeps_other_ids() {
        let mut library = seeded();
        let ids: Vec<_> = library.books().iter().map(|book| book.id).collect();

        let removed = library.remove(ids[1]).unwrap();
        assert_eq!(removed.title, "A Brief History of Time");
        assert_eq!(library.len(), 2);

        let remaining: Vec<_> = library.books().iter().map(|book| book.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
        assert_eq!(library.books()[1].title, "The Hobbit");
    }

    #[test]
    fn remove_with_stale_id_fails_and_changes_nothing() {
        let mut library = seeded();
        let id = library.books()[0].id;
        library.remove(id).unwrap();

        let err = library.remove(id).unwrap_err();
        assert_eq!(err, LibraryError::UnknownBook(id));
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn toggle_read_is_an_involution_touching_one_field() {
        let mut library = seeded();
        let id = library.books()[1].id;
        let snapshot = library.books().to_vec();

        assert!(library.toggle_read(id).unwrap());
        assert!(library.books()[1].read_status);
        assert_eq!(library.books()[0], snapshot[0]);
        assert_eq!(library.books()[2], snapshot[2]);

        assert!(!library.toggle_read(id).unwrap());
        assert_eq!(library.books().to_vec(), snapshot);
    }

    #[test]
    fn toggle_read_with_unknown_id_fails() {
        let mut library = seeded();
        let err = library.toggle_read(9999).unwrap_err();
        assert_eq!(err, LibraryError::UnknownBook(9999));
    }

    #[test]
    fn search_by_genre_is_case_insensitive_substring_match() {
        let library = seeded();
        let hits = library.search("fic", SearchField::Genre);
        let titles: Vec<_> = hits.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "A Brief History of Time"]);
    }

    #[test]
    fn search_preserves_order_and_returns_empty_on_no_match() {
        let library = seeded();
        let hits = library.search("h", SearchField::Title);
        let titles: Vec<_> = hits.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, vec!["A Brief History of Time", "The Hobbit"]);

        assert!(library.search("zzz", SearchField::Title).is_empty());
        assert!(library.search("   ", SearchField::Author).is_empty());
    }

    #[test]
    fn hydrate_assigns_fresh_ids_in_document_order() {
        let source = seeded();
        let books = source.books().to_vec();

        let library = Library::hydrate(books);
        let ids: Vec<_> = library.books().iter().map(|book| book.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(library.books()[0].title, "Dune");

        let mut library = library;
        let book = library
            .add(draft("Emma", "Jane Austen", 1815, Genre::Romance, false))
            .unwrap();
        assert_eq!(book.id, 4);
    }
}
