//! Aggregate counts over a library snapshot. Pure functions only: the
//! statistics page rebuilds its numbers every time it opens, so nothing here
//! caches or mutates.

use std::collections::BTreeMap;

use crate::library::Library;
use crate::models::Genre;

/// Counts and percentages for the statistics page. Breakdown maps are ordered
/// so rendering stays deterministic from one draw to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryStats {
    pub total_books: usize,
    pub read_books: usize,
    /// 100 * read / total, or 0.0 for an empty library. Formatted to one
    /// decimal at the rendering edge.
    pub percent_read: f64,
    pub by_genre: BTreeMap<Genre, usize>,
    pub by_author: BTreeMap<String, usize>,
    /// Publication year floored to the lower multiple of ten, mapped to the
    /// number of books in that decade.
    pub by_decade: BTreeMap<i32, usize>,
}

/// Walk the collection once and accumulate every aggregate the statistics
/// page shows. An empty library produces all zeros and empty maps rather
/// than dividing by zero.
pub fn library_stats(library: &Library) -> LibraryStats {
    let mut stats = LibraryStats {
        total_books: library.len(),
        ..LibraryStats::default()
    };

    for book in library.books() {
        if book.read_status {
            stats.read_books += 1;
        }
        *stats.by_genre.entry(book.genre).or_insert(0) += 1;
        *stats.by_author.entry(book.author.clone()).or_insert(0) += 1;
        *stats.by_decade.entry(book.decade()).or_insert(0) += 1;
    }

    if stats.total_books > 0 {
        stats.percent_read = 100.0 * stats.read_books as f64 / stats.total_books as f64;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::NewBook;

    fn draft(title: &str, author: &str, year: i32, genre: Genre, read: bool) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            publication_year: year,
            genre,
            read_status: read,
        }
    }

    #[test]
    fn empty_library_yields_zeros_and_empty_maps() {
        let stats = library_stats(&Library::new());
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.read_books, 0);
        assert_eq!(stats.percent_read, 0.0);
        assert!(stats.by_genre.is_empty());
        assert!(stats.by_author.is_empty());
        assert!(stats.by_decade.is_empty());
    }

    #[test]
    fn three_book_scenario_matches_expected_aggregates() {
        let mut library = Library::new();
        library
            .add(draft("First", "Ann", 1995, Genre::Fiction, true))
            .unwrap();
        library
            .add(draft("Second", "Ann", 2001, Genre::Science, true))
            .unwrap();
        library
            .add(draft("Third", "Ben", 2001, Genre::Fiction, false))
            .unwrap();

        let stats = library_stats(&library);
        assert_eq!(stats.total_books, 3);
        assert_eq!(stats.read_books, 2);
        assert_eq!(format!("{:.1}", stats.percent_read), "66.7");

        assert_eq!(stats.by_genre.get(&Genre::Fiction), Some(&2));
        assert_eq!(stats.by_genre.get(&Genre::Science), Some(&1));
        assert_eq!(stats.by_author.get("Ann"), Some(&2));
        assert_eq!(stats.by_author.get("Ben"), Some(&1));
        assert_eq!(stats.by_decade.get(&1990), Some(&1));
        assert_eq!(stats.by_decade.get(&2000), Some(&2));
        assert_eq!(stats.by_decade.len(), 2);
    }

    #[test]
    fn one_distinct_entry_per_genre_and_author_present() {
        let mut library = Library::new();
        library
            .add(draft("A", "Same Author", 2000, Genre::History, false))
            .unwrap();
        library
            .add(draft("B", "Same Author", 2005, Genre::History, false))
            .unwrap();

        let stats = library_stats(&library);
        assert_eq!(stats.by_genre.len(), 1);
        assert_eq!(stats.by_author.len(), 1);
        assert_eq!(stats.percent_read, 0.0);
    }
}
