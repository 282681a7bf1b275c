use crate::library::{Library, SearchField};
use crate::models::Book;
use crate::stats::{library_stats, LibraryStats};

use super::helpers::count_bar;

/// Width of the proportional bars on the statistics page.
const BAR_WIDTH: usize = 20;

/// Backing state for the search page: a field selector, a live query, and a
/// cloned snapshot of matching records. The snapshot keeps rendering simple
/// and is cheap at personal-collection scale.
pub(crate) struct SearchScreen {
    pub(crate) field: SearchField,
    pub(crate) query: String,
    pub(crate) results: Vec<Book>,
    pub(crate) selected: usize,
}

impl SearchScreen {
    pub(crate) fn new() -> Self {
        Self {
            field: SearchField::Title,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
        }
    }

    /// Re-run the query against the library and clamp the selection.
    pub(crate) fn refresh(&mut self, library: &Library) {
        self.results = library
            .search(&self.query, self.field)
            .into_iter()
            .cloned()
            .collect();
        self.ensure_in_bounds();
    }

    /// Advance the field selector and re-run the query.
    pub(crate) fn cycle_field(&mut self, library: &Library) {
        let position = SearchField::ALL
            .iter()
            .position(|field| *field == self.field)
            .unwrap_or(0);
        self.field = SearchField::ALL[(position + 1) % SearchField::ALL.len()];
        self.refresh(library);
    }

    pub(crate) fn push_char(&mut self, ch: char, library: &Library) {
        if !ch.is_control() {
            self.query.push(ch);
            self.refresh(library);
        }
    }

    pub(crate) fn backspace(&mut self, library: &Library) {
        self.query.pop();
        self.refresh(library);
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.results.is_empty() {
            return;
        }
        let len = self.results.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.results.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.results.is_empty() {
            self.selected = self.results.len() - 1;
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.results.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.results.len() {
            self.selected = self.results.len() - 1;
        }
    }
}

/// Row rendered on the statistics page. The rows are built once when the
/// page opens; the aggregates are a pure function of the library snapshot so
/// there is nothing to keep in sync afterwards.
pub(crate) struct StatRow {
    pub(crate) kind: StatRowKind,
    pub(crate) text: String,
}

#[derive(PartialEq, Eq)]
pub(crate) enum StatRowKind {
    Summary,
    Heading,
    Entry,
    Blank,
}

/// All state required to render the statistics page.
pub(crate) struct StatsScreen {
    pub(crate) stats: LibraryStats,
    pub(crate) rows: Vec<StatRow>,
    pub(crate) scroll: u16,
}

impl StatsScreen {
    pub(crate) fn new(library: &Library) -> Self {
        let stats = library_stats(library);
        let rows = build_rows(&stats);
        Self {
            stats,
            rows,
            scroll: 0,
        }
    }

    pub(crate) fn scroll_by(&mut self, delta: isize) {
        let max = self.max_scroll() as isize;
        let next = (self.scroll as isize + delta).clamp(0, max);
        self.scroll = next as u16;
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub(crate) fn max_scroll(&self) -> u16 {
        self.rows.len().saturating_sub(1) as u16
    }
}

fn build_rows(stats: &LibraryStats) -> Vec<StatRow> {
    if stats.total_books == 0 {
        return vec![StatRow {
            kind: StatRowKind::Summary,
            text: "No books yet. Add one to see statistics.".to_string(),
        }];
    }

    let mut rows = vec![
        StatRow {
            kind: StatRowKind::Summary,
            text: format!("Total books: {}", stats.total_books),
        },
        StatRow {
            kind: StatRowKind::Summary,
            text: format!("Books read: {}", stats.read_books),
        },
        StatRow {
            kind: StatRowKind::Summary,
            text: format!("Percent read: {:.1}%", stats.percent_read),
        },
    ];

    push_section(
        &mut rows,
        "By Genre",
        stats
            .by_genre
            .iter()
            .map(|(genre, count)| (genre.label().to_string(), *count)),
    );
    push_section(
        &mut rows,
        "By Author",
        stats
            .by_author
            .iter()
            .map(|(author, count)| (author.clone(), *count)),
    );
    push_section(
        &mut rows,
        "By Decade",
        stats
            .by_decade
            .iter()
            .map(|(decade, count)| (format!("{decade}s"), *count)),
    );

    rows
}

fn push_section(
    rows: &mut Vec<StatRow>,
    heading: &str,
    entries: impl Iterator<Item = (String, usize)>,
) {
    let entries: Vec<(String, usize)> = entries.collect();
    let max = entries.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let label_width = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    rows.push(StatRow {
        kind: StatRowKind::Blank,
        text: String::new(),
    });
    rows.push(StatRow {
        kind: StatRowKind::Heading,
        text: heading.to_string(),
    });
    for (label, count) in entries {
        rows.push(StatRow {
            kind: StatRowKind::Entry,
            text: format!(
                "{label:<label_width$}  {}  {count}",
                count_bar(count, max, BAR_WIDTH)
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::NewBook;
    use crate::models::Genre;

    fn seeded() -> Library {
        let mut library = Library::new();
        for (title, author, year, genre, read) in [
            ("Dune", "Frank Herbert", 1965, Genre::Fiction, true),
            ("Foundation", "Isaac Asimov", 1951, Genre::Fiction, false),
        ] {
            library
                .add(NewBook {
                    title: title.to_string(),
                    author: author.to_string(),
                    publication_year: year,
                    genre,
                    read_status: read,
                })
                .unwrap();
        }
        library
    }

    #[test]
    fn search_screen_updates_results_per_keystroke() {
        let library = seeded();
        let mut screen = SearchScreen::new();
        assert!(screen.results.is_empty());

        screen.push_char('d', &library);
        let titles: Vec<_> = screen
            .results
            .iter()
            .map(|book| book.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Dune", "Foundation"]);

        screen.push_char('u', &library);
        let titles: Vec<_> = screen
            .results
            .iter()
            .map(|book| book.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Dune"]);

        screen.backspace(&library);
        assert_eq!(screen.results.len(), 2);
    }

    #[test]
    fn cycling_the_field_reapplies_the_query() {
        let library = seeded();
        let mut screen = SearchScreen::new();
        screen.push_char('a', &library);
        assert_eq!(screen.results.len(), 1);

        screen.cycle_field(&library);
        assert_eq!(screen.field, SearchField::Author);
        assert_eq!(screen.results.len(), 2);
    }

    #[test]
    fn selection_stays_in_bounds_as_results_shrink() {
        let library = seeded();
        let mut screen = SearchScreen::new();
        screen.push_char('n', &library);
        assert_eq!(screen.results.len(), 2);
        screen.select_last();
        assert_eq!(screen.selected, 1);

        screen.push_char('e', &library);
        assert_eq!(screen.results.len(), 1);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn stats_screen_builds_one_entry_per_breakdown_value() {
        let library = seeded();
        let screen = StatsScreen::new(&library);
        let entries = screen
            .rows
            .iter()
            .filter(|row| row.kind == StatRowKind::Entry)
            .count();
        // One genre, two authors, two decades.
        assert_eq!(entries, 5);
        assert_eq!(screen.stats.total_books, 2);
    }

    #[test]
    fn empty_library_renders_a_single_placeholder_row() {
        let screen = StatsScreen::new(&Library::new());
        assert_eq!(screen.rows.len(), 1);
        assert_eq!(screen.max_scroll(), 0);
    }
}
