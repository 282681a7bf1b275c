use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::library::NewBook;
use crate::models::{Book, BookId, Genre};

/// Internal representation of the add-book form fields. Title, author, and
/// year hold raw text while genre and read status are selectors, matching how
/// the terminal collects them.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre_index: usize,
    pub(crate) read_status: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: String::new(),
            genre_index: 0,
            read_status: false,
            active: BookField::default(),
            error: None,
        }
    }
}

/// Fields available within the add-book form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum BookField {
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl Default for BookField {
    fn default() -> Self {
        BookField::Title
    }
}

impl BookForm {
    /// Cycle focus across the five fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Genre,
            BookField::Genre => BookField::Read,
            BookField::Read => BookField::Title,
        };
    }

    /// Cycle focus backwards.
    pub(crate) fn toggle_field_back(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Read,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
            BookField::Genre => BookField::Year,
            BookField::Read => BookField::Genre,
        };
    }

    /// Append a character to the active field, validating allowed input. The
    /// year field only accepts digits; the selector fields consume nothing.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Title => {
                if !ch.is_control() {
                    self.title.push(ch);
                    true
                } else {
                    false
                }
            }
            BookField::Author => {
                if !ch.is_control() {
                    self.author.push(ch);
                    true
                } else {
                    false
                }
            }
            BookField::Year => {
                if ch.is_ascii_digit() && self.year.len() < 4 {
                    self.year.push(ch);
                    true
                } else {
                    false
                }
            }
            BookField::Genre | BookField::Read => false,
        }
    }

    /// Remove the last character from the active text field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre | BookField::Read => {}
        }
    }

    /// Step the genre selector when it has focus. Returns true if the key was
    /// consumed so the caller can fall through to other bindings otherwise.
    pub(crate) fn cycle_genre(&mut self, step: isize) -> bool {
        if self.active != BookField::Genre {
            return false;
        }
        let len = Genre::ALL.len() as isize;
        let current = self.genre_index as isize;
        self.genre_index = (current + step).rem_euclid(len) as usize;
        true
    }

    /// Flip the read selector when it has focus.
    pub(crate) fn toggle_read_value(&mut self) -> bool {
        if self.active != BookField::Read {
            return false;
        }
        self.read_status = !self.read_status;
        true
    }

    /// The currently selected genre.
    pub(crate) fn genre(&self) -> Genre {
        Genre::ALL[self.genre_index % Genre::ALL.len()]
    }

    /// Validate the typed fields and return a draft ready for the library.
    /// Emptiness and year-range checks live with the add operation itself;
    /// this only guarantees the year is numeric.
    pub(crate) fn parse_inputs(&self) -> Result<NewBook> {
        let year_raw = self.year.trim();
        if year_raw.is_empty() {
            return Err(anyhow!("Publication year is required."));
        }
        let publication_year = year_raw
            .parse::<i32>()
            .context("Publication year must be a number.")?;
        Ok(NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            publication_year,
            genre: self.genre(),
            read_status: self.read_status,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let is_active = self.active == field;

        let (display, is_placeholder) = match field {
            BookField::Title => placeholder_or(&self.title, "<required>"),
            BookField::Author => placeholder_or(&self.author, "<required>"),
            BookField::Year => placeholder_or(&self.year, "<required>"),
            BookField::Genre => (format!("< {} >", self.genre()), false),
            BookField::Read => (
                if self.read_status {
                    "[x] Read".to_string()
                } else {
                    "[ ] Unread".to_string()
                },
                false,
            ),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if is_placeholder {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested text field, used for
    /// cursor placement. Selector fields render no cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
            BookField::Year => self.year.chars().count(),
            BookField::Genre | BookField::Read => 0,
        }
    }
}

fn placeholder_or(value: &str, placeholder: &str) -> (String, bool) {
    if value.is_empty() {
        (placeholder.to_string(), true)
    } else {
        (value.to_string(), false)
    }
}

/// State for confirming a permanent removal.
#[derive(Clone)]
pub(crate) struct ConfirmBookRemove {
    pub(crate) id: BookId,
    pub(crate) title: String,
    pub(crate) author: String,
}

impl ConfirmBookRemove {
    /// Build the confirmation state from the book being considered.
    pub(crate) fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_field_accepts_only_up_to_four_digits() {
        let mut form = BookForm::default();
        form.active = BookField::Year;
        assert!(form.push_char('1'));
        assert!(!form.push_char('x'));
        assert!(form.push_char('9'));
        assert!(form.push_char('9'));
        assert!(form.push_char('5'));
        assert!(!form.push_char('0'));
        assert_eq!(form.year, "1995");
    }

    #[test]
    fn parse_inputs_requires_a_numeric_year() {
        let mut form = BookForm::default();
        form.title = "Dune".to_string();
        form.author = "Frank Herbert".to_string();
        assert!(form.parse_inputs().is_err());

        form.year = "1965".to_string();
        let draft = form.parse_inputs().unwrap();
        assert_eq!(draft.publication_year, 1965);
        assert_eq!(draft.genre, Genre::Fiction);
        assert!(!draft.read_status);
    }

    #[test]
    fn genre_selector_wraps_in_both_directions() {
        let mut form = BookForm::default();
        form.active = BookField::Genre;
        assert!(form.cycle_genre(-1));
        assert_eq!(form.genre(), Genre::Other);
        assert!(form.cycle_genre(1));
        assert_eq!(form.genre(), Genre::Fiction);
    }

    #[test]
    fn selectors_only_react_when_focused() {
        let mut form = BookForm::default();
        form.active = BookField::Title;
        assert!(!form.cycle_genre(1));
        assert!(!form.toggle_read_value());

        form.active = BookField::Read;
        assert!(form.toggle_read_value());
        assert!(form.read_status);
    }
}
