use std::cmp::min;
use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::animation::AnimationDescriptor;
use crate::library::Library;
use crate::models::Book;
use crate::store;

use super::forms::{BookField, BookForm, ConfirmBookRemove};
use super::helpers::{centered_rect, spinner_glyph, surface_error};
use super::screens::{SearchScreen, StatRowKind, StatsScreen};

/// Header space for the application title and collection summary.
const HEADER_HEIGHT: u16 = 4;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per book card in list-style views.
const BOOK_CARD_HEIGHT: u16 = 5;

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what keyboard shortcuts should
/// do.
enum Screen {
    Library,
    Search(SearchScreen),
    Stats(StatsScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    ConfirmRemove(ConfirmBookRemove),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    document_path: PathBuf,
    library: Library,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    animation: Option<AnimationDescriptor>,
    frame: usize,
}

impl App {
    pub fn new(
        document_path: PathBuf,
        library: Library,
        animation: Option<AnimationDescriptor>,
    ) -> Self {
        Self {
            document_path,
            library,
            selected: 0,
            screen: Screen::Library,
            mode: Mode::Normal,
            status: None,
            animation,
            frame: 0,
        }
    }

    /// Advance the decorative header animation. Called on idle event-loop
    /// ticks; a session without a fetched descriptor stays static.
    pub(crate) fn tick(&mut self) {
        if self.animation.is_some() {
            self.frame = self.frame.wrapping_add(1);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Library => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Up => self.move_selection(-1),
                    KeyCode::Down => self.move_selection(1),
                    KeyCode::PageUp => self.move_selection(-5),
                    KeyCode::PageDown => self.move_selection(5),
                    KeyCode::Home => self.select_first(),
                    KeyCode::End => self.select_last(),
                    KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                        self.clear_status();
                        return Ok(Mode::AddingBook(BookForm::default()));
                    }
                    KeyCode::Char('-') => {
                        if let Some(book) = self.current_book() {
                            let confirm = ConfirmBookRemove::from(book);
                            self.clear_status();
                            return Ok(Mode::ConfirmRemove(confirm));
                        } else {
                            self.set_status("No book selected to remove.", StatusKind::Error);
                        }
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => self.toggle_current_read(),
                    KeyCode::Char('f') | KeyCode::Char('F') => {
                        self.clear_status();
                        self.screen = Screen::Search(SearchScreen::new());
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => {
                        self.clear_status();
                        self.screen = Screen::Stats(StatsScreen::new(&self.library));
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Search(ref mut search) => {
                let mut back_to_library = false;
                {
                    let library = &self.library;
                    match code {
                        KeyCode::Esc => back_to_library = true,
                        KeyCode::Up => search.move_selection(-1),
                        KeyCode::Down => search.move_selection(1),
                        KeyCode::PageUp => search.move_selection(-5),
                        KeyCode::PageDown => search.move_selection(5),
                        KeyCode::Home => search.select_first(),
                        KeyCode::End => search.select_last(),
                        KeyCode::Tab | KeyCode::BackTab => search.cycle_field(library),
                        KeyCode::Backspace => search.backspace(library),
                        KeyCode::Char(ch) => search.push_char(ch, library),
                        _ => {}
                    }
                }

                if back_to_library {
                    self.clear_status();
                    self.screen = Screen::Library;
                    self.ensure_selected_in_bounds();
                }
                Ok(Mode::Normal)
            }
            Screen::Stats(ref mut stats) => {
                let mut back_to_library = false;
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('S') => {
                        back_to_library = true;
                    }
                    KeyCode::Up => stats.scroll_by(-1),
                    KeyCode::Down => stats.scroll_by(1),
                    KeyCode::PageUp => stats.scroll_by(-5),
                    KeyCode::PageDown => stats.scroll_by(5),
                    KeyCode::Home => stats.scroll_to_top(),
                    KeyCode::End => stats.scroll_to_bottom(),
                    _ => {}
                }

                if back_to_library {
                    self.clear_status();
                    self.screen = Screen::Library;
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.toggle_field(),
            KeyCode::BackTab => form.toggle_field_back(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Left => {
                let _ = form.cycle_genre(-1) || form.toggle_read_value();
            }
            KeyCode::Right => {
                let _ = form.cycle_genre(1) || form.toggle_read_value();
            }
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                // Space toggles the selectors when they have focus; everywhere
                // else it is ordinary input.
                if ch == ' ' && (form.toggle_read_value() || form.cycle_genre(1)) {
                    form.error = None;
                } else if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmBookRemove) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                // A stale handle closes the dialog too: the record is already
                // gone and there is nothing left to confirm.
                if let Err(err) = self.perform_remove(&confirm) {
                    let message = surface_error(&err);
                    self.set_status(message, StatusKind::Error);
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmRemove(confirm)),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let (header_area, content_area, footer_area) =
            if area.height > HEADER_HEIGHT + FOOTER_HEIGHT {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(HEADER_HEIGHT),
                        Constraint::Min(0),
                        Constraint::Length(FOOTER_HEIGHT),
                    ])
                    .split(area);
                (Some(chunks[0]), chunks[1], Some(chunks[2]))
            } else {
                (None, area, None)
            };

        if let Some(header_area) = header_area {
            self.draw_header(frame, header_area);
        }

        match &self.screen {
            Screen::Library => self.draw_library(frame, content_area),
            Screen::Search(search) => self.draw_search(frame, content_area, search),
            Screen::Stats(stats) => self.draw_stats(frame, content_area, stats),
        }

        if let Some(footer_area) = footer_area {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let read_count = self
            .library
            .books()
            .iter()
            .filter(|book| book.read_status)
            .count();

        let mut title_spans = Vec::new();
        if self.animation.is_some() {
            title_spans.push(Span::styled(
                format!("{} ", spinner_glyph(self.frame)),
                Style::default().fg(Color::Magenta),
            ));
        }
        title_spans.push(Span::styled(
            "Personal Library Manager",
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let summary = format!(
            "{} books • {} read",
            self.library.len(),
            read_count
        );

        let header = Paragraph::new(vec![
            Line::from(title_spans),
            Line::from(Span::styled(summary, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect) {
        if self.library.is_empty() {
            let message = Paragraph::new("No books yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Your Library"));
            frame.render_widget(message, area);
            return;
        }

        self.render_book_cards(frame, area, self.library.books(), self.selected);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, search: &SearchScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let block = Block::default().borders(Borders::ALL).title("Search Books");
        let field_line = Line::from(vec![
            Span::raw("Field: "),
            Span::styled(
                search.field.label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (Tab to change)", Style::default().fg(Color::DarkGray)),
        ]);
        let query_line = Line::from(Span::raw(format!("Search: {}", search.query)));
        let paragraph = Paragraph::new(vec![field_line, query_line]).block(block.clone());
        frame.render_widget(paragraph, chunks[0]);

        let inner = block.inner(chunks[0]);
        let cursor_x = inner.x + "Search: ".len() as u16 + search.query.chars().count() as u16;
        let cursor_y = inner.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));

        if search.query.trim().is_empty() {
            let message = Paragraph::new("Type to search by title, author, or genre.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Results"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        if search.results.is_empty() {
            let message = Paragraph::new("No books match the current search.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Results"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        self.render_book_cards(frame, chunks[1], &search.results, search.selected);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect, stats: &StatsScreen) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Library Statistics");

        let lines: Vec<Line> = stats
            .rows
            .iter()
            .map(|row| match row.kind {
                StatRowKind::Summary => Line::from(row.text.clone()),
                StatRowKind::Heading => Line::from(Span::styled(
                    row.text.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                StatRowKind::Entry => Line::from(Span::raw(row.text.clone())),
                StatRowKind::Blank => Line::from(""),
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((stats.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Adjust   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmRemove(_)) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[n/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Search(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Field   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
            (Screen::Stats(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            _ => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[r]", key_style),
                Span::raw(" Toggle Read   "),
                Span::styled("[f]", key_style),
                Span::raw(" Search   "),
                Span::styled("[s]", key_style),
                Span::raw(" Statistics   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Title", BookField::Title),
            form.build_line("Author", BookField::Author),
            form.build_line("Year", BookField::Year),
            form.build_line("Genre", BookField::Genre),
            form.build_line("Read", BookField::Read),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor = match form.active {
            BookField::Title => Some(("Title: ".len(), 0u16, BookField::Title)),
            BookField::Author => Some(("Author: ".len(), 1, BookField::Author)),
            BookField::Year => Some(("Year: ".len(), 2, BookField::Year)),
            // The selector fields render no cursor.
            BookField::Genre | BookField::Read => None,
        };
        if let Some((prefix, row, field)) = cursor {
            frame.set_cursor_position((
                inner.x + prefix as u16 + form.value_len(field) as u16,
                inner.y + row,
            ));
        }
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Remove '{}' by {} from your library?",
                confirm.title, confirm.author
            )),
            Line::from("This deletes the record from the saved document."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn render_book_cards(&self, frame: &mut Frame, area: Rect, books: &[Book], selected: usize) {
        if books.is_empty() || area.height == 0 {
            return;
        }

        let card_height = BOOK_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = books.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(BOOK_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let book_index = start + idx;
            if book_index >= len {
                break;
            }

            let book = &books[book_index];
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if book_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let title = if book_index == selected {
                format!("▶ {}", book.title)
            } else {
                book.title.clone()
            };

            let read_badge = if book.read_status {
                Span::styled("Read", Style::default().fg(Color::Green))
            } else {
                Span::styled("Unread", Style::default().fg(Color::DarkGray))
            };

            let lines = vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    book.author.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(vec![
                    Span::raw(format!("{} • {}  ", book.publication_year, book.genre)),
                    read_badge,
                    Span::styled(
                        format!("  added {}", book.added_date.format("%Y-%m-%d")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Write the document after a successful mutation. On failure the
    /// in-memory library keeps the change and the footer warns that it is
    /// not durable yet; the next successful save rewrites everything.
    fn persist(&mut self, success: String) {
        match store::save(&self.document_path, &self.library) {
            Ok(()) => self.set_status(success, StatusKind::Info),
            Err(err) => self.set_status(
                format!(
                    "{success} Not saved to disk: {}. The change is kept in memory.",
                    surface_error(&err)
                ),
                StatusKind::Error,
            ),
        }
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        let title = {
            let book = self.library.add(draft)?;
            book.title.clone()
        };
        self.selected = self.library.len().saturating_sub(1);
        self.persist(format!("Added '{title}'."));
        Ok(())
    }

    fn perform_remove(&mut self, confirm: &ConfirmBookRemove) -> Result<()> {
        let removed = self.library.remove(confirm.id)?;
        self.ensure_selected_in_bounds();
        self.persist(format!("Removed '{}'.", removed.title));
        Ok(())
    }

    fn toggle_current_read(&mut self) {
        let target = self
            .current_book()
            .map(|book| (book.id, book.title.clone()));
        if let Some((id, title)) = target {
            match self.library.toggle_read(id) {
                Ok(true) => self.persist(format!("Marked '{title}' as read.")),
                Ok(false) => self.persist(format!("Marked '{title}' as unread.")),
                Err(err) => self.set_status(err.to_string(), StatusKind::Error),
            }
        } else {
            self.set_status("No book selected.", StatusKind::Error);
        }
    }

    fn current_book(&self) -> Option<&Book> {
        self.library.books().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        if self.library.is_empty() {
            return;
        }
        let len = self.library.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    fn select_first(&mut self) {
        if !self.library.is_empty() {
            self.selected = 0;
        }
    }

    fn select_last(&mut self) {
        if !self.library.is_empty() {
            self.selected = self.library.len() - 1;
        }
    }

    fn ensure_selected_in_bounds(&mut self) {
        if self.library.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.library.len() {
            self.selected = self.library.len() - 1;
        }
    }
}
