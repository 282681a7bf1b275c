use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Glyphs cycled in the header while the decorative animation is active.
const SPINNER_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

/// Pick the spinner glyph for the current idle-tick frame.
pub(crate) fn spinner_glyph(frame: usize) -> char {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Render a proportional bar for the statistics breakdowns. `max` is the
/// largest count in the section so the widest bar always fills the full
/// width.
pub(crate) fn count_bar(count: usize, max: usize, width: usize) -> String {
    if width == 0 || max == 0 {
        return String::new();
    }
    let filled = ((count * width) + max - 1) / max;
    let filled = filled.min(width).max(if count > 0 { 1 } else { 0 });
    let mut bar = String::with_capacity(width);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..width {
        bar.push('░');
    }
    bar
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
