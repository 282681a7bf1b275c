//! Binary entry point that glues the JSON-backed domain model to the TUI.
//! The bootstrapping pipeline: resolve the document path, hydrate the
//! library (an absent or damaged document simply starts empty), attempt the
//! one-shot decorative animation fetch, and drive the Ratatui event loop
//! until the user exits.

use personal_library_manager::{document_path, fetch_animation, load, run_app, App};

/// Initialize persistence, load the catalog, and launch the Ratatui event
/// loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for
/// example a machine with no resolvable home directory) to the terminal
/// instead of crashing silently. Everything after startup reports through
/// the footer instead of failing the process.
fn main() -> anyhow::Result<()> {
    let path = document_path()?;
    let library = load(&path);
    let animation = fetch_animation();

    let mut app = App::new(path, library, animation);
    run_app(&mut app)
}
