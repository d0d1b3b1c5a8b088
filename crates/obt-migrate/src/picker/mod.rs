//! Terminal file picker used when no path is given on the command line.

mod app;
mod ui;

use std::{io, path::PathBuf};

use anyhow::Context as _;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use obt_migrate::{InputSource, Resolution};
use ratatui::{Terminal, backend::CrosstermBackend};

use app::{Action, PickerApp};

/// Interactive [`InputSource`] listing files with one extension, starting in
/// `start_dir`.
pub struct FilePicker {
  start_dir: PathBuf,
  extension: String,
}

impl FilePicker {
  pub fn new(start_dir: PathBuf, extension: impl Into<String>) -> Self {
    Self { start_dir, extension: extension.into() }
  }
}

impl InputSource for FilePicker {
  fn resolve_input_path(&mut self) -> anyhow::Result<Resolution> {
    let mut app = PickerApp::new(self.start_dir.clone(), &self.extension)
      .with_context(|| format!("listing {}", self.start_dir.display()))?;

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
      disable_raw_mode().ok();
      return Err(e).context("entering alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal regardless of result.
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
  }
}

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut PickerApp,
) -> anyhow::Result<Resolution> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Only presses; Windows terminals also report releases.
    if let Event::Key(key) = event::read().context("reading terminal event")?
      && key.kind == KeyEventKind::Press
    {
      match app.handle_key(key) {
        Action::Continue => {}
        Action::Select(path) => return Ok(Resolution::Selected(path)),
        Action::Cancel => return Ok(Resolution::Cancelled),
      }
    }
  }
}
