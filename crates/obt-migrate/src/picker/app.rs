//! File picker state machine and key dispatcher.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use obt_migrate::input::has_extension;

// ─── Entries ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  /// The `..` row.
  Parent,
  Dir,
  File,
}

/// One row of the listing.
#[derive(Debug, Clone)]
pub struct Entry {
  pub name:     String,
  pub path:     PathBuf,
  pub kind:     EntryKind,
  pub size:     u64,
  pub modified: Option<DateTime<Local>>,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Continue,
  Select(PathBuf),
  Cancel,
}

/// List `dir`: a `..` row when it has a parent, then sub-directories, then
/// files with `extension`. Hidden entries are left out.
pub fn read_entries(dir: &Path, extension: &str) -> io::Result<Vec<Entry>> {
  let mut dirs = Vec::new();
  let mut files = Vec::new();

  for item in fs::read_dir(dir)? {
    let item = item?;
    let name = item.file_name().to_string_lossy().into_owned();
    if name.starts_with('.') {
      continue;
    }
    // Follows symlinks; broken links are skipped.
    let Ok(meta) = fs::metadata(item.path()) else {
      continue;
    };
    let entry = Entry {
      name,
      path: item.path(),
      kind: if meta.is_dir() { EntryKind::Dir } else { EntryKind::File },
      size: meta.len(),
      modified: meta.modified().ok().map(DateTime::<Local>::from),
    };
    if entry.kind == EntryKind::Dir {
      dirs.push(entry);
    } else if has_extension(&entry.path, extension) {
      files.push(entry);
    }
  }

  let by_name = |a: &Entry, b: &Entry| a.name.to_lowercase().cmp(&b.name.to_lowercase());
  dirs.sort_by(by_name);
  files.sort_by(by_name);

  let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
  if let Some(parent) = dir.parent() {
    entries.push(Entry {
      name:     "..".into(),
      path:     parent.to_path_buf(),
      kind:     EntryKind::Parent,
      size:     0,
      modified: None,
    });
  }
  entries.extend(dirs);
  entries.extend(files);
  Ok(entries)
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level picker state.
pub struct PickerApp {
  /// Directory currently listed.
  pub dir: PathBuf,

  /// Accepted file extension, without the dot.
  pub extension: String,

  pub entries: Vec<Entry>,

  /// Current fuzzy-filter string.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* entries.
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl PickerApp {
  /// Create a picker listing `dir`.
  pub fn new(dir: PathBuf, extension: &str) -> io::Result<Self> {
    let entries = read_entries(&dir, extension)?;
    Ok(Self {
      dir,
      extension: extension.to_owned(),
      entries,
      filter: String::new(),
      filter_active: false,
      cursor: 0,
      status_msg: String::new(),
    })
  }

  /// Switch to `dir`. On failure the current listing stays and the error is
  /// shown in the status bar.
  fn change_dir(&mut self, dir: PathBuf) {
    match read_entries(&dir, &self.extension) {
      Ok(entries) => {
        self.dir = dir;
        self.entries = entries;
        self.filter.clear();
        self.filter_active = false;
        self.cursor = 0;
        self.status_msg.clear();
      }
      Err(e) => self.status_msg = format!("Cannot open {}: {e}", dir.display()),
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Entries matching the current filter; `..` is always kept.
  pub fn filtered_entries(&self) -> Vec<&Entry> {
    if self.filter.is_empty() {
      return self.entries.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .entries
      .iter()
      .filter(|e| {
        e.kind == EntryKind::Parent || matcher.fuzzy_match(&e.name, &self.filter).is_some()
      })
      .collect()
  }

  /// The entry under the cursor in the filtered view, if any.
  pub fn cursor_entry(&self) -> Option<&Entry> {
    self.filtered_entries().get(self.cursor).copied()
  }

  /// Number of selectable files in the current directory.
  pub fn file_count(&self) -> usize {
    self.entries.iter().filter(|e| e.kind == EntryKind::File).count()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key press.
  pub fn handle_key(&mut self, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Action::Cancel;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Action::Continue;
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Action::Cancel,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_entries().len();
        if self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
      KeyCode::End | KeyCode::Char('G') => {
        self.cursor = self.filtered_entries().len().saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(entry) = self.cursor_entry().cloned() {
          return self.open(entry);
        }
      }
      KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
          self.change_dir(parent);
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.cursor = 0;
      }

      _ => {}
    }
    Action::Continue
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        // Jump past `..` to the first real match.
        let list = self.filtered_entries();
        self.cursor = list
          .iter()
          .position(|e| e.kind != EntryKind::Parent)
          .unwrap_or(0);
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.cursor = 0;
      }
      _ => {}
    }
  }

  fn open(&mut self, entry: Entry) -> Action {
    match entry.kind {
      EntryKind::Parent | EntryKind::Dir => {
        self.change_dir(entry.path);
        Action::Continue
      }
      EntryKind::File => Action::Select(entry.path),
    }
  }
}
