//! Picker rendering: header, listing, status bar.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::app::{EntryKind, PickerApp};

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &PickerApp) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // listing
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_list(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &PickerApp) {
  let line = Line::from(vec![
    Span::styled(
      format!(" Select .{} file ", app.extension),
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      app.dir.display().to_string(),
      Style::default().fg(Color::Gray),
    ),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Listing ──────────────────────────────────────────────────────────────────

fn draw_list(f: &mut Frame, area: Rect, app: &PickerApp) {
  let filtered = app.filtered_entries();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Files ({}/{}) ", filtered.len(), app.entries.len())
  } else {
    format!(" Files ({}) ", app.file_count())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Filter bar on the last inner line.
  if (app.filter_active || !app.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height -= 1;

    let text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|entry| {
      let (icon, style) = match entry.kind {
        EntryKind::Parent => ("↑ ", Style::default().fg(Color::Cyan)),
        EntryKind::Dir => ("▸ ", Style::default().fg(Color::Cyan)),
        EntryKind::File => ("  ", Style::default()),
      };
      let mut spans = vec![Span::styled(icon, style), Span::styled(entry.name.clone(), style)];
      if entry.kind == EntryKind::File {
        let modified = entry
          .modified
          .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
          .unwrap_or_default();
        spans.push(Span::styled(
          format!("  {}  {modified}", human_size(entry.size)),
          Style::default().fg(Color::DarkGray),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(if filtered.is_empty() { None } else { Some(app.cursor) });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

fn human_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
  let mut size = bytes as f64;
  let mut unit = 0;
  while size >= 1024.0 && unit + 1 < UNITS.len() {
    size /= 1024.0;
    unit += 1;
  }
  if unit == 0 {
    format!("{bytes} B")
  } else {
    format!("{size:.1} {}", UNITS[unit])
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &PickerApp) {
  let (mode_label, hints) = if app.filter_active {
    ("SEARCH", "Type to filter  Esc clear  Enter done")
  } else {
    ("BROWSE", "↑↓/jk move  Enter open/select  ← parent  / search  q cancel")
  };

  let status = if app.status_msg.is_empty() { hints } else { app.status_msg.as_str() };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
