//! Keyword pane. The filter query, when set, shows on the bottom border.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style, Stylize},
  text::Line,
  widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let tracks = app.filtered_tracks();
  let filtering = app.filter_active || !app.filter.is_empty();

  let count = if filtering {
    format!(" Keywords {}/{} ", tracks.len(), app.tracks.len())
  } else {
    format!(" Keywords {} ", app.tracks.len())
  };
  let mut block = Block::default()
    .title(count)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  if filtering {
    let cursor = if app.filter_active { "_" } else { "" };
    block = block.title_bottom(Line::from(format!(" /{}{cursor} ", app.filter)).fg(Color::Yellow));
  }

  let show_website = app.website.is_none();
  let items: Vec<ListItem> = tracks
    .iter()
    .map(|t| ListItem::new(t.label(show_website)))
    .collect();

  let mut state = ListState::default().with_selected((!tracks.is_empty()).then_some(app.list_cursor));
  let list = List::new(items).block(block).highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  f.render_stateful_widget(list, area, &mut state);
}
