//! History browser rendering: title bar, keyword list, chart, status bar.

pub mod keyword_list;
pub mod rank_chart;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::app::App;

pub fn draw(f: &mut Frame, app: &App) {
  let [title, body, status] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(0),
    Constraint::Length(1),
  ])
  .areas(f.area());

  draw_title(f, title, app);

  let [list, chart] =
    Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).areas(body);
  keyword_list::draw(f, list, app);
  rank_chart::draw(f, chart, app);

  f.render_widget(
    Paragraph::new(status_line(app)).style(Style::default().bg(Color::Black)),
    status,
  );
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
  let bar = Style::default().bg(Color::DarkGray);
  let scope = app.website.as_deref().unwrap_or("all websites");

  let left = Line::from(vec![
    Span::raw(" rankwatch ").bold(),
    Span::raw(format!(" {scope}")).fg(Color::White),
  ]);
  let right = Line::from(format!("{} ", Local::now().format("%Y-%m-%d"))).fg(Color::Gray);

  f.render_widget(Paragraph::new(left).style(bar), area);
  f.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
}

fn status_line(app: &App) -> Line<'static> {
  let (mode, hints) = if app.filter_active {
    ("FILTER", "type to filter  Enter apply  Esc cancel")
  } else {
    ("BROWSE", "↑↓/jk select  g/G first/last  / filter  q quit")
  };

  let message = if !app.status_msg.is_empty() {
    app.status_msg.clone()
  } else if let Some((ts, rank)) = app.selected_series().last() {
    format!("latest rank {rank} on {}   {hints}", ts.format("%Y-%m-%d"))
  } else {
    hints.to_owned()
  };

  Line::from(vec![
    Span::styled(
      format!(" {mode} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(format!("  {message}")).fg(Color::DarkGray),
  ])
}
