//! Rank-over-time chart: right panel.

use chrono::DateTime;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  symbols::Marker,
  widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::app::{App, ChartData};

/// Render the selected keyword's rank history into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(track) = app.cursor_track() else {
    draw_placeholder(f, area, "Nothing to chart.");
    return;
  };
  let series = app.selected_series();
  let Some(data) = ChartData::from_series(&series) else {
    draw_placeholder(f, area, "No dated rows for this keyword.");
    return;
  };

  let block = Block::default()
    .title(format!(" {} on {} ", track.keyword, track.website))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let dataset = Dataset::default()
    .name("rank")
    .marker(Marker::Braille)
    .graph_type(GraphType::Line)
    .style(Style::default().fg(Color::Cyan))
    .data(&data.points);

  let x_labels: Vec<String> = [data.x_bounds[0], data.x_bounds[1]]
    .iter()
    .map(|x| date_label(*x))
    .collect();

  // Labels run bottom to top: worst rank first, rank 1 last.
  let top = data.y_bounds[1];
  let y_labels: Vec<String> = [0.0, top / 2.0, top]
    .iter()
    .map(|y| format!("{:.0}", data.rank_at(*y).max(1.0)))
    .collect();

  let chart = Chart::new(vec![dataset])
    .block(block)
    .x_axis(
      Axis::default()
        .title("date")
        .style(Style::default().fg(Color::Gray))
        .bounds(data.x_bounds)
        .labels(x_labels),
    )
    .y_axis(
      Axis::default()
        .title("rank")
        .style(Style::default().fg(Color::Gray))
        .bounds(data.y_bounds)
        .labels(y_labels),
    );

  f.render_widget(chart, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, message: &str) {
  let block = Block::default()
    .title(" Rank ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

fn date_label(seconds: f64) -> String {
  DateTime::from_timestamp(seconds as i64, 0)
    .map(|dt| dt.format("%Y-%m-%d").to_string())
    .unwrap_or_default()
}
