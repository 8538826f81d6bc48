//! Page geometry and table pagination, kept separate from drawing so it can
//! be tested without parsing PDF output.
//!
//! All lengths are millimetres on an A4 portrait page, origin bottom-left.

use std::ops::Range;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const ROW_HEIGHT: f32 = 7.0;

/// Vertical space taken by the title block on the first page.
pub const TITLE_BLOCK: f32 = 42.0;

const KEYWORD_COLUMN: f32 = 60.0;
const MIN_KEYWORD_COLUMN: f32 = 40.0;
const MIN_DATE_COLUMN: f32 = 18.0;

/// Millimetres per point.
const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.52;

/// Column widths for a table with one keyword column and `dates` date columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
  pub widths: Vec<f32>,
}

impl Columns {
  pub fn for_dates(dates: usize) -> Self {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    if dates == 0 {
      return Self { widths: vec![usable] };
    }
    let mut keyword = KEYWORD_COLUMN;
    let mut date = (usable - keyword) / dates as f32;
    if date < MIN_DATE_COLUMN {
      keyword = MIN_KEYWORD_COLUMN;
      date = (usable - keyword) / dates as f32;
    }
    let mut widths = vec![keyword];
    widths.extend(std::iter::repeat_n(date, dates));
    Self { widths }
  }

  pub fn total(&self) -> f32 { self.widths.iter().sum() }

  /// Left edge of each column followed by the table's right edge.
  pub fn edges(&self, left: f32) -> Vec<f32> {
    let mut x = left;
    let mut edges = vec![x];
    for w in &self.widths {
      x += w;
      edges.push(x);
    }
    edges
  }

  /// Font size that fits the narrowest column's typical content.
  pub fn font_size(&self) -> f32 {
    let narrowest = self.widths.iter().copied().fold(f32::INFINITY, f32::min);
    if narrowest < 22.0 { 7.0 } else { 9.0 }
  }
}

/// Number of body rows that fit below the header row on a page whose table
/// starts `top` millimetres from the bottom edge.
pub fn rows_that_fit(top: f32) -> usize {
  let space = top - MARGIN - ROW_HEIGHT;
  if space <= 0.0 {
    return 0;
  }
  (space / ROW_HEIGHT).floor() as usize
}

/// Split `rows` body rows into per-page ranges. The first page holds at most
/// `first_page` rows, later pages `per_page`. Always yields at least one page;
/// every page gets the header row when drawn.
pub fn plan_pages(rows: usize, first_page: usize, per_page: usize) -> Vec<Range<usize>> {
  let per_page = per_page.max(1);
  let mut pages = Vec::new();
  let first = rows.min(first_page);
  pages.push(0..first);
  let mut start = first;
  while start < rows {
    let end = (start + per_page).min(rows);
    pages.push(start..end);
    start = end;
  }
  pages
}

/// Approximate rendered width of `text` in millimetres.
pub fn text_width(text: &str, font_size: f32) -> f32 {
  text.chars().count() as f32 * font_size * AVG_GLYPH_EM * PT_TO_MM
}

/// Shorten `text` with a trailing `...` until it fits `width` millimetres.
pub fn fit_text(text: &str, width: f32, font_size: f32) -> String {
  if text_width(text, font_size) <= width {
    return text.to_owned();
  }
  let mut chars: Vec<char> = text.chars().collect();
  while !chars.is_empty() {
    chars.pop();
    let candidate: String = chars.iter().collect::<String>() + "...";
    if text_width(&candidate, font_size) <= width {
      return candidate;
    }
  }
  String::new()
}
