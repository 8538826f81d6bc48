//! Rendering a [`RankMatrix`] to PDF bytes with `printpdf`.

use printpdf::{
  BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
  PdfLayerReference, Point, Rect, Rgb, path::PaintMode,
};
use rankwatch_core::matrix::RankMatrix;
use tracing::debug;

use crate::{
  Error, Result,
  layout::{
    Columns, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, ROW_HEIGHT, TITLE_BLOCK, fit_text, plan_pages,
    rows_that_fit, text_width,
  },
};

const TITLE: &str = "Website Rank Report";
const TABLE_HEADING: &str = "Keyword Rank Table";
const LAYER: &str = "Layer 1";

fn grey() -> Color { Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None)) }

fn white_smoke() -> Color { Color::Rgb(Rgb::new(0.96, 0.96, 0.96, None)) }

fn black() -> Color { Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)) }

struct Fonts {
  regular: IndirectFontRef,
  bold:    IndirectFontRef,
}

/// Render `matrix` as an A4 report and return the document bytes.
pub fn render_pdf(matrix: &RankMatrix) -> Result<Vec<u8>> {
  let (doc, first_page, first_layer) =
    PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
  let fonts = Fonts {
    regular: doc
      .add_builtin_font(BuiltinFont::Helvetica)
      .map_err(|e| Error::Pdf(e.to_string()))?,
    bold:    doc
      .add_builtin_font(BuiltinFont::HelveticaBold)
      .map_err(|e| Error::Pdf(e.to_string()))?,
  };

  let header = matrix.header();
  let body = matrix.body();
  let columns = Columns::for_dates(matrix.dates.len());

  let first_top = PAGE_HEIGHT - MARGIN - TITLE_BLOCK;
  let later_top = PAGE_HEIGHT - MARGIN;
  let pages = plan_pages(body.len(), rows_that_fit(first_top), rows_that_fit(later_top));
  debug!(
    website = %matrix.website,
    rows = body.len(),
    pages = pages.len(),
    "rendering rank report"
  );

  let mut layer = doc.get_page(first_page).get_layer(first_layer);
  draw_title_block(&layer, &fonts, matrix);

  for (index, range) in pages.into_iter().enumerate() {
    let top = if index == 0 {
      first_top
    } else {
      layer = new_page(&doc);
      later_top
    };
    draw_table(&layer, &fonts, &columns, top, &header, &body[range]);
  }

  doc.save_to_bytes().map_err(|e| Error::Pdf(e.to_string()))
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
  let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
  doc.get_page(page).get_layer(layer)
}

fn draw_title_block(layer: &PdfLayerReference, fonts: &Fonts, matrix: &RankMatrix) {
  let left = MARGIN;
  let mut y = PAGE_HEIGHT - MARGIN - 8.0;

  layer.set_fill_color(black());
  let title_size = 20.0;
  let title_x = (PAGE_WIDTH - text_width(TITLE, title_size)) / 2.0;
  layer.use_text(TITLE, title_size, Mm(title_x), Mm(y), &fonts.bold);

  y -= 12.0;
  layer.use_text(
    pdf_text(&format!("Website: {}", matrix.website)),
    13.0,
    Mm(left),
    Mm(y),
    &fonts.bold,
  );

  y -= 7.0;
  layer.use_text(
    pdf_text(&format!("Region(s): {}", matrix.region_summary())),
    13.0,
    Mm(left),
    Mm(y),
    &fonts.bold,
  );

  y -= 10.0;
  layer.use_text(TABLE_HEADING, 11.0, Mm(left), Mm(y), &fonts.bold);
}

/// Draw the header row at `top`, then `rows` beneath it, with a full grid.
fn draw_table(
  layer: &PdfLayerReference,
  fonts: &Fonts,
  columns: &Columns,
  top: f32,
  header: &[String],
  rows: &[Vec<String>],
) {
  let edges = columns.edges(MARGIN);
  let right = MARGIN + columns.total();
  let font_size = columns.font_size();
  let bottom = top - ROW_HEIGHT * (rows.len() + 1) as f32;

  // Header background.
  layer.set_fill_color(grey());
  layer.add_rect(
    Rect::new(Mm(MARGIN), Mm(top - ROW_HEIGHT), Mm(right), Mm(top))
      .with_mode(PaintMode::Fill),
  );

  layer.set_fill_color(white_smoke());
  draw_row(layer, &fonts.bold, &edges, top, header, font_size);

  layer.set_fill_color(black());
  for (i, row) in rows.iter().enumerate() {
    let row_top = top - ROW_HEIGHT * (i + 1) as f32;
    draw_row(layer, &fonts.regular, &edges, row_top, row, font_size);
  }

  // Grid.
  layer.set_outline_color(black());
  layer.set_outline_thickness(1.0);
  for i in 0..=rows.len() + 1 {
    let y = top - ROW_HEIGHT * i as f32;
    layer.add_line(segment((MARGIN, y), (right, y)));
  }
  for x in &edges {
    layer.add_line(segment((*x, top), (*x, bottom)));
  }
}

/// Centre each cell's text horizontally and vertically within its column.
fn draw_row(
  layer: &PdfLayerReference,
  font: &IndirectFontRef,
  edges: &[f32],
  row_top: f32,
  cells: &[String],
  font_size: f32,
) {
  let baseline = row_top - ROW_HEIGHT / 2.0 - font_size * 0.352_778 / 3.0;
  for (cell, bounds) in cells.iter().zip(edges.windows(2)) {
    let width = bounds[1] - bounds[0];
    let text = fit_text(&pdf_text(cell), width - 2.0, font_size);
    let x = bounds[0] + (width - text_width(&text, font_size)) / 2.0;
    layer.use_text(text, font_size, Mm(x), Mm(baseline), font);
  }
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
  Line {
    points:    vec![
      (Point::new(Mm(from.0), Mm(from.1)), false),
      (Point::new(Mm(to.0), Mm(to.1)), false),
    ],
    is_closed: false,
  }
}

/// Built-in PDF fonts only cover Latin-1; replace anything else.
fn pdf_text(s: &str) -> String {
  s.chars()
    .map(|c| if (c as u32) < 0x100 && !c.is_control() { c } else { '?' })
    .collect()
}
