//! PDF rank reports for rankwatch.
//!
//! [`build_report`] pivots loaded history into a
//! [`RankMatrix`](rankwatch_core::matrix::RankMatrix) and renders it as an A4
//! document whose table header repeats on every page.

pub mod error;
pub mod layout;
pub mod pdf;

pub use error::{Error, Result};
pub use pdf::render_pdf;

use rankwatch_core::{matrix::RankMatrix, observation::HistoryEntry};

/// Build the report document for `website` over its `recent_dates` most
/// recent observation dates.
///
/// Empty-result conditions surface as core errors for which
/// [`rankwatch_core::Error::is_nothing_to_export`] is true; no document is
/// produced in that case.
pub fn build_report(
  entries: &[HistoryEntry],
  website: &str,
  recent_dates: usize,
) -> Result<Vec<u8>> {
  let matrix = RankMatrix::build(entries, website, recent_dates)?;
  render_pdf(&matrix)
}
