//! Subcommand handlers. Each takes the loaded [`Settings`] and owns its
//! user-facing output.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use chrono::Local;
use rankwatch_agent::{RankAgent, ResolverLookup};
use rankwatch_core::{
  history::{HistoryFilter, HistoryStore, filter},
  observation::{HistoryEntry, RankObservation, Region},
  resolver::{RankResolver, split_keywords},
};
use rankwatch_search::CustomSearchClient;
use rankwatch_store_csv::CsvHistoryStore;
use tracing::info;

use crate::settings::Settings;

const INPUT_WARNING: &str = "Please enter both keywords and website.";

fn resolver(settings: &Settings) -> Result<RankResolver<CustomSearchClient>> {
  let client = CustomSearchClient::new(settings.search.clone())
    .context("failed to set up the search client")?;
  Ok(RankResolver::new(client).with_max_results(settings.search.max_results))
}

// ─── check ────────────────────────────────────────────────────────────────────

/// Resolve every keyword, print one line each, then record the results.
pub async fn check(
  settings: &Settings,
  website: &str,
  region: Region,
  keywords: &str,
) -> Result<()> {
  let website = website.trim();
  let keywords = split_keywords(keywords);
  if keywords.is_empty() || website.is_empty() {
    bail!(INPUT_WARNING);
  }

  let results = resolver(settings)?
    .resolve_many(&keywords, website, &region)
    .await?;

  // One timestamp for the whole batch.
  let recorded_at = Local::now().naive_local();
  let mut observations = Vec::with_capacity(results.len());
  for result in results {
    match result.outcome {
      Ok(rank) => {
        println!("Rank for {website} on '{}': {rank}", result.keyword);
        observations.push(RankObservation {
          recorded_at,
          keyword: result.keyword,
          website: website.to_owned(),
          region: region.clone(),
          rank,
        });
      }
      Err(e) => eprintln!("Error checking '{}': {e}", result.keyword),
    }
  }

  if observations.is_empty() {
    return Ok(());
  }
  let store = CsvHistoryStore::open(&settings.history_path);
  let written = store
    .append(observations)
    .await
    .with_context(|| format!("failed to save history to {}", store.path().display()))?;
  info!(rows = written, path = %store.path().display(), "history saved");
  Ok(())
}

// ─── history ──────────────────────────────────────────────────────────────────

async fn load_history(settings: &Settings) -> Result<Vec<HistoryEntry>> {
  let store = CsvHistoryStore::open(&settings.history_path);
  store
    .load_all()
    .await
    .with_context(|| format!("failed to load history from {}", store.path().display()))
}

/// Print the stored history, optionally narrowed by exact keyword/website.
pub async fn history(
  settings: &Settings,
  keyword: Option<String>,
  website: Option<String>,
) -> Result<()> {
  let entries = load_history(settings).await?;
  if entries.is_empty() {
    println!("No history data found.");
    return Ok(());
  }

  let criteria = HistoryFilter { keyword, website };
  let rows = filter(&entries, &criteria);
  if rows.is_empty() {
    println!("No data matching filters.");
    return Ok(());
  }

  print!("{}", format_table(&rows));
  Ok(())
}

/// Left-aligned columns sized to their widest cell.
fn format_table(rows: &[&HistoryEntry]) -> String {
  let header = ["timestamp", "keyword", "website", "region", "rank"];
  let cells: Vec<[String; 5]> = rows
    .iter()
    .map(|e| {
      [
        e.timestamp.clone(),
        e.keyword.clone(),
        e.website.clone(),
        e.region.to_string(),
        e.rank.to_string(),
      ]
    })
    .collect();

  let mut widths = header.map(str::len);
  for row in &cells {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let mut push_line = |line: Vec<String>| {
    let padded: Vec<String> = line
      .iter()
      .zip(widths)
      .map(|(cell, width)| format!("{cell:<width$}"))
      .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
  };
  push_line(header.iter().map(|h| h.to_string()).collect());
  for row in cells {
    push_line(row.to_vec());
  }
  out
}

// ─── browse ───────────────────────────────────────────────────────────────────

pub async fn browse_entries(
  settings: &Settings,
  website: Option<&str>,
) -> Result<Vec<HistoryEntry>> {
  let entries = load_history(settings).await?;
  info!(rows = entries.len(), website = website.unwrap_or("*"), "history loaded");
  Ok(entries)
}

// ─── export ───────────────────────────────────────────────────────────────────

/// Write the PDF report. Empty-result conditions are informational.
pub async fn export(
  settings: &Settings,
  website: &str,
  dates: usize,
  output: Option<PathBuf>,
) -> Result<()> {
  let website = website.trim();
  if website.is_empty() {
    bail!("Please enter a website to filter before exporting.");
  }

  let entries = load_history(settings).await?;
  let bytes = match rankwatch_report::build_report(&entries, website, dates) {
    Ok(bytes) => bytes,
    Err(e) if e.is_nothing_to_export() => {
      println!("Nothing to export: {e}");
      return Ok(());
    }
    Err(e) => return Err(e).context("failed to build the report"),
  };

  let path = output.unwrap_or_else(|| settings.report_path.clone());
  tokio::fs::write(&path, &bytes)
    .await
    .with_context(|| format!("failed to write report to {}", path.display()))?;
  info!(path = %path.display(), bytes = bytes.len(), "report exported");
  println!("PDF exported to {}", path.display());
  Ok(())
}

// ─── ask ──────────────────────────────────────────────────────────────────────

/// Answer a free-text rank question through the agent.
pub async fn ask(settings: &Settings, region: Region, question: &str) -> Result<()> {
  let lookup = ResolverLookup::new(resolver(settings)?, region);
  let agent = RankAgent::new(settings.agent.clone(), lookup)
    .context("failed to set up the agent")?;
  let answer = agent.ask(question).await.context("agent request failed")?;
  println!("{answer}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(keyword: &str, rank: u32) -> HistoryEntry {
    HistoryEntry {
      timestamp: "2024-01-01 10:00:00".into(),
      keyword:   keyword.into(),
      website:   "example.com".into(),
      region:    Region::Singapore,
      rank,
    }
  }

  #[test]
  fn table_columns_align() {
    let a = entry("seo tools", 3);
    let b = entry("ai", 12);
    let table = format_table(&[&a, &b]);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("timestamp            keyword    website"));
    assert!(lines[1].ends_with("Singapore  3"));
    assert!(lines[2].contains("ai         example.com"));
  }

  #[tokio::test]
  async fn export_without_history_is_informational() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
      history_path: dir.path().join("history.csv"),
      report_path:  dir.path().join("report.pdf"),
      search:       Default::default(),
      agent:        Default::default(),
    };
    export(&settings, "example.com", 5, None).await.unwrap();
    assert!(!settings.report_path.exists());
  }

  #[tokio::test]
  async fn export_writes_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
      history_path: dir.path().join("history.csv"),
      report_path:  dir.path().join("report.pdf"),
      search:       Default::default(),
      agent:        Default::default(),
    };
    let store = CsvHistoryStore::open(&settings.history_path);
    store
      .append(vec![RankObservation {
        recorded_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
          .unwrap()
          .and_hms_opt(10, 0, 0)
          .unwrap(),
        keyword:     "seo tools".into(),
        website:     "example.com".into(),
        region:      Region::Global,
        rank:        rankwatch_core::observation::Rank::Position(3),
      }])
      .await
      .unwrap();

    export(&settings, "example.com", 5, None).await.unwrap();
    let bytes = std::fs::read(&settings.report_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
  }

  #[tokio::test]
  async fn check_rejects_blank_input_before_any_request() {
    let settings = Settings {
      history_path: PathBuf::from("unused.csv"),
      report_path:  PathBuf::from("unused.pdf"),
      search:       Default::default(),
      agent:        Default::default(),
    };
    let err = check(&settings, "example.com", Region::Global, " , ")
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), INPUT_WARNING);
    let err = check(&settings, "  ", Region::Global, "seo").await.unwrap_err();
    assert_eq!(err.to_string(), INPUT_WARNING);
  }
}
