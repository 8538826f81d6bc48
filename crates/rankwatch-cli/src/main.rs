//! `rankwatch`: check, record and report website search ranks.
//!
//! # Usage
//!
//! ```text
//! rankwatch check --website example.com --region Singapore "seo tools, rank tracker"
//! rankwatch history --website example.com
//! rankwatch browse --website example.com
//! rankwatch export --website example.com --dates 5
//! rankwatch ask "Where does openai.com rank for AI tools?"
//! ```
//!
//! Settings come from `rankwatch.toml` (or `--config`) and `RANKWATCH__*`
//! environment variables; a `.env` file is loaded first.

mod app;
mod commands;
mod settings;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rankwatch_core::{matrix::DEFAULT_RECENT_DATES, observation::Region};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rankwatch", version, about = "Website search-rank tracker")]
struct Cli {
  /// Path to the TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "rankwatch.toml")]
  config: PathBuf,

  /// Override the history file path.
  #[arg(long, env = "RANKWATCH_HISTORY")]
  history: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Resolve ranks for comma-separated keywords and record them.
  Check {
    #[arg(short, long)]
    website:  String,
    /// Global, Singapore, Thailand, Malaysia, Indonesia, or any configured
    /// region name.
    #[arg(short, long, default_value = "Global")]
    region:   Region,
    /// e.g. "seo tools, rank tracker"
    keywords: String,
  },

  /// Print recorded history, optionally filtered.
  History {
    #[arg(short, long)]
    keyword: Option<String>,
    #[arg(short, long)]
    website: Option<String>,
  },

  /// Browse rank history as a chart in the terminal.
  Browse {
    #[arg(short, long)]
    website: Option<String>,
  },

  /// Export a PDF report of the most recent dates for one website.
  Export {
    #[arg(short, long)]
    website: String,
    #[arg(short, long, default_value_t = DEFAULT_RECENT_DATES)]
    dates:   usize,
    #[arg(short, long, value_name = "FILE")]
    output:  Option<PathBuf>,
  },

  /// Ask a natural-language rank question.
  Ask {
    #[arg(short, long, default_value = "Global")]
    region:   Region,
    question: String,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // A missing .env is fine.
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let mut settings = Settings::load(&cli.config)?;
  if let Some(history) = cli.history {
    settings.history_path = history;
  }

  match cli.command {
    Command::Check { website, region, keywords } => {
      commands::check(&settings, &website, region, &keywords).await
    }
    Command::History { keyword, website } => {
      commands::history(&settings, keyword, website).await
    }
    Command::Browse { website } => {
      let entries = commands::browse_entries(&settings, website.as_deref()).await?;
      run_tui(App::new(entries, website))
    }
    Command::Export { website, dates, output } => {
      commands::export(&settings, &website, dates, output).await
    }
    Command::Ask { region, question } => {
      commands::ask(&settings, region, &question).await
    }
  }
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

fn run_tui(mut app: App) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event without starving the runtime's other workers.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
