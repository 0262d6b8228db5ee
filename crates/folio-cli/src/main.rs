//! `folio`: terminal viewer and admin commands for a locally stored
//! portfolio.
//!
//! # Usage
//!
//! ```
//! folio                          # full-screen viewer
//! folio send --name Ann --email ann@example.com --message "Hello"
//! folio messages --json
//! folio --config ~/.config/folio/folio.toml theme toggle
//! ```

mod app;
mod backend;
mod commands;
mod config;
mod ui;

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use backend::Backend;
use clap::{Parser, Subcommand};
use commands::ThemeChoice;
use config::FolioConfig;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::message::NewMessage;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Locally stored personal portfolio")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "folio.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Open the full-screen viewer (default).
  View,

  /// Store a contact message.
  Send {
    #[arg(long)]
    name:    String,
    #[arg(long)]
    email:   String,
    #[arg(long)]
    message: String,
  },

  /// Print stored contact messages.
  Messages {
    /// Print as JSON instead of text.
    #[arg(long)]
    json: bool,
  },

  /// Show or change the theme.
  Theme {
    #[arg(value_enum)]
    choice: Option<ThemeChoice>,
  },

  /// Print the portfolio document as JSON.
  Show,

  /// Replace the portfolio document with one read from a JSON file.
  Import { file: PathBuf },

  /// Discard the stored portfolio document.
  Reset,

  /// List stored keys.
  Keys,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let cfg = FolioConfig::load(&cli.config)?;
  let command = cli.command.unwrap_or(Command::View);

  if matches!(command, Command::View) {
    init_tracing_for_viewer(&cfg)?;
  } else {
    init_tracing(io::stderr);
  }

  let backend = Backend::open(&cfg).await;

  match command {
    Command::View => run_viewer(backend).await,
    Command::Send { name, email, message } => {
      commands::send(&backend, NewMessage::new(name, email, message)).await
    }
    Command::Messages { json } => commands::messages(&backend, json).await,
    Command::Theme { choice } => commands::theme(&backend, choice).await,
    Command::Show => commands::show(&backend).await,
    Command::Import { file } => commands::import(&backend, &file).await,
    Command::Reset => commands::reset(&backend).await,
    Command::Keys => commands::keys(&backend).await,
  }
}

// ─── Tracing ──────────────────────────────────────────────────────────────────

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

fn init_tracing<W>(writer: W)
where
  W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(writer)
    .init();
}

/// The viewer owns the terminal, so it logs to `log_path` or not at all.
fn init_tracing_for_viewer(cfg: &FolioConfig) -> Result<()> {
  let Some(path) = &cfg.log_path else {
    return Ok(());
  };
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Viewer ───────────────────────────────────────────────────────────────────

async fn run_viewer(backend: Backend) -> Result<()> {
  let durable = backend.is_durable();
  let mut app = App::load(backend, durable).await;

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let term_backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(term_backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<Backend>,
) -> Result<()> {
  loop {
    let size = terminal.size().context("reading terminal size")?;
    let page = ui::page_area(Rect::new(0, 0, size.width, size.height));
    app.sync_viewport(ui::section_heights(app, page.width), page.height);

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The frame above shows "Sending..."; now do the write.
    app.submit_pending().await;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
