#![deny(unsafe_code)]

//! errhint TUI: interactive error-hint search.

mod app;
mod keymap;
mod panels;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use errhint_catalog::AppConfig;
use errhint_core::{DiagnosticsLog, ErrorHintProvider, HintSearchEngine};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::App;

/// Entries kept by the in-memory log panel.
const LOG_CAPACITY: usize = 1000;

/// errhint-tui: search error hints interactively.
#[derive(Parser)]
#[command(name = "errhint-tui", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "errhint.toml")]
    config: PathBuf,

    /// Hint catalog to use instead of the configured one.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_found) = load_config(&cli.config).await?;

    // Events go to the log panel; stdout belongs to the terminal UI.
    let diagnostics = DiagnosticsLog::new(LOG_CAPACITY);
    let reader = diagnostics.reader();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(diagnostics)
        .init();

    if !config_found {
        report_missing_config(&cli.config);
    }

    let engine = match &cli.catalog {
        Some(path) => HintSearchEngine::new(path.clone(), config.catalog.reload),
        None => {
            let base = cli.config.parent().unwrap_or_else(|| Path::new(""));
            HintSearchEngine::from_config(&config, base)
        }
    };
    info!(
        catalog = ?engine.catalog_path(),
        reload = ?config.catalog.reload,
        "Starting errhint TUI"
    );

    let mut app = App::new(ErrorHintProvider::new(engine), reader);

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app);

    // Restore the terminal even if the loop failed.
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist.
/// The flag reports whether the file was found.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if path.exists() {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("invalid config at '{}'", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}

fn report_missing_config(path: &Path) {
    info!(path = %path.display(), "Config file not found, using defaults");
}
