#![deny(unsafe_code)]

//! errhint CLI: look up remediation hints for an error message.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use errhint_catalog::{AppConfig, Catalog};
use errhint_core::{ErrorHintProvider, HintSearchEngine, SearchOutcome, SearchResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// errhint: find known remediation hints for an error message.
#[derive(Parser)]
#[command(name = "errhint", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "errhint.toml")]
    config: PathBuf,

    /// Hint catalog to use instead of the configured one.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for hints whose error type contains MESSAGE.
    Search {
        /// The error message (or fragment) to look up.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Print results as a JSON array of strings.
        #[arg(long)]
        json: bool,
    },

    /// Print every hint in the catalog.
    List {
        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate the hint catalog.
    Check,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_found) = load_config(&cli.config).await?;

    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if !config_found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    let catalog_path = catalog_path(&cli, &config);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Search { message, json } => {
            let message = message.join(" ");
            let engine = HintSearchEngine::new(catalog_path, config.catalog.reload);
            cmd_search(engine, &message, json, &mut stdout)?
        }
        Commands::List { json } => cmd_list(&catalog_path, json, &mut stdout).await?,
        Commands::Check => cmd_check(&catalog_path, &mut stdout).await?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show, &mut stdout)?,
    }

    Ok(())
}

fn cmd_search(
    engine: HintSearchEngine,
    message: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut provider = ErrorHintProvider::new(engine);
    let outcome = provider
        .search_error(message)
        .context("could not load hints")?;

    match outcome {
        SearchOutcome::Skipped => {
            writeln!(out, "Nothing to search for: enter an error message.")?;
        }
        SearchOutcome::Searched { .. } => {
            render_results(&provider.children(None), json, out)?;
        }
    }
    Ok(())
}

fn render_results(results: &[SearchResult], json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(results)?)?;
    } else if results.is_empty() {
        writeln!(out, "No hints found")?;
    } else {
        for result in results {
            writeln!(out, "{result}")?;
        }
    }
    Ok(())
}

async fn cmd_list(catalog_path: &Path, json: bool, out: &mut dyn Write) -> Result<()> {
    let catalog = Catalog::load_async(catalog_path)
        .await
        .context("could not load hints")?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(catalog.records())?)?;
    } else {
        for record in catalog.records() {
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

async fn cmd_check(catalog_path: &Path, out: &mut dyn Write) -> Result<()> {
    let catalog = Catalog::load_async(catalog_path)
        .await
        .context("hint catalog is invalid")?;
    writeln!(
        out,
        "Catalog at '{}' is valid ({} hints).",
        catalog_path.display(),
        catalog.len()
    )?;
    Ok(())
}

fn cmd_config(
    config_path: &Path,
    config: &AppConfig,
    show: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        writeln!(out, "{toml_str}")?;
    } else {
        writeln!(out, "Configuration at '{}' is valid.", config_path.display())?;
    }
    Ok(())
}

/// `--catalog` wins; otherwise the configured path relative to the config
/// file's directory.
fn catalog_path(cli: &Cli, config: &AppConfig) -> PathBuf {
    match &cli.catalog {
        Some(path) => path.clone(),
        None => {
            let base = cli.config.parent().unwrap_or_else(|| Path::new(""));
            config.resolve_catalog_path(base)
        }
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use errhint_catalog::ReloadPolicy;
    use errhint_test_utils::catalog::TestCatalog;
    use errhint_test_utils::config::TestConfigBuilder;
    use pretty_assertions::assert_eq;

    fn run_search(fixture: &TestCatalog, message: &str, json: bool) -> Result<String> {
        let engine = HintSearchEngine::new(fixture.path(), ReloadPolicy::Cached);
        let mut out = Vec::new();
        cmd_search(engine, message, json, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from(["errhint", "search", "Null", "Pointer"]).unwrap();
        match cli.command {
            Commands::Search { message, json } => {
                assert_eq!(message, vec!["Null", "Pointer"]);
                assert!(!json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_search_requires_message() {
        assert!(Cli::try_parse_from(["errhint", "search"]).is_err());
    }

    #[test]
    fn test_search_prints_matches() {
        let fixture = TestCatalog::sample();
        let out = run_search(&fixture, "Exception", false).unwrap();
        assert_eq!(out, "NullPointerException: Check for null before use\n");
    }

    #[test]
    fn test_search_no_matches() {
        let fixture = TestCatalog::sample();
        assert_eq!(run_search(&fixture, "zzz", false).unwrap(), "No hints found\n");
    }

    #[test]
    fn test_search_json_output() {
        let fixture = TestCatalog::sample();
        let out = run_search(&fixture, "Index", true).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec!["IndexOutOfBounds: Check array bounds"]);
    }

    #[test]
    fn test_search_blank_message_is_skipped() {
        let fixture = TestCatalog::sample();
        let out = run_search(&fixture, "   ", false).unwrap();
        assert!(out.starts_with("Nothing to search for"));
    }

    #[test]
    fn test_search_missing_catalog_reports_context() {
        let engine = HintSearchEngine::new("/nonexistent/hints.yml", ReloadPolicy::Cached);
        let err = cmd_search(engine, "Null", false, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "could not load hints");
        assert!(format!("{err:#}").contains("not found"));
    }

    #[tokio::test]
    async fn test_list_prints_all_records() {
        let fixture = TestCatalog::sample();
        let mut out = Vec::new();
        cmd_list(fixture.path(), false, &mut out).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "NullPointerException: Check for null before use\nIndexOutOfBounds: Check array bounds\n"
        );
    }

    #[tokio::test]
    async fn test_list_json_uses_type_key() {
        let fixture = TestCatalog::sample();
        let mut out = Vec::new();
        cmd_list(fixture.path(), true, &mut out).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[1]["type"], "IndexOutOfBounds");
        assert_eq!(value[1]["hint"], "Check array bounds");
    }

    #[tokio::test]
    async fn test_check_reports_count_or_error() {
        let fixture = TestCatalog::sample();
        let mut out = Vec::new();
        cmd_check(fixture.path(), &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("valid (2 hints)"));

        fixture.write("errors:\n  - type: 1\n    hint: h\n");
        assert!(cmd_check(fixture.path(), &mut Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_check_missing_catalog_reports_not_found() {
        let err = cmd_check(Path::new("/nonexistent/hints.yml"), &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "hint catalog is invalid");
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn test_catalog_path_resolution() {
        let cli = Cli::try_parse_from(["errhint", "-c", "/etc/errhint/errhint.toml", "check"])
            .unwrap();
        let config = AppConfig::default();
        assert_eq!(
            catalog_path(&cli, &config),
            PathBuf::from("/etc/errhint/hints.yml")
        );

        let cli = Cli::try_parse_from(["errhint", "--catalog", "/tmp/other.yml", "check"]).unwrap();
        assert_eq!(catalog_path(&cli, &config), PathBuf::from("/tmp/other.yml"));
    }

    #[test]
    fn test_default_config_path_resolves_beside_cwd() {
        let cli = Cli::try_parse_from(["errhint", "check"]).unwrap();
        assert_eq!(
            catalog_path(&cli, &AppConfig::default()),
            PathBuf::from("hints.yml")
        );
    }

    #[tokio::test]
    async fn test_load_config_falls_back_to_defaults() {
        let (config, found) = load_config(Path::new("/nonexistent/errhint.toml"))
            .await
            .unwrap();
        assert!(!found);
        assert_eq!(config.catalog.path, "hints.yml");
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let fixture = TestCatalog::sample();
        let toml = TestConfigBuilder::new()
            .reload(ReloadPolicy::EverySearch)
            .to_toml();
        let path = fixture.dir().join("errhint.toml");
        tokio::fs::write(&path, toml).await.unwrap();

        let (config, found) = load_config(&path).await.unwrap();
        assert!(found);
        assert_eq!(config.catalog.reload, ReloadPolicy::EverySearch);
    }

    #[test]
    fn test_config_show_prints_toml() {
        let mut out = Vec::new();
        cmd_config(Path::new("errhint.toml"), &AppConfig::default(), true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[catalog]"));
        assert!(text.contains("reload = \"cached\""));
    }
}
