use anyhow::{Context, Result};
use clap::Parser;
use librarian::catalog::CatalogStore;
use librarian::cli::reply::{ReplySink, WriterSink};
use librarian::cli::shell::run_shell;
use librarian::cli::{Cli, Dispatcher};
use librarian::config::{validate_prefix, ConfigLoader};
use librarian::io::LibrarianPaths;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn initialize_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn catalog_location(configured: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(path);
    }

    let paths = LibrarianPaths::default();
    paths
        .ensure_directories()
        .context("Failed to create librarian data directory")?;
    Ok(paths.default_catalog_file())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(prefix) = &cli.prefix {
        validate_prefix(prefix).context("Invalid --prefix")?;
        config.settings.prefix = prefix.clone();
    }
    if let Some(catalog) = &cli.catalog {
        config.settings.catalog_path = Some(catalog.clone());
    }

    let directive = match cli.log_level {
        Some(level) => level.to_filter_directive(),
        None if config.settings.debug_mode => "debug",
        None => "warn",
    };
    initialize_tracing(directive);
    debug!("Settings: {:?}", config.settings);

    let catalog_path = catalog_location(config.settings.catalog_path.clone())?;
    let store = CatalogStore::open(catalog_path.clone())
        .with_context(|| format!("Failed to open catalog at {}", catalog_path.display()))?;

    info!(command = cli.command.name(), user = %cli.user, "Starting librarian");
    let mut dispatcher = Dispatcher::new(store, config.settings);
    let mut sink = WriterSink::new(std::io::stdout().lock());

    match cli.command.into_invocation() {
        Some((name, args)) => {
            let reply = dispatcher.dispatch(name, &args, &cli.user);
            let exit_code = reply.exit_code();
            sink.send(reply)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        None => {
            let handled = run_shell(&mut dispatcher, std::io::stdin().lock(), &cli.user, &mut sink)?;
            debug!(handled, "Shell finished");
        }
    }

    Ok(())
}
