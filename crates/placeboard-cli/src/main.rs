//! Placeboard - command line front end for the placement analytics cache.
//!
//! Boots the same way the dashboard does: sweep durable storage, install the
//! storage guard, then build the resource cache on top of the guarded store.

mod cli;

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use placeboard_core::auth::CredentialStore;
use placeboard_core::guard::{self, GuardSink, GuardedStore, SweepReport, TracingSink};
use placeboard_core::{
    ApiClient, CacheManager, Config, FileStore, KeyValueStore, MemoryStore, ResourceFetcher,
    ResourceKind,
};

use cli::{Cli, Commands};

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `-v`. The returned guard flushes the log file and
/// must live until exit.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

fn open_store(config: &Config, ephemeral: bool) -> Result<Box<dyn KeyValueStore>> {
    if ephemeral {
        debug!("Using in-memory store");
        return Ok(Box::new(MemoryStore::new()));
    }
    let dir = config.cache_dir()?;
    let store = FileStore::open(&dir)
        .with_context(|| format!("Failed to open storage in {}", dir.display()))?;
    Ok(Box::new(store))
}

/// Token from the environment, else from the keychain for the last user
fn resolve_token(config: &Config) -> Option<String> {
    if let Some(token) = Config::env_token() {
        return Some(token);
    }
    let username = config.last_username.as_deref()?;
    match CredentialStore::get_token(username) {
        Ok(token) => Some(token),
        Err(e) => {
            debug!(error = %e, "No stored token");
            None
        }
    }
}

fn build_cache(config: &Config, store: GuardedStore) -> Result<CacheManager> {
    let mut api = ApiClient::new(&config.api_base_url)?;
    if let Some(token) = resolve_token(config) {
        api = api.with_token(token);
    }
    if !api.has_token() {
        warn!("No token available, requests will be unauthenticated");
    }
    let fetcher: Arc<dyn ResourceFetcher> = Arc::new(api);
    Ok(CacheManager::new(fetcher, store, config.cache_config()))
}

fn print_sweep(report: Option<&SweepReport>) {
    match report {
        Some(report) if report.removed() == 0 => println!("No sensitive keys found"),
        Some(report) => {
            println!("Removed {} sensitive key(s):", report.removed());
            for key in &report.removed_keys {
                println!("  {}", key);
            }
        }
        None => println!("Sweep could not run, see log for details"),
    }
}

fn read_token_from_stdin() -> Result<String> {
    eprint!("Token: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token")?;
    let token = line.trim().to_string();
    if token.is_empty() {
        anyhow::bail!("Empty token");
    }
    Ok(token)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;
    info!("placeboard starting");

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    // Storage is swept and guarded before anything else can write to it
    let sink: Arc<dyn GuardSink> = Arc::new(TracingSink);
    let (store, report) = guard::bootstrap(open_store(&config, cli.ephemeral)?, sink);

    match cli.command {
        Commands::Sweep => print_sweep(report.as_ref()),

        Commands::Keys => {
            for key in store.keys()? {
                println!("{}", key);
            }
        }

        Commands::Set { key, value } => {
            store.set(&key, &value)?;
            if store.get(&key)?.as_deref() == Some(value.as_str()) {
                println!("{}: stored", key);
            } else {
                println!("{}: discarded by storage guard", key);
            }
        }

        Commands::Get { kind } => {
            let cache = build_cache(&config, store)?;
            let data = cache.get(kind).await?;
            println!("{}", data.to_json_pretty()?);
            if let Some(count) = data.item_count() {
                eprintln!("{} item(s)", count);
            }
            // Let a background revalidation land in storage before exit
            cache.wait_in_flight().await;
        }

        Commands::Invalidate { target } => {
            let cache = build_cache(&config, store)?;
            cache.invalidate(target);
            println!("Invalidated {:?}", target);
        }

        Commands::Status => {
            let cache = build_cache(&config, store)?;
            let status = cache.status();
            match config.last_username.as_deref() {
                Some(username) if CredentialStore::has_token(username) => {
                    println!("Signed in as {}", username)
                }
                Some(username) => println!("No token stored for {}", username),
                None => println!("Not signed in"),
            }
            println!("{:<14} {:<8} {:<8} {}", "KIND", "STORED", "MEMORY", "ITEMS");
            for kind in ResourceKind::ALL {
                if let Some(s) = status.get(kind) {
                    println!(
                        "{:<14} {:<8} {:<8} {}",
                        kind.name(),
                        if s.durable { "yes" } else { "no" },
                        s.age.as_deref().unwrap_or("-"),
                        cache
                            .peek(kind)
                            .and_then(|data| data.item_count())
                            .map(|n| n.to_string())
                            .unwrap_or_default(),
                    );
                }
            }
        }

        Commands::Login { username } => {
            let token = match Config::env_token() {
                Some(token) => token,
                None => read_token_from_stdin()?,
            };
            CredentialStore::store_token(&username, &token)?;
            config.last_username = Some(username.clone());
            config.save()?;
            println!("Token saved for {}", username);
        }

        Commands::Logout => {
            if let Some(username) = config.last_username.take() {
                CredentialStore::delete_token(&username)?;
                config.save()?;
            }
            let cache = build_cache(&config, store)?;
            cache.clear_for_logout();
            println!("Logged out, cache cleared");
        }
    }

    info!("placeboard shutting down");
    Ok(())
}
