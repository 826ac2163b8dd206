//! drip-send - Dispatch a batch of pre-defined posts at a throttled cadence
//!
//! Reads an ordered post-definition file, authenticates (reusing a cached
//! session when it is still fresh), and publishes the posts one at a time
//! with a platform-safe pause between them.

use clap::Parser;
use libdripcast::dispatch::{DispatchOptions, Dispatcher};
use libdripcast::platforms::bluesky::BlueskyClient;
use libdripcast::posts::load_post_definitions;
use libdripcast::session::{SessionManager, SessionStore};
use libdripcast::{Config, Credentials, DripcastError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "drip-send")]
#[command(version)]
#[command(about = "Dispatch a batch of pre-defined posts at a throttled cadence")]
#[command(long_about = "\
drip-send - Dispatch a batch of pre-defined posts at a throttled cadence

DESCRIPTION:
    drip-send reads an ordered list of post definitions from a JSON file and
    publishes them one at a time, pausing between posts to stay clear of
    platform rate limits. Sessions are cached across runs; full credential
    login only happens when the cache is absent, stale, or rejected.

USAGE:
    # Dispatch all posts, 15 minutes apart
    drip-send posts.json

    # Dispatch the first 3 posts, 20 minutes apart
    drip-send --count 3 --delay 20m posts.json

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown (finishes current post)

CONFIGURATION:
    Configuration file: ~/.config/dripcast/config.toml
    Session cache:      ~/.config/dripcast/session.json

    [session]
    file = \"~/.config/dripcast/session.json\"
    max_age_hours = 24

    [bluesky]
    service = \"https://bsky.social\"

EXIT CODES:
    0 - All posts dispatched (or clean shutdown)
    1 - Config, media, or publish error
    2 - Authentication error
    3 - Invalid input
")]
struct Cli {
    /// Post-definition file (JSON array of {content, media})
    #[arg(default_value = "posts.json")]
    posts: PathBuf,

    /// Pause between posts in minutes, as "15" or "15m" (minimum 2)
    #[arg(short, long, default_value = "15")]
    delay: String,

    /// Number of posts to dispatch (0 = all)
    #[arg(short, long, default_value_t = 0)]
    count: usize,

    /// Account username or handle
    #[arg(long, env = "DRIPCAST_USERNAME")]
    username: Option<String>,

    /// Account password
    #[arg(long, env = "DRIPCAST_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Account email, for platforms that ask for it at login
    #[arg(long, env = "DRIPCAST_EMAIL")]
    email: Option<String>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        libdripcast::logging::init_default();
    }

    // Run the main logic and handle errors
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Malformed command input aborts before anything touches the network.
    let options = DispatchOptions {
        delay_minutes: parse_delay_minutes(&cli.delay)?,
        count: cli.count,
    };

    let config = Config::load()?;
    let posts = load_post_definitions(&cli.posts)?;

    if posts.is_empty() {
        info!("Post store is empty, nothing to dispatch");
        return Ok(());
    }

    let credentials = Credentials::new(cli.username, cli.password, cli.email);

    let mut client = BlueskyClient::new(&config.bluesky).await?;
    let store = SessionStore::new(config.session.expand_file_path());
    let manager = SessionManager::new(store, config.session.max_age_hours);
    manager.authenticate(&mut client, &credentials).await?;

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let outcome = Dispatcher::new(options).run(&client, &posts, shutdown).await?;

    if outcome.interrupted {
        info!("Run interrupted after {} post(s)", outcome.published);
    } else {
        info!("Run completed: {} post(s) published", outcome.published);
    }

    Ok(())
}

/// Parse the delay option: a bare integer or an integer with an "m"/"min"
/// suffix, minutes only.
fn parse_delay_minutes(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_suffix("min")
        .or_else(|| trimmed.strip_suffix('m'))
        .unwrap_or(trimmed)
        .trim();

    digits.parse::<u64>().map_err(|_| {
        DripcastError::InvalidInput(format!(
            "Invalid delay '{}': expected minutes as \"15\" or \"15m\"",
            input
        ))
    })
}

/// Set up signal handlers for graceful shutdown
#[cfg(unix)]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| DripcastError::InvalidInput(format!("Signal setup failed: {}", e)))?;

    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGTERM | SIGINT => {
                    tracing::info!("Received shutdown signal, stopping after the current post...");
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn setup_signal_handlers(_shutdown: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}
