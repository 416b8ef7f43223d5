/// Main entry point for the Clear Air tracker MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use clear_air_tracker::{TrackerConfig, TrackerServer};

const DATABASE_FILE: &str = "clear_air.db";

/// Get the default database path, falling back through writable locations
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".clear_air_tracker")),
        dirs::data_dir().map(|p| p.join("clear_air_tracker")),
        dirs::config_dir().map(|p| p.join("clear_air_tracker")),
        std::env::current_dir().ok().map(|p| p.join(".clear_air_tracker")),
    ];

    for dir in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }
        let test_file = dir.join(".test_write");
        if std::fs::write(&test_file, "test").is_ok() {
            let _ = std::fs::remove_file(&test_file);
            return Ok(dir.join(DATABASE_FILE));
        }
    }

    let temp_dir = std::env::temp_dir().join("clear_air_tracker");
    std::fs::create_dir_all(&temp_dir)?;
    let db_path = temp_dir.join(DATABASE_FILE);

    tracing::warn!("Using temporary directory for database: {}", db_path.display());
    Ok(db_path)
}

/// Command line arguments for the Clear Air tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    /// First day of the week in calendar grids (e.g. monday, sunday)
    #[arg(long, default_value = "monday")]
    week_start: String,

    /// Minutes east of UTC used for day boundaries; defaults to the host offset
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("clear_air_tracker={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting Clear Air tracker MCP server");

    let config = TrackerConfig::from_flags(Some(&args.week_start), args.utc_offset_minutes)?;
    info!(
        "Week starts on {}, UTC offset {}",
        config.week_start, config.utc_offset
    );

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = TrackerServer::new(db_path, config).await?;
    server.run().await?;

    info!("Clear Air tracker shutdown complete");
    Ok(())
}
