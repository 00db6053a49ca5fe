use std::io::Read;
use std::sync::Arc;

use amora_match::config::Settings;
use amora_match::core::{MatchEngine, Selector};
use amora_match::models::MatchRequest;
use amora_match::services::{CandidateStore, MemoryStore, PgCandidateStore};
use tracing::{error, info};

/// One-shot match runner: reads a match request JSON, runs the engine
/// against the configured companion pool, and prints the response JSON.
///
/// Usage:
///   amora-match [--pool companions.json] [request.json]
///
/// With `--pool`, companions are loaded from a seed file instead of the
/// configured database. Without a request path (or with `-`), the request
/// is read from stdin.
#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Amora Match runner...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Parse arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut pool_file: Option<String> = None;
    let mut request_file: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--pool" => {
                i += 1;
                pool_file = args.get(i).cloned();
            }
            other => request_file = Some(other.to_string()),
        }
        i += 1;
    }

    // Read the match request
    let raw_request = match request_file.as_deref() {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };

    let request: MatchRequest = serde_json::from_str(&raw_request).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Invalid match request: {}", e),
        )
    })?;

    // Build the candidate store
    let store: Arc<dyn CandidateStore> = match pool_file {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let store = MemoryStore::from_json(&json).map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Invalid companion pool file {}: {}", path, e),
                )
            })?;
            info!("Loaded {} companions from {}", store.len(), path);
            Arc::new(store)
        }
        None => {
            let store = PgCandidateStore::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
            )
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to companion pool: {}", e);
                panic!("Database connection error: {}", e);
            });
            info!("Companion pool client initialized");
            Arc::new(store)
        }
    };

    // Run the engine
    let engine = MatchEngine::new(Selector::new(store), settings.matching.limits());

    let response = engine
        .rank(&request)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    info!(
        "Returning {} matches ({} evaluated)",
        response.matches.len(),
        response.total_matches
    );

    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    println!("{}", rendered);

    Ok(())
}
