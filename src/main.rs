use std::path::PathBuf;
use std::process::ExitCode;

use axum::Router;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpx2fit::config::Config;
use gpx2fit::pipeline::batch;
use gpx2fit::routes;
use gpx2fit::state::AppState;

/// Convert GPX routes and waypoints into FIT course and location files.
#[derive(Parser)]
#[command(name = "gpx2fit", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// GPX files to convert; defaults to every `*.gpx` in the current directory
    files: Vec<PathBuf>,

    /// Timestamp written into generated files (RFC 3339)
    #[arg(long)]
    time: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP conversion service
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gpx2fit=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();

    match cli.command {
        Some(Command::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        None => {
            if cli.time.is_some() {
                config.reference_time = cli.time;
            }
            convert_files(cli.files, &config).await
        }
    }
}

async fn convert_files(files: Vec<PathBuf>, config: &Config) -> ExitCode {
    let inputs = if files.is_empty() {
        let cwd = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::error!("Cannot read current directory: {}", e);
                return ExitCode::FAILURE;
            }
        };
        match batch::discover_inputs(&cwd) {
            Ok(inputs) => inputs,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        files
    };

    if inputs.is_empty() {
        tracing::info!("No GPX files to convert");
        return ExitCode::SUCCESS;
    }

    let time = config.reference_time();
    let report = match tokio::task::spawn_blocking(move || batch::run(&inputs, time)).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Conversion task failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Wrote {} file(s); {} skipped, {} failed",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn serve(config: Config) -> ExitCode {
    let port = config.port;
    let max_file_size = config.max_file_size;
    let cache_ttl = config.cache_ttl;
    let state = AppState::new(config);

    let eviction_state = state.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            eviction_state.evict_expired(cache_ttl);
        }
    });

    let app = Router::new()
        .merge(routes::api())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("gpx2fit listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Convert: POST http://{}/api/convert", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
