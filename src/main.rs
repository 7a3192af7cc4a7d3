use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::Parser;
use keygate::{AppState, build_app, config::GatewayConfig, db, observability};

/// Config file read when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "keygate.toml";

/// CLI arguments for the keygate server
#[derive(Parser, Debug)]
#[command(version, about = "API key verification service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (defaults to ./keygate.toml if it exists,
    /// otherwise built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Start the server (default)
    Serve,
    /// Run database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Some(Command::Migrate) => run_migrate(args.config.as_deref()).await,
        Some(Command::Serve) | None => run_server(args.config.as_deref()).await,
    }
}

/// Load the config file, exiting on failure.
///
/// An explicit path must exist. Without one, `keygate.toml` in the working
/// directory is used when present.
fn load_config(explicit_config_path: Option<&str>) -> (GatewayConfig, Option<PathBuf>) {
    let path = match explicit_config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let config = match &path {
        Some(path) => GatewayConfig::from_file(path),
        None => {
            let config = GatewayConfig::default();
            config.validate().map(|()| config)
        }
    };

    match config {
        Ok(config) => (config, path),
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}",
                describe(path.as_deref()),
                e
            );
            std::process::exit(1);
        }
    }
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string())
}

/// Run the HTTP server
async fn run_server(explicit_config_path: Option<&str>) {
    let (config, config_path) = load_config(explicit_config_path);

    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Failed to initialize tracing: {e}");
        std::process::exit(1);
    }

    if let Err(e) = observability::metrics::init_metrics(&config.observability.metrics) {
        tracing::error!(error = %e, "Failed to initialize metrics");
        std::process::exit(1);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = %describe(config_path.as_deref()),
        "Starting keygate"
    );

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };

    let app = build_app(&config, state.clone());

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, address = %addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(address = %addr, "Server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    state.snapshots.current().db().close().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}

/// Run database migrations and exit
async fn run_migrate(explicit_config_path: Option<&str>) {
    let (config, config_path) = load_config(explicit_config_path);

    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Failed to initialize tracing: {e}");
        std::process::exit(1);
    }

    tracing::info!(
        config_file = %describe(config_path.as_deref()),
        "Running database migrations"
    );

    match db::DbPool::from_config(&config.database).await {
        Ok(pool) => match pool.run_migrations().await {
            Ok(()) => {
                tracing::info!("Database migrations completed successfully");
                std::process::exit(0);
            }
            Err(e) => {
                tracing::error!(error = %e, "Database migrations failed");
                eprintln!("Error: Database migrations failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    }
}
