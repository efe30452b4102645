use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use bookrack_config::{ConfigLoad, ConfigLoader};
use bookrack_contracts::metadata::LibraryFiles;
use bookrack_contracts::visibility::FieldVisibility;
use bookrack_core::catalog::{SqliteCatalogRepository, connect_read_only};
use bookrack_core::prefs::{CalibrePrefs, ShowAllFields};
use bookrack_server::{AppState, router};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "bookrack-server")]
#[command(about = "Read-only JSON browser for a Calibre library")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, env = "BOOKRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Calibre library directory (overrides config)
    #[arg(long, env = "LIBRARY_PATH")]
    library: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config.clone() {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = cli.library.clone() {
        loader = loader.with_library_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!("{} ({})", warning.message, hint),
            None => warn!("{}", warning.message),
        }
    }

    let library = &config.library;
    let pool = connect_read_only(&library.path, library.max_connections)
        .await
        .with_context(|| {
            format!("failed to open catalog in {}", library.path.display())
        })?;

    let prefs = CalibrePrefs::load(&library.path)
        .await
        .context("failed to read Calibre preferences")?;
    let visibility: Arc<dyn FieldVisibility> = if library.show_all_fields {
        Arc::new(ShowAllFields)
    } else {
        Arc::new(prefs.display_fields())
    };

    let repository = SqliteCatalogRepository::new(
        pool,
        visibility,
        Arc::new(LibraryFiles::new(&library.path)),
    )
    .with_sql_tracing(library.trace_sql);

    let state = AppState::new(
        Arc::new(repository),
        Arc::new(prefs.virtual_libraries()),
        library.books_per_page,
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        "Serving library {} on http://{}",
        library.display_name(),
        addr
    );
    axum::serve(listener, router(state)).await?;

    Ok(())
}
