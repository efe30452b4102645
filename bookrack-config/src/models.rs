//! Resolved configuration values.

use std::path::PathBuf;

/// Loopback only unless configured otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port the server binds by default.
pub const DEFAULT_PORT: u16 = 8383;
/// Page size when none is configured.
pub const DEFAULT_BOOKS_PER_PAGE: u32 = 24;
/// Catalog pool size when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// The library being served.
    pub library: LibraryConfig,
    /// Provenance, for logging.
    pub metadata: ConfigMetadata,
}

/// Address the HTTP server listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, ready for a TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The Calibre library being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Directory containing `metadata.db`.
    pub path: PathBuf,
    /// Display name; empty means "use the directory name".
    pub name: String,
    /// Rows per listing page. Never zero.
    pub books_per_page: u32,
    /// Ignore Calibre's display-field preferences and expose everything.
    pub show_all_fields: bool,
    /// Log composed SQL at debug level.
    pub trace_sql: bool,
    /// Upper bound for the read-only catalog pool.
    pub max_connections: u32,
}

impl LibraryConfig {
    /// Configured name, or the library directory's name.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    /// TOML file that was read, if any.
    pub config_path: Option<PathBuf>,
    /// Whether a `.env` file was found and loaded.
    pub env_file_loaded: bool,
}
