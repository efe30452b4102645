//! Raw, partially specified configuration inputs.

use serde::Deserialize;
use std::path::PathBuf;

/// Raw configuration as written in a TOML file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    /// `[server]` table.
    #[serde(default)]
    pub server: FileServerConfig,
    /// `[library]` table.
    #[serde(default)]
    pub library: FileLibraryConfig,
}

/// `[server]` keys; absent keys fall through to defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileServerConfig {
    /// `host`
    pub host: Option<String>,
    /// `port`
    pub port: Option<u16>,
}

/// `[library]` keys, named as in [`crate::LibraryConfig`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileLibraryConfig {
    /// `path`
    pub path: Option<PathBuf>,
    /// `name`
    pub name: Option<String>,
    /// `books_per_page`
    pub books_per_page: Option<u32>,
    /// `show_all_fields`
    pub show_all_fields: Option<bool>,
    /// `trace_sql`
    pub trace_sql: Option<bool>,
    /// `max_connections`
    pub max_connections: Option<u32>,
}

/// Values read from the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    /// `BOOKRACK_CONFIG`
    pub config_path: Option<PathBuf>,
    /// `SERVER_HOST`
    pub server_host: Option<String>,
    /// `SERVER_PORT`
    pub server_port: Option<u16>,
    /// `LIBRARY_PATH`
    pub library_path: Option<PathBuf>,
    /// `LIBRARY_NAME`
    pub library_name: Option<String>,
    /// `BOOKS_PER_PAGE`
    pub books_per_page: Option<u32>,
    /// `SHOW_ALL_FIELDS`
    pub show_all_fields: Option<bool>,
    /// `TRACE_SQL`
    pub trace_sql: Option<bool>,
    /// `DB_MAX_CONNECTIONS`
    pub max_connections: Option<u32>,
}

impl EnvConfig {
    /// Reads the current process environment. Unparseable values are
    /// treated as unset.
    pub fn gather() -> Self {
        Self {
            config_path: std::env::var("BOOKRACK_CONFIG").ok().map(PathBuf::from),
            server_host: std::env::var("SERVER_HOST").ok(),
            server_port: parse_var("SERVER_PORT"),
            library_path: std::env::var("LIBRARY_PATH").ok().map(PathBuf::from),
            library_name: std::env::var("LIBRARY_NAME").ok(),
            books_per_page: parse_var("BOOKS_PER_PAGE"),
            show_all_fields: parse_bool_var("SHOW_ALL_FIELDS"),
            trace_sql: parse_bool_var("TRACE_SQL"),
            max_connections: parse_var("DB_MAX_CONNECTIONS"),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| parse_bool(&raw))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
