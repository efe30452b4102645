//! Composes file, environment, and default values into a [`Config`].

use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use super::{
    models::{
        Config, ConfigMetadata, DEFAULT_BOOKS_PER_PAGE, DEFAULT_HOST,
        DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, LibraryConfig, ServerConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::ConfigWarnings,
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("bookrack.toml"),
        PathBuf::from("config/bookrack.toml"),
    ]
});

const CATALOG_FILE: &str = "metadata.db";
const PREFS_FILE: &str = "metadata_db_prefs_backup.json";

/// Explicit inputs that override discovery.
#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    /// TOML file to read instead of searching the default locations.
    pub config_path: Option<PathBuf>,
    /// `.env` file to load instead of the one in the working directory.
    pub env_file: Option<PathBuf>,
    /// Library directory that wins over both environment and file.
    pub library_path: Option<PathBuf>,
}

/// Builder that resolves a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

/// A loaded configuration and anything odd noticed on the way.
#[derive(Debug)]
pub struct ConfigLoad {
    /// The resolved configuration.
    pub config: Config,
    /// Values that were corrected or look suspicious.
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    /// Loader with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with the given overrides.
    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    /// Reads this TOML file; it must exist.
    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Loads this `.env` file instead of `./.env`.
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Serves this library regardless of file or environment.
    pub fn with_library_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.library_path = Some(path.into());
        self
    }

    /// Loads `.env`, reads the process environment, and composes the
    /// final configuration.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Composes configuration from an already gathered environment.
    pub fn load_with_env(
        &self,
        mut env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        if let Some(path) = &self.options.library_path {
            env.library_path = Some(path.clone());
        }
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // An explicitly named file must exist; default locations are
        // optional.
        let (path, explicit) = match (&self.options.config_path, &env.config_path)
        {
            (Some(path), _) | (None, Some(path)) => (path.clone(), true),
            (None, None) => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(path) => (path.clone(), false),
                None => return Ok((None, None)),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if config_path.is_none() {
        warnings.push_with_hint(
            "No bookrack.toml detected; using environment variables and defaults",
            "Pass --config or set BOOKRACK_CONFIG to use a configuration file",
        );
    }

    let FileConfig {
        server: file_server,
        library: file_library,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let path = env
        .library_path
        .or(file_library.path)
        .ok_or(ConfigLoadError::MissingLibraryPath)?;
    check_library(&path, &mut warnings)?;

    let mut books_per_page = env
        .books_per_page
        .or(file_library.books_per_page)
        .unwrap_or(DEFAULT_BOOKS_PER_PAGE);
    if books_per_page == 0 {
        warnings.push(format!(
            "books_per_page of 0 is not usable; falling back to {DEFAULT_BOOKS_PER_PAGE}"
        ));
        books_per_page = DEFAULT_BOOKS_PER_PAGE;
    }

    let mut max_connections = env
        .max_connections
        .or(file_library.max_connections)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);
    if max_connections == 0 {
        warnings.push("max_connections of 0 raised to 1");
        max_connections = 1;
    }

    let library = LibraryConfig {
        path,
        name: env.library_name.or(file_library.name).unwrap_or_default(),
        books_per_page,
        show_all_fields: env
            .show_all_fields
            .or(file_library.show_all_fields)
            .unwrap_or(false),
        trace_sql: env.trace_sql.or(file_library.trace_sql).unwrap_or(false),
        max_connections,
    };

    let config = Config {
        server,
        library,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    };

    Ok((config, warnings))
}

fn check_library(
    path: &Path,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigLoadError> {
    let catalog = path.join(CATALOG_FILE);
    if !catalog.is_file() {
        return Err(ConfigLoadError::MissingCatalog { path: catalog });
    }
    if !path.join(PREFS_FILE).is_file() {
        warnings.push_with_hint(
            format!("{PREFS_FILE} not found in {}", path.display()),
            "Without Calibre preferences only SHOW_ALL_FIELDS exposes document fields",
        );
    }
    Ok(())
}

/// Why no usable configuration could be produced.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// An explicitly requested file does not exist.
    #[error("configuration file missing: {path}")]
    MissingConfig {
        /// Requested file.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read configuration {path}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`crate::FileConfig`].
    #[error("failed to parse configuration {path}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml::de::Error,
    },
    /// No library directory was configured anywhere.
    #[error("library path not configured; set LIBRARY_PATH or library.path")]
    MissingLibraryPath,
    /// The library directory has no `metadata.db`.
    #[error("no Calibre catalog at {path}")]
    MissingCatalog {
        /// Library directory.
        path: PathBuf,
    },
    /// A `.env` file was found but could not be loaded.
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
