//! Configuration for the bookrack server: an optional TOML file, the
//! process environment (after `.env` loading), and built-in defaults,
//! composed with precedence env > file > default.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{Config, ConfigMetadata, LibraryConfig, ServerConfig};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigWarning, ConfigWarnings};
