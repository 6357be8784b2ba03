pub mod editor;
pub mod grid;

use std::path::PathBuf;

pub use editor::EditorConfig;
pub use grid::GridConfig;

/// Errors loading or validating configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("{0}")]
    Invalid(String),
}
