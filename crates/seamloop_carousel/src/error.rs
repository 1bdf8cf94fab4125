//! Carousel error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a carousel
#[derive(Error, Debug)]
pub enum CarouselError {
    /// There is nothing to loop
    #[error("Carousel has no items")]
    NoItems,

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for this schema
    #[error("Invalid carousel configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for carousel operations
pub type Result<T> = std::result::Result<T, CarouselError>;
