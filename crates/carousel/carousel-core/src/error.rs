//! Error types for carousel configuration.

use thiserror::Error;

/// Failures surfaced by the core. Runtime operations never fail; a carousel
/// with missing structure degrades to a no-op instead.
#[derive(Debug, Error)]
pub enum CarouselError {
    #[error("carousel config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid carousel config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
