//! Render data error types

use thiserror::Error;

/// Errors raised while recording drawing instructions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `pop` called with no open push
    #[error("pop called without a matching push")]
    TooManyPops,
}

/// Result alias for recording operations
pub type Result<T> = std::result::Result<T, RenderError>;
