//! Errors raised at the engine boundary.
//!
//! The layout algorithms themselves never fail: dangling relationships are
//! skipped and an exhausted collision search falls back to its origin. Only
//! malformed requests are reported.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate table id '{0}'")]
    DuplicateTableId(String),

    #[error("{kind} '{id}' has a non-finite {what}")]
    NonFiniteGeometry {
        kind: &'static str,
        id: String,
        what: &'static str,
    },

    #[error("{kind} '{id}' has a negative {what}")]
    NegativeSize {
        kind: &'static str,
        id: String,
        what: &'static str,
    },
}

impl LayoutError {
    /// 1-based source location, available for JSON errors only.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            LayoutError::Json(e) if e.line() > 0 => Some((e.line(), e.column())),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
