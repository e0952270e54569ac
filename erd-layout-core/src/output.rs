//! Output types for the browser shell.
//!
//! These structs are serialized to JSON and returned from the wasm
//! bindings. Errors travel inside the payload instead of as exceptions.

use serde::Serialize;

use crate::error::LayoutError;
use crate::layout::overlap::OverlapPair;
use crate::schema::{DbTable, Diagram};

/// Error information for editor markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub message: String,
    pub line: usize,       // 1-based line number
    pub column: usize,     // 1-based column number
    pub end_line: usize,   // 1-based end line (same as line for single-line errors)
    pub end_column: usize, // 1-based end column
}

impl From<&LayoutError> for ErrorInfo {
    fn from(err: &LayoutError) -> Self {
        // Non-JSON errors have no source position; point at the start.
        let (line, column) = err.location().unwrap_or((1, 1));
        ErrorInfo {
            message: err.to_string(),
            line,
            column,
            end_line: line,
            end_column: column + 1, // Highlight at least one character
        }
    }
}

/// Result of a layout call: the repositioned tables, or an error.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    pub tables: Vec<DbTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LayoutOutput {
    pub fn ok(tables: Vec<DbTable>) -> Self {
        Self { tables, error: None }
    }

    pub fn failed(err: &LayoutError) -> Self {
        Self { tables: Vec::new(), error: Some(err.into()) }
    }
}

/// Result of the overlap report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapOutput {
    pub has_overlap: bool,
    pub pairs: Vec<OverlapPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl OverlapOutput {
    pub fn ok(pairs: Vec<OverlapPair>) -> Self {
        Self { has_overlap: !pairs.is_empty(), pairs, error: None }
    }

    pub fn failed(err: &LayoutError) -> Self {
        Self { has_overlap: false, pairs: Vec::new(), error: Some(err.into()) }
    }
}

/// Result of a custom JSON import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagram: Option<Diagram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ImportOutput {
    pub fn ok(diagram: Diagram) -> Self {
        Self { diagram: Some(diagram), error: None }
    }

    pub fn failed(err: &LayoutError) -> Self {
        Self { diagram: None, error: Some(err.into()) }
    }
}
