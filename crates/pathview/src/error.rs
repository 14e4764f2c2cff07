//! Error types for Pathview rendering.
//!
//! [`PathviewError`] covers the hard failures of a render request.
//! Recoverable conditions are not errors: a dangling participant id is
//! logged and skipped, and a label that fits at no font size is left out.

use std::io;

use thiserror::Error;

use pathview_core::{draw::LayerError, semantic::AnalysisType};

use crate::profile::ProfileError;

/// The main error type for Pathview operations.
#[derive(Debug, Error)]
pub enum PathviewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// A shape descriptor names a type this renderer does not know.
    #[error("element {element} has unrenderable geometry: unknown shape type `{kind}`")]
    UnrenderableGeometry { element: String, kind: String },

    /// The analysis data does not support the requested operation.
    #[error("expected {} analysis data, found {}", expected.name(), found.name())]
    AnalysisTypeMismatch {
        expected: AnalysisType,
        found: AnalysisType,
    },

    #[error("column {column} is out of range, the analysis has {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },

    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for PathviewError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
