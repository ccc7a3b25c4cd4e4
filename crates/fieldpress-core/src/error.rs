// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Fieldpress.

use thiserror::Error;

/// Top-level error type for all Fieldpress operations.
#[derive(Debug, Error)]
pub enum FieldpressError {
    // -- Input errors --
    #[error("page {page} not found (document has {page_count} pages)")]
    PageNotFound { page: usize, page_count: usize },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("malformed field: {0}")]
    MalformedField(String),

    // -- Output errors --
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("rasterization failed: {0}")]
    Render(String),

    // -- Edges (CLI, config files) --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldpressError {
    /// Stable machine-readable code, suitable for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PageNotFound { .. } => "PAGE_NOT_FOUND",
            Self::InvalidDocument(_) => "INVALID_DOCUMENT",
            Self::UnsupportedImageFormat(_) => "UNSUPPORTED_IMAGE_FORMAT",
            Self::MalformedField(_) => "MALFORMED_FIELD",
            Self::Serialization(_) => "SERIALIZATION_FAILURE",
            Self::Render(_) => "RENDER_FAILURE",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Whether the failure was caused by the caller's input rather than by
    /// the engine. Retrying the same input never changes the outcome.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::PageNotFound { .. }
                | Self::InvalidDocument(_)
                | Self::UnsupportedImageFormat(_)
                | Self::MalformedField(_)
                | Self::Json(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FieldpressError>;
