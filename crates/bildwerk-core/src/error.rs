// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Precondition errors --
    #[error("file {} does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("output folder {} does not exist", .0.display())]
    OutputDirNotFound(PathBuf),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid compression percentage: {0} (expected 0 to 100)")]
    InvalidPercentage(i32),

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // -- Imaging errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("none of the images to merge could be opened")]
    NothingToMerge,

    #[error("font could not be loaded: {0}")]
    Font(String),

    #[error("metadata could not be read: {0}")]
    Metadata(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BildwerkError {
    /// Shorthand for [`BildwerkError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
