// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration and its JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{Color, ResampleFilter};

/// Settings shared by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// JPEG quality (1-100) used when an operation does not choose one.
    pub jpeg_quality: u8,
    /// Always write PNG with the best (slowest) compression.
    pub png_optimize: bool,
    /// Filter used by resize and merge.
    pub resample: ResampleFilter,
    /// Canvas colour behind merged images.
    pub merge_background: Color,
    /// Fill for corners uncovered by a non-right-angle rotation.
    pub rotate_fill: Color,
    /// Text shadow offset in pixels.
    pub shadow_offset: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            png_optimize: false,
            resample: ResampleFilter::Lanczos3,
            merge_background: Color::WHITE,
            rotate_fill: Color::TRANSPARENT,
            shadow_offset: 2,
        }
    }
}

impl ToolConfig {
    /// Read a JSON config file. Missing keys take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        debug!(path = %path.as_ref().display(), "config loaded");
        Ok(config)
    }

    /// Like [`ToolConfig::load`], but falls back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.as_ref().display(), error = %err, "using default config");
                Self::default()
            }
        }
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
