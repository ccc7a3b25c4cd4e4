// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::DateFormat;
use crate::types::{RenderOptions, ThumbnailOptions};

/// Tunable defaults for composition, serialisation, and rasterisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Flate-compress streams whenever a document is saved.
    pub compress_output: bool,
    /// Default pixels-per-point for page rendering.
    pub render_scale: f32,
    /// Pixels-per-point used for the thumbnail source render.
    pub thumbnail_scale: f32,
    /// Default thumbnail bounding box width, in pixels.
    pub thumbnail_max_width: u32,
    /// Default thumbnail bounding box height, in pixels.
    pub thumbnail_max_height: u32,
    /// `strftime` pattern used by `locale` date fields.
    pub locale_date_format: String,
    /// Extra directories searched for a TrueType fallback font when
    /// rasterising text in non-embedded fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            compress_output: false,
            render_scale: 1.5,
            thumbnail_scale: 2.0,
            thumbnail_max_width: 200,
            thumbnail_max_height: 300,
            locale_date_format: "%B %-d, %Y".to_string(),
            font_dirs: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a `locale_date_format` chrono cannot render.
    pub fn validate(&self) -> Result<()> {
        let sample = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        DateFormat::Locale
            .format(sample, &self.locale_date_format)
            .map(|_| ())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::at_scale(self.render_scale)
    }

    pub fn thumbnail_options(&self) -> ThumbnailOptions {
        ThumbnailOptions {
            max_width: self.thumbnail_max_width,
            max_height: self.thumbnail_max_height,
        }
    }
}
