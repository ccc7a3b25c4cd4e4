// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Fieldpress: page geometry, paper sizes, and the
// option structs taken by document-level operations.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Size of one page in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    /// Zero-based page index.
    pub page_index: usize,
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Options for serialising a document back to bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Flate-compress every stream before writing.
    #[serde(default)]
    pub compress: bool,
}

/// Diagonal text stamped across every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkOptions {
    pub font_size: f32,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f32,
    /// Counter-clockwise rotation in degrees.
    pub rotation_deg: f32,
    pub color: Rgb,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            opacity: 0.3,
            rotation_deg: 45.0,
            color: Rgb::new(0.8, 0.8, 0.8),
        }
    }
}

/// One signer listed on a completion certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub name: String,
    pub email: String,
    /// Pre-formatted timestamp, printed verbatim.
    pub signed_at: String,
}

/// Metadata printed on the appended certificate page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub document_title: String,
    /// Pre-formatted completion timestamp, printed verbatim.
    pub completed_date: String,
    pub document_id: String,
    #[serde(default)]
    pub signers: Vec<Signer>,
    /// SHA-256 fingerprint of the signed document, if the caller computed one.
    #[serde(default)]
    pub fingerprint: Option<String>,
}

/// Viewport for page rasterisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Pixels per point when no explicit size is given.
    pub scale: f32,
    /// Explicit output width in pixels.
    pub width: Option<u32>,
    /// Explicit output height in pixels.
    pub height: Option<u32>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.5,
            width: None,
            height: None,
        }
    }
}

impl RenderOptions {
    pub fn at_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }
}

/// Bounding box for thumbnails, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbnailOptions {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            max_width: 200,
            max_height: 300,
        }
    }
}
