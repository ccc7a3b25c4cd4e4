// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fieldpress — Core types, field placements, and error definitions shared
// across all crates.

pub mod color;
pub mod config;
pub mod error;
pub mod fields;
pub mod types;

pub use color::Rgb;
pub use config::EngineConfig;
pub use error::{FieldpressError, Result};
pub use fields::*;
pub use types::*;
