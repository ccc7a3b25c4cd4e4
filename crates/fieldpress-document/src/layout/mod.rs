// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — pure typography helpers: font metrics, measurement,
// wrapping, truncation, and table column allocation.

pub mod metrics;
pub mod table;
pub mod text;

pub use metrics::StandardFont;
pub use table::distribute_column_widths;
pub use text::{ELLIPSIS, measure_width, truncate_to_width, wrap};
