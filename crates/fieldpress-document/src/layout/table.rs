// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table column-width allocation.

use fieldpress_core::TableColumn;

/// Resolve every column's width.
///
/// Columns with an explicit (positive) width keep it. Zero-width columns split
/// whatever is left of `total_width` equally; when the explicit widths already
/// exceed the total, auto columns collapse to zero.
pub fn distribute_column_widths(total_width: f32, columns: &[TableColumn]) -> Vec<f32> {
    let explicit: f32 = columns
        .iter()
        .filter(|column| column.width > 0.0)
        .map(|column| column.width)
        .sum();
    let auto_count = columns.iter().filter(|column| column.width <= 0.0).count();

    let auto_width = if auto_count == 0 {
        0.0
    } else {
        ((total_width - explicit) / auto_count as f32).max(0.0)
    };

    columns
        .iter()
        .map(|column| {
            if column.width > 0.0 {
                column.width
            } else {
                auto_width
            }
        })
        .collect()
}
