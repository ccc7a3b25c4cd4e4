// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-line text field.

use fieldpress_core::fields::TextField;

use crate::layout::StandardFont;
use crate::pdf::canvas::PageCanvas;

/// One line of Helvetica with its baseline at `(x, y)`.
pub fn canvas(field: &TextField) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    if !field.text.is_empty() {
        canvas.text(
            StandardFont::Helvetica,
            field.font_size,
            field.x,
            field.y,
            &field.text,
            field.color,
        );
    }
    canvas
}
