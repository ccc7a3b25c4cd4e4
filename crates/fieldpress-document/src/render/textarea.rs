// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Textarea field — wrapped multi-line text clipped to the box height.

use fieldpress_core::fields::TextareaField;
use tracing::debug;

use crate::layout::{StandardFont, wrap};
use crate::pdf::canvas::PageCanvas;

/// Wrapped lines that fit the box, with the baseline of each, top-down.
/// Lines whose baseline would fall below the bottom padding are dropped.
pub fn layout_lines(field: &TextareaField) -> (Vec<(String, f32)>, usize) {
    let max_width = (field.width - 2.0 * field.padding).max(0.0);
    let lines = wrap(&field.text, max_width, StandardFont::Helvetica, field.font_size);
    let advance = field.line_height * field.font_size;
    let floor = field.y + field.padding;

    let mut baseline = field.y + field.height - field.padding - field.font_size;
    let mut placed = Vec::new();
    for line in &lines {
        if baseline < floor {
            break;
        }
        placed.push((line.clone(), baseline));
        baseline -= advance;
    }
    let dropped = lines.len() - placed.len();
    (placed, dropped)
}

pub fn canvas(field: &TextareaField) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    canvas.bordered_rect(
        (field.x, field.y, field.width, field.height),
        field.background_color,
        field.border_color,
        1.0,
    );

    let (lines, dropped) = layout_lines(field);
    if dropped > 0 {
        debug!(
            shown = lines.len(),
            dropped, "Textarea content exceeds the field height"
        );
    }
    for (line, baseline) in lines.iter().filter(|(line, _)| !line.is_empty()) {
        canvas.text(
            StandardFont::Helvetica,
            field.font_size,
            field.x + field.padding,
            *baseline,
            line,
            field.text_color,
        );
    }
    canvas
}
