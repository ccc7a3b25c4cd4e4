// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Checkbox field — filled, bordered box with an optional X or check mark.

use fieldpress_core::fields::{CheckStyle, CheckboxField};

use crate::pdf::canvas::PageCanvas;

pub fn canvas(field: &CheckboxField) -> PageCanvas {
    let (x, y, w, h) = (field.x, field.y, field.width, field.height);
    let mut canvas = PageCanvas::new();
    canvas.bordered_rect(
        (x, y, w, h),
        field.background_color,
        field.border_color,
        field.border_width,
    );
    if !field.checked {
        return canvas;
    }

    let side = w.min(h);
    let padding = 0.2 * side;
    canvas.set_stroke_color(field.check_color);
    canvas.set_line_width((0.1 * side).max(1.0));
    canvas.set_round_strokes();
    match field.style {
        CheckStyle::X => {
            canvas.move_to(x + padding, y + padding);
            canvas.line_to(x + w - padding, y + h - padding);
            canvas.move_to(x + padding, y + h - padding);
            canvas.line_to(x + w - padding, y + padding);
        }
        CheckStyle::Checkmark => {
            // Short stroke down to the vertex, long stroke up to the corner.
            canvas.move_to(x + padding, y + h * 0.5);
            canvas.line_to(x + w * 0.4, y + padding);
            canvas.line_to(x + w - padding, y + h - padding);
        }
    }
    canvas.stroke();
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpress_core::Rgb;

    fn checkbox(checked: bool, style: CheckStyle) -> CheckboxField {
        CheckboxField {
            page: 0,
            x: 100.0,
            y: 100.0,
            width: 20.0,
            height: 20.0,
            checked,
            border_color: Rgb::BLACK,
            check_color: Rgb::BLACK,
            background_color: Rgb::WHITE,
            border_width: 1.0,
            style,
        }
    }

    fn count(canvas: &PageCanvas, operator: &str) -> usize {
        canvas
            .operations()
            .iter()
            .filter(|op| op.operator == operator)
            .count()
    }

    #[test]
    fn unchecked_draws_only_the_box() {
        let canvas = canvas(&checkbox(false, CheckStyle::X));
        assert_eq!(count(&canvas, "S"), 0);
        assert_eq!(count(&canvas, "m"), 0);
        assert_eq!(count(&canvas, "re"), 1);
    }

    #[test]
    fn x_is_two_separate_diagonals() {
        let canvas = canvas(&checkbox(true, CheckStyle::X));
        assert_eq!(count(&canvas, "m"), 2);
        assert_eq!(count(&canvas, "l"), 2);
        let first = canvas
            .operations()
            .iter()
            .find(|op| op.operator == "m")
            .unwrap();
        let start: Vec<f32> = first.operands.iter().map(|o| o.as_float().unwrap()).collect();
        assert_eq!(start, vec![104.0, 104.0]);
    }

    #[test]
    fn checkmark_is_one_path_of_two_segments() {
        let canvas = canvas(&checkbox(true, CheckStyle::Checkmark));
        assert_eq!(count(&canvas, "m"), 1);
        assert_eq!(count(&canvas, "l"), 2);
    }

    #[test]
    fn mark_line_width_scales_with_box() {
        let mut big = checkbox(true, CheckStyle::X);
        big.width = 40.0;
        big.height = 30.0;
        let canvas = canvas(&big);
        let widths: Vec<f32> = canvas
            .operations()
            .iter()
            .filter(|op| op.operator == "w")
            .map(|op| op.operands[0].as_float().unwrap())
            .collect();
        assert_eq!(widths, vec![1.0, 3.0]);
    }
}
