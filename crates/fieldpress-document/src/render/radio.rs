// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Radio group field — one circle and label per option, stacked vertically or
// laid out in a row.

use fieldpress_core::fields::{Orientation, RadioGroupField};

use crate::layout::{StandardFont, measure_width};
use crate::pdf::canvas::PageCanvas;

pub const OUTER_RADIUS: f32 = 6.0;
pub const INNER_RADIUS: f32 = 3.0;
/// Gap between a circle's right edge and its label.
const LABEL_GAP: f32 = 5.0;
/// Extra horizontal room reserved per option in a row, beyond the circle.
const ROW_GAP: f32 = 10.0;

/// Centres of each option's circle, in option order.
pub fn option_centres(field: &RadioGroupField) -> Vec<(f32, f32)> {
    let mut cx = field.x + OUTER_RADIUS;
    let mut cy = field.y + field.height - OUTER_RADIUS - 2.0;
    let mut centres = Vec::with_capacity(field.options.len());
    for option in &field.options {
        centres.push((cx, cy));
        match field.orientation {
            Orientation::Vertical => cy -= field.option_spacing,
            Orientation::Horizontal => {
                let label_width =
                    measure_width(StandardFont::Helvetica, &option.label, field.font_size);
                cx += 2.0 * OUTER_RADIUS + ROW_GAP + label_width + field.option_spacing;
            }
        }
    }
    centres
}

pub fn canvas(field: &RadioGroupField) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    let selected = field.selected_value.as_deref();

    for (option, (cx, cy)) in field.options.iter().zip(option_centres(field)) {
        canvas.set_stroke_color(field.text_color);
        canvas.set_line_width(1.0);
        canvas.circle(cx, cy, OUTER_RADIUS);
        canvas.stroke();

        if selected == Some(option.value.as_str()) {
            canvas.set_fill_color(field.text_color);
            canvas.circle(cx, cy, INNER_RADIUS);
            canvas.fill();
        }

        canvas.text(
            StandardFont::Helvetica,
            field.font_size,
            cx + OUTER_RADIUS + LABEL_GAP,
            cy - field.font_size * 0.35,
            &option.label,
            field.text_color,
        );
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpress_core::Rgb;
    use fieldpress_core::fields::ChoiceOption;

    fn group(orientation: Orientation, selected: Option<&str>) -> RadioGroupField {
        RadioGroupField {
            page: 0,
            x: 50.0,
            y: 500.0,
            width: 200.0,
            height: 80.0,
            options: ["Red", "Green", "Blue"]
                .iter()
                .map(|label| ChoiceOption {
                    label: label.to_string(),
                    value: label.to_lowercase(),
                })
                .collect(),
            selected_value: selected.map(str::to_string),
            orientation,
            font_size: 12.0,
            text_color: Rgb::BLACK,
            option_spacing: 20.0,
        }
    }

    #[test]
    fn vertical_options_step_down_from_the_top() {
        let centres = option_centres(&group(Orientation::Vertical, None));
        assert_eq!(centres, vec![(56.0, 572.0), (56.0, 552.0), (56.0, 532.0)]);
    }

    #[test]
    fn horizontal_options_advance_by_label_width() {
        let field = group(Orientation::Horizontal, None);
        let centres = option_centres(&field);
        let red = measure_width(StandardFont::Helvetica, "Red", 12.0);
        assert_eq!(centres[0], (56.0, 572.0));
        assert!((centres[1].0 - (56.0 + 12.0 + 10.0 + red + 20.0)).abs() < 1e-3);
        assert_eq!(centres[1].1, 572.0);
    }

    #[test]
    fn only_the_selected_option_is_filled() {
        let fills = |selected| {
            canvas(&group(Orientation::Vertical, selected))
                .operations()
                .iter()
                .filter(|op| op.operator == "f")
                .count()
        };
        assert_eq!(fills(None), 0);
        assert_eq!(fills(Some("green")), 1);
        assert_eq!(fills(Some("purple")), 0);
    }
}
