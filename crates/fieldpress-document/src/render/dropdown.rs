// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dropdown field — a static rendering of a select box: the chosen label (or
// a muted placeholder) and a chevron.

use fieldpress_core::Rgb;
use fieldpress_core::fields::DropdownField;

use super::centred_baseline;
use crate::layout::{StandardFont, truncate_to_width};
use crate::pdf::canvas::PageCanvas;

/// Width kept free on the right for the chevron.
pub const INDICATOR_WIDTH: f32 = 25.0;
const TEXT_INSET: f32 = 5.0;

/// Placeholder text colour (`#6B7280`).
pub const PLACEHOLDER_COLOR: Rgb = Rgb::new(107.0 / 255.0, 114.0 / 255.0, 128.0 / 255.0);

/// Text shown in the box and its colour.
pub fn display(field: &DropdownField) -> (String, Rgb) {
    let (label, color) = match field.selected_label() {
        Some(label) => (label, field.text_color),
        None => (field.placeholder.as_str(), PLACEHOLDER_COLOR),
    };
    let text = truncate_to_width(
        label,
        field.width - INDICATOR_WIDTH,
        StandardFont::Helvetica,
        field.font_size,
    );
    (text, color)
}

pub fn canvas(field: &DropdownField) -> PageCanvas {
    let (x, y, w, h) = (field.x, field.y, field.width, field.height);
    let mut canvas = PageCanvas::new();
    canvas.bordered_rect((x, y, w, h), field.background_color, field.border_color, 1.0);

    let (text, color) = display(field);
    if !text.is_empty() {
        canvas.text(
            StandardFont::Helvetica,
            field.font_size,
            x + TEXT_INSET,
            centred_baseline(y, h, field.font_size),
            &text,
            color,
        );
    }

    let (cx, cy) = (x + w - 12.0, y + h / 2.0);
    canvas.set_stroke_color(field.text_color);
    canvas.set_line_width(1.5);
    canvas.set_round_strokes();
    canvas.move_to(cx - 4.0, cy + 2.0);
    canvas.line_to(cx, cy - 2.0);
    canvas.line_to(cx + 4.0, cy + 2.0);
    canvas.stroke();
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ELLIPSIS, measure_width};
    use fieldpress_core::fields::ChoiceOption;

    fn dropdown(selected: Option<&str>, width: f32) -> DropdownField {
        DropdownField {
            page: 0,
            x: 10.0,
            y: 10.0,
            width,
            height: 24.0,
            options: vec![
                ChoiceOption {
                    label: "United Kingdom of Great Britain and Northern Ireland".into(),
                    value: "uk".into(),
                },
                ChoiceOption {
                    label: "France".into(),
                    value: "fr".into(),
                },
            ],
            selected_value: selected.map(str::to_string),
            placeholder: "Select an option".into(),
            font_size: 12.0,
            text_color: Rgb::BLACK,
            background_color: Rgb::WHITE,
            border_color: Rgb::BLACK,
        }
    }

    #[test]
    fn selected_label_uses_text_colour() {
        let (text, color) = display(&dropdown(Some("fr"), 200.0));
        assert_eq!(text, "France");
        assert_eq!(color, Rgb::BLACK);
    }

    #[test]
    fn no_selection_shows_muted_placeholder() {
        let (text, color) = display(&dropdown(None, 200.0));
        assert_eq!(text, "Select an option");
        assert_eq!(color.to_hex(), "#6b7280");
    }

    #[test]
    fn long_labels_leave_room_for_the_chevron() {
        let field = dropdown(Some("uk"), 150.0);
        let (text, _) = display(&field);
        assert!(text.ends_with(ELLIPSIS));
        assert!(measure_width(StandardFont::Helvetica, &text, 12.0) <= 150.0 - INDICATOR_WIDTH);
    }

    #[test]
    fn chevron_is_two_segments() {
        let canvas = canvas(&dropdown(None, 200.0));
        let lines = canvas
            .operations()
            .iter()
            .filter(|op| op.operator == "l")
            .count();
        assert_eq!(lines, 2);
    }
}
