// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table field — header row plus body rows drawn top-down from the table's
// top edge, one bordered cell at a time.

use fieldpress_core::Rgb;
use fieldpress_core::fields::{ColumnType, TableColumn, TableField};

use super::centred_baseline;
use crate::layout::{StandardFont, distribute_column_widths, measure_width, truncate_to_width};
use crate::pdf::canvas::PageCanvas;

/// Horizontal inset of cell text.
pub const CELL_PADDING: f32 = 5.0;
const GRID_LINE_WIDTH: f32 = 0.5;

/// Horizontal placement of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Centre,
    Right,
}

impl Align {
    fn for_column(column: &TableColumn) -> Self {
        match column.kind {
            ColumnType::Number => Align::Right,
            _ => Align::Left,
        }
    }
}

/// Left edge of each column, followed by the resolved widths.
fn column_lefts(field: &TableField) -> (Vec<f32>, Vec<f32>) {
    let widths = distribute_column_widths(field.width, &field.columns);
    let lefts = widths
        .iter()
        .scan(field.x, |left, width| {
            let current = *left;
            *left += width;
            Some(current)
        })
        .collect();
    (lefts, widths)
}

/// `x` at which `text` starts for the given alignment inside a cell.
pub fn text_x(text: &str, font: StandardFont, size: f32, left: f32, width: f32, align: Align) -> f32 {
    match align {
        Align::Left => left + CELL_PADDING,
        Align::Centre => left + (width - measure_width(font, text, size)) / 2.0,
        Align::Right => left + width - CELL_PADDING - measure_width(font, text, size),
    }
}

struct CellText<'a> {
    text: &'a str,
    font: StandardFont,
    color: Rgb,
    align: Align,
}

pub fn canvas(field: &TableField) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    let (lefts, widths) = column_lefts(field);
    let row_height = field.row_height;
    let mut row_top = field.y;

    if field.show_header {
        let bottom = row_top - row_height;
        for ((column, &left), &width) in field.columns.iter().zip(&lefts).zip(&widths) {
            canvas.bordered_rect(
                (left, bottom, width, row_height),
                field.header_background,
                field.border_color,
                GRID_LINE_WIDTH,
            );
            cell_text(
                &mut canvas,
                field,
                (left, bottom, width),
                CellText {
                    text: &column.name,
                    font: StandardFont::HelveticaBold,
                    color: field.header_text,
                    align: Align::Centre,
                },
            );
        }
        row_top = bottom;
    }

    for row in &field.rows {
        let bottom = row_top - row_height;
        for ((column, &left), &width) in field.columns.iter().zip(&lefts).zip(&widths) {
            canvas.bordered_rect(
                (left, bottom, width, row_height),
                field.cell_background,
                field.border_color,
                GRID_LINE_WIDTH,
            );
            let value = row.get(&column.id);
            if column.kind == ColumnType::Checkbox {
                let ticked = value.is_some_and(|value| value.is_truthy());
                cell_checkbox(&mut canvas, field, (left, bottom, width), ticked);
                continue;
            }
            let Some(value) = value else { continue };
            let text = value.display();
            cell_text(
                &mut canvas,
                field,
                (left, bottom, width),
                CellText {
                    text: &text,
                    font: StandardFont::Helvetica,
                    color: field.cell_text,
                    align: Align::for_column(column),
                },
            );
        }
        row_top = bottom;
    }
    canvas
}

fn cell_text(canvas: &mut PageCanvas, field: &TableField, (left, bottom, width): (f32, f32, f32), cell: CellText<'_>) {
    if cell.text.is_empty() {
        return;
    }
    let shown = truncate_to_width(
        cell.text,
        width - 2.0 * CELL_PADDING,
        cell.font,
        field.font_size,
    );
    let x = text_x(&shown, cell.font, field.font_size, left, width, cell.align);
    let y = centred_baseline(bottom, field.row_height, field.font_size);
    canvas.text(cell.font, field.font_size, x, y, &shown, cell.color);
}

/// Small bordered square centred in the cell, crossed when ticked.
fn cell_checkbox(canvas: &mut PageCanvas, field: &TableField, (left, bottom, width): (f32, f32, f32), ticked: bool) {
    let side = field
        .font_size
        .min(field.row_height - 4.0)
        .min(width - 4.0)
        .max(0.0);
    if side <= 0.0 {
        return;
    }
    let x = left + (width - side) / 2.0;
    let y = bottom + (field.row_height - side) / 2.0;
    canvas.set_stroke_color(field.cell_text);
    canvas.set_line_width(1.0);
    canvas.rect(x, y, side, side);
    canvas.stroke();
    if ticked {
        let inset = 0.2 * side;
        canvas.move_to(x + inset, y + inset);
        canvas.line_to(x + side - inset, y + side - inset);
        canvas.move_to(x + inset, y + side - inset);
        canvas.line_to(x + side - inset, y + inset);
        canvas.stroke();
    }
}
