// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field placements — declarative instructions describing one element to draw
// at page coordinates. Coordinates are PDF points, origin bottom-left.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{FieldpressError, Result};

/// Upper bound on table columns accepted by the renderer.
pub const MAX_TABLE_COLUMNS: usize = 20;

fn default_font_size() -> f32 {
    12.0
}

fn default_table_font_size() -> f32 {
    10.0
}

fn default_row_height() -> f32 {
    25.0
}

fn default_border_width() -> f32 {
    1.0
}

fn default_option_spacing() -> f32 {
    20.0
}

fn default_line_height() -> f32 {
    1.2
}

fn default_padding() -> f32 {
    5.0
}

fn default_placeholder() -> String {
    "Select an option".to_string()
}

fn default_true() -> bool {
    true
}

fn white() -> Rgb {
    Rgb::WHITE
}

fn header_gray() -> Rgb {
    Rgb::from_rgb8(0xF3, 0xF4, 0xF6)
}

fn grid_gray() -> Rgb {
    Rgb::from_rgb8(0xD1, 0xD5, 0xDB)
}

// -- Placement variants -------------------------------------------------------

/// A signature image painted into a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Base64 PNG/JPEG, optionally wrapped in a `data:` URL.
    pub image: String,
}

/// A single line of text drawn at a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub color: Rgb,
}

/// How a date field renders "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    Iso,
    /// A configured, human-oriented pattern (`strftime` syntax).
    Locale,
    /// `M/D/YYYY` without zero padding.
    Short,
}

impl DateFormat {
    /// Render `date` in this format. `locale_pattern` is only consulted for
    /// [`DateFormat::Locale`]; a pattern chrono cannot parse is a
    /// [`FieldpressError::MalformedField`].
    pub fn format(&self, date: NaiveDate, locale_pattern: &str) -> Result<String> {
        let pattern = match self {
            Self::Iso => "%Y-%m-%d",
            Self::Locale => locale_pattern,
            Self::Short => "%-m/%-d/%Y",
        };
        let mut out = String::new();
        write!(out, "{}", date.format(pattern)).map_err(|_| {
            FieldpressError::MalformedField(format!("invalid date pattern {pattern:?}"))
        })?;
        Ok(out)
    }
}

/// Today's date rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub format: DateFormat,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub color: Rgb,
}

/// Mark drawn inside a checked checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStyle {
    /// Two corner-to-corner diagonals.
    X,
    /// A short down-stroke followed by a long up-stroke.
    #[default]
    Checkmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub border_color: Rgb,
    #[serde(default)]
    pub check_color: Rgb,
    #[serde(default = "white")]
    pub background_color: Rgb,
    #[serde(default = "default_border_width")]
    pub border_width: f32,
    #[serde(default)]
    pub style: CheckStyle,
}

/// One selectable entry of a radio group or dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioGroupField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub selected_value: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub text_color: Rgb,
    #[serde(default = "default_option_spacing")]
    pub option_spacing: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub selected_value: Option<String>,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub text_color: Rgb,
    #[serde(default = "white")]
    pub background_color: Rgb,
    #[serde(default)]
    pub border_color: Rgb,
}

impl DropdownField {
    /// Label of the selected option, if the selection names a known value.
    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected_value.as_deref()?;
        self.options
            .iter()
            .find(|option| option.value == selected)
            .map(|option| option.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextareaField {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub text_color: Rgb,
    #[serde(default = "white")]
    pub background_color: Rgb,
    #[serde(default)]
    pub border_color: Rgb,
    /// Multiplier applied to the font size to get the line advance.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default = "default_padding")]
    pub padding: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnType,
    /// Explicit width in points; `0` means "share the remaining width".
    #[serde(default)]
    pub width: f32,
}

/// A scalar table cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text shown in a non-checkbox cell.
    pub fn display(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Whether a checkbox cell holding this value is ticked.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "x" | "1" | "checked" | "on"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub values: BTreeMap<String, Option<CellValue>>,
}

impl TableRow {
    pub fn get(&self, column_id: &str) -> Option<&CellValue> {
        self.values.get(column_id).and_then(Option::as_ref)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableField {
    pub page: usize,
    pub x: f32,
    /// Top edge of the table.
    pub y: f32,
    pub width: f32,
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default = "default_table_font_size")]
    pub font_size: f32,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default = "header_gray")]
    pub header_background: Rgb,
    #[serde(default)]
    pub header_text: Rgb,
    #[serde(default = "grid_gray")]
    pub border_color: Rgb,
    #[serde(default)]
    pub cell_text: Rgb,
    #[serde(default = "white")]
    pub cell_background: Rgb,
}

impl TableField {
    /// Total height occupied by the header (if shown) and all body rows.
    pub fn total_height(&self) -> f32 {
        let rows = self.rows.len() + usize::from(self.show_header);
        rows as f32 * self.row_height
    }
}

// -- The tagged union ---------------------------------------------------------

/// One declarative drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldPlacement {
    Signature(SignatureField),
    Text(TextField),
    Date(DateField),
    Checkbox(CheckboxField),
    RadioGroup(RadioGroupField),
    Dropdown(DropdownField),
    Textarea(TextareaField),
    Table(TableField),
}

/// Draw order of a batch. Later categories paint over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldCategory {
    Signature,
    Text,
    Date,
    Checkbox,
    RadioGroup,
    Dropdown,
    Textarea,
    Table,
}

impl FieldPlacement {
    /// Zero-based index of the target page.
    pub fn page(&self) -> usize {
        match self {
            Self::Signature(f) => f.page,
            Self::Text(f) => f.page,
            Self::Date(f) => f.page,
            Self::Checkbox(f) => f.page,
            Self::RadioGroup(f) => f.page,
            Self::Dropdown(f) => f.page,
            Self::Textarea(f) => f.page,
            Self::Table(f) => f.page,
        }
    }

    pub fn category(&self) -> FieldCategory {
        match self {
            Self::Signature(_) => FieldCategory::Signature,
            Self::Text(_) => FieldCategory::Text,
            Self::Date(_) => FieldCategory::Date,
            Self::Checkbox(_) => FieldCategory::Checkbox,
            Self::RadioGroup(_) => FieldCategory::RadioGroup,
            Self::Dropdown(_) => FieldCategory::Dropdown,
            Self::Textarea(_) => FieldCategory::Textarea,
            Self::Table(_) => FieldCategory::Table,
        }
    }

    /// Reject non-finite coordinates and negative sizes before anything is
    /// drawn.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Signature(f) => {
                check_point(f.x, f.y)?;
                check_box(f.width, f.height)
            }
            Self::Text(f) => {
                check_point(f.x, f.y)?;
                check_size("fontSize", f.font_size)
            }
            Self::Date(f) => {
                check_point(f.x, f.y)?;
                check_size("fontSize", f.font_size)
            }
            Self::Checkbox(f) => {
                check_point(f.x, f.y)?;
                check_box(f.width, f.height)?;
                check_size("borderWidth", f.border_width)
            }
            Self::RadioGroup(f) => {
                check_point(f.x, f.y)?;
                check_box(f.width, f.height)?;
                check_size("fontSize", f.font_size)?;
                check_size("optionSpacing", f.option_spacing)
            }
            Self::Dropdown(f) => {
                check_point(f.x, f.y)?;
                check_box(f.width, f.height)?;
                check_size("fontSize", f.font_size)
            }
            Self::Textarea(f) => {
                check_point(f.x, f.y)?;
                check_box(f.width, f.height)?;
                check_size("fontSize", f.font_size)?;
                check_size("lineHeight", f.line_height)?;
                check_size("padding", f.padding)
            }
            Self::Table(f) => {
                check_point(f.x, f.y)?;
                check_size("width", f.width)?;
                check_size("rowHeight", f.row_height)?;
                check_size("fontSize", f.font_size)?;
                if f.columns.len() > MAX_TABLE_COLUMNS {
                    return Err(FieldpressError::MalformedField(format!(
                        "table has {} columns (maximum {})",
                        f.columns.len(),
                        MAX_TABLE_COLUMNS
                    )));
                }
                for column in &f.columns {
                    check_size("column width", column.width)?;
                }
                Ok(())
            }
        }
    }
}

fn check_point(x: f32, y: f32) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(FieldpressError::MalformedField(format!(
            "non-finite position ({x}, {y})"
        )))
    }
}

fn check_box(width: f32, height: f32) -> Result<()> {
    check_size("width", width)?;
    check_size("height", height)
}

fn check_size(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FieldpressError::MalformedField(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

// -- Batches ------------------------------------------------------------------

/// Fields grouped by category, as produced by a form-filling front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldBatch {
    pub signatures: Vec<SignatureField>,
    pub texts: Vec<TextField>,
    pub dates: Vec<DateField>,
    pub checkboxes: Vec<CheckboxField>,
    pub radio_groups: Vec<RadioGroupField>,
    pub dropdowns: Vec<DropdownField>,
    pub textareas: Vec<TextareaField>,
    pub tables: Vec<TableField>,
}

impl FieldBatch {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
            + self.texts.len()
            + self.dates.len()
            + self.checkboxes.len()
            + self.radio_groups.len()
            + self.dropdowns.len()
            + self.textareas.len()
            + self.tables.len()
    }

    /// Flatten into one instruction list in draw order.
    pub fn into_instructions(self) -> Vec<FieldPlacement> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.signatures.into_iter().map(FieldPlacement::Signature));
        out.extend(self.texts.into_iter().map(FieldPlacement::Text));
        out.extend(self.dates.into_iter().map(FieldPlacement::Date));
        out.extend(self.checkboxes.into_iter().map(FieldPlacement::Checkbox));
        out.extend(self.radio_groups.into_iter().map(FieldPlacement::RadioGroup));
        out.extend(self.dropdowns.into_iter().map(FieldPlacement::Dropdown));
        out.extend(self.textareas.into_iter().map(FieldPlacement::Textarea));
        out.extend(self.tables.into_iter().map(FieldPlacement::Table));
        out
    }
}

impl From<Vec<FieldPlacement>> for FieldBatch {
    fn from(fields: Vec<FieldPlacement>) -> Self {
        let mut batch = FieldBatch::default();
        for field in fields {
            match field {
                FieldPlacement::Signature(f) => batch.signatures.push(f),
                FieldPlacement::Text(f) => batch.texts.push(f),
                FieldPlacement::Date(f) => batch.dates.push(f),
                FieldPlacement::Checkbox(f) => batch.checkboxes.push(f),
                FieldPlacement::RadioGroup(f) => batch.radio_groups.push(f),
                FieldPlacement::Dropdown(f) => batch.dropdowns.push(f),
                FieldPlacement::Textarea(f) => batch.textareas.push(f),
                FieldPlacement::Table(f) => batch.tables.push(f),
            }
        }
        batch
    }
}
