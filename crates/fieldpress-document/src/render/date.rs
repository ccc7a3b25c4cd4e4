// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date field — formats the context date and draws it as a text field.

use fieldpress_core::error::Result;
use fieldpress_core::fields::{DateField, TextField};

use super::RenderContext;
use crate::pdf::canvas::PageCanvas;

pub fn canvas(field: &DateField, ctx: &RenderContext) -> Result<PageCanvas> {
    let text = field.format.format(ctx.today, &ctx.locale_date_format)?;
    Ok(super::text::canvas(&TextField {
        page: field.page,
        x: field.x,
        y: field.y,
        text,
        font_size: field.font_size,
        color: field.color,
    }))
}
