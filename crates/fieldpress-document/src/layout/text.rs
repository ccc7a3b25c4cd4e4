// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text measurement, word wrapping, and ellipsis truncation.

use super::metrics::StandardFont;

/// Appended to text cut short by [`truncate_to_width`].
pub const ELLIPSIS: char = '…';

/// Width of `text` in points when set in `font` at `size` points.
pub fn measure_width(font: StandardFont, text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(font.char_width(ch))).sum();
    units as f32 * size / 1000.0
}

/// Cut `text` down until it fits `max_width`, marking the cut with an
/// ellipsis. Text that already fits is returned unchanged. Shortening stops
/// at three characters even if the result is still too wide.
pub fn truncate_to_width(text: &str, max_width: f32, font: StandardFont, size: f32) -> String {
    if measure_width(font, text, size) <= max_width {
        return text.to_string();
    }

    let mut kept: Vec<char> = text.chars().collect();
    let mut candidate = String::new();
    while kept.len() > 3 {
        kept.pop();
        candidate = kept.iter().collect();
        candidate.push(ELLIPSIS);
        if measure_width(font, &candidate, size) <= max_width {
            return candidate;
        }
    }

    if candidate.is_empty() {
        candidate = kept.iter().collect();
        candidate.push(ELLIPSIS);
    }
    candidate
}

/// Greedy word wrap.
///
/// Explicit newlines always break, and empty paragraphs survive as empty
/// lines. Within a paragraph, space-separated words are packed while the line
/// still fits. A single word wider than `max_width` gets a line of its own,
/// truncated with an ellipsis.
pub fn wrap(text: &str, max_width: f32, font: StandardFont, size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut words = paragraph.split(' ').filter(|word| !word.is_empty()).peekable();
        if words.peek().is_none() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in words {
            if measure_width(font, word, size) > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(truncate_to_width(word, max_width, font, size));
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{current} {word}");
            if measure_width(font, &candidate, size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
