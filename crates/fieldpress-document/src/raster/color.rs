// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour spaces understood by the rasterizer, reduced to sRGB.

use lopdf::{Dictionary, Document, Object};

use crate::pdf::objects;

/// A PDF colour space, collapsed to what is needed to produce RGB.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    /// Palette of `base` colours, one entry per index.
    Indexed { base: Box<ColorSpace>, lookup: Vec<u8> },
    /// Separation and DeviceN: tints approximated as ink on white.
    Tint { components: usize },
    /// Pattern fills are not painted; the previous colour stays in effect.
    Pattern,
}

impl ColorSpace {
    /// Number of operands a `sc`/`scn` call carries in this space.
    pub(crate) fn components(&self) -> usize {
        match self {
            Self::Gray | Self::Indexed { .. } => 1,
            Self::Rgb => 3,
            Self::Cmyk => 4,
            Self::Tint { components } => *components,
            Self::Pattern => 0,
        }
    }

    /// Colour a `cs`/`CS` call resets to.
    pub(crate) fn initial_color(&self) -> [f32; 3] {
        match self {
            Self::Indexed { .. } => self.to_rgb(&[0.0]),
            _ => [0.0, 0.0, 0.0],
        }
    }

    /// Convert operands in `0.0..=1.0` (indices for `Indexed`) to RGB.
    pub(crate) fn to_rgb(&self, values: &[f32]) -> [f32; 3] {
        let at = |i: usize| values.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0);
        match self {
            Self::Gray => [at(0); 3],
            Self::Rgb => [at(0), at(1), at(2)],
            Self::Cmyk => cmyk_to_rgb(at(0), at(1), at(2), at(3)),
            Self::Indexed { base, lookup } => {
                let index = values.first().copied().unwrap_or(0.0).max(0.0) as usize;
                let channels = base.components();
                let start = index * channels;
                match lookup.get(start..start + channels) {
                    Some(entry) => {
                        let scaled: Vec<f32> = entry.iter().map(|&b| f32::from(b) / 255.0).collect();
                        base.to_rgb(&scaled)
                    }
                    None => [0.0; 3],
                }
            }
            Self::Tint { components } => {
                let ink = (0..*components).map(at).fold(0.0f32, f32::max);
                [1.0 - ink; 3]
            }
            Self::Pattern => [0.0; 3],
        }
    }

    /// Convert 8-bit image samples to RGB bytes.
    pub(crate) fn sample_to_rgb(&self, samples: &[u16], max: u16) -> [u8; 3] {
        let rgb = match self {
            Self::Indexed { .. } => {
                self.to_rgb(&[samples.first().copied().map(f32::from).unwrap_or(0.0)])
            }
            _ => {
                let scale = f32::from(max.max(1));
                let values: Vec<f32> = samples.iter().map(|&s| f32::from(s) / scale).collect();
                self.to_rgb(&values)
            }
        };
        rgb.map(|c| (c * 255.0).round() as u8)
    }
}

/// Simple CMYK to RGB with no colour management.
pub(crate) fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> [f32; 3] {
    [(1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k)]
}

/// Device colour space for a component count, used when operands arrive
/// without a matching `cs`.
pub(crate) fn device_space_for(components: usize) -> ColorSpace {
    match components {
        3 => ColorSpace::Rgb,
        4 => ColorSpace::Cmyk,
        _ => ColorSpace::Gray,
    }
}

/// Resolve a colour space operand or `/ColorSpace` entry. Names that are
/// not device spaces are looked up in the resource dictionary.
pub(crate) fn parse(doc: &Document, object: &Object, resources: Option<&Dictionary>) -> Option<ColorSpace> {
    match objects::resolve(doc, object)? {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"G" | b"CalGray" => Some(ColorSpace::Gray),
            b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(ColorSpace::Rgb),
            b"DeviceCMYK" | b"CMYK" => Some(ColorSpace::Cmyk),
            b"Pattern" => Some(ColorSpace::Pattern),
            other => {
                let spaces = objects::resolve_dict(doc, resources?.get(b"ColorSpace").ok()?)?;
                parse(doc, spaces.get(other).ok()?, None)
            }
        },
        Object::Array(items) => parse_array(doc, items),
        _ => None,
    }
}

fn parse_array(doc: &Document, items: &[Object]) -> Option<ColorSpace> {
    let family = items.first().and_then(|o| o.as_name().ok())?;
    match family {
        b"DeviceGray" | b"CalGray" => Some(ColorSpace::Gray),
        b"DeviceRGB" | b"CalRGB" | b"Lab" => Some(ColorSpace::Rgb),
        b"DeviceCMYK" => Some(ColorSpace::Cmyk),
        b"Pattern" => Some(ColorSpace::Pattern),
        b"ICCBased" => {
            let profile = objects::resolve_dict(doc, items.get(1)?)?;
            let n = profile.get(b"N").ok().and_then(|n| objects::number(doc, n)).unwrap_or(3.0);
            Some(device_space_for(n as usize))
        }
        b"Indexed" | b"I" => {
            let base = parse(doc, items.get(1)?, None)?;
            let lookup = match objects::resolve(doc, items.get(3)?)? {
                Object::String(bytes, _) => bytes.clone(),
                Object::Stream(stream) => stream.get_plain_content().ok()?,
                _ => return None,
            };
            Some(ColorSpace::Indexed {
                base: Box::new(base),
                lookup,
            })
        }
        b"Separation" => Some(ColorSpace::Tint { components: 1 }),
        b"DeviceN" => {
            let names = objects::resolve(doc, items.get(1)?)?.as_array().ok()?;
            Some(ColorSpace::Tint {
                components: names.len().max(1),
            })
        }
        _ => None,
    }
}
