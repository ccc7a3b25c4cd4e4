// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fallback font discovery — locates a sans-serif TrueType face on the host
// and hands its bytes to the rasterizer.

use std::path::{Path, PathBuf};

use fieldpress_core::EngineConfig;
use fieldpress_document::Rasterizer;
use tracing::{debug, warn};

/// Directory depth searched below each font directory.
const MAX_FONT_DIR_DEPTH: usize = 4;

pub(crate) const REGULAR_CANDIDATES: &[&str] = &[
    "LiberationSans-Regular.ttf",
    "Arimo-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
    "Helvetica.ttc",
    "DejaVuSans.ttf",
    "FreeSans.ttf",
    "NotoSans-Regular.ttf",
];

pub(crate) const BOLD_CANDIDATES: &[&str] = &[
    "LiberationSans-Bold.ttf",
    "Arimo-Bold.ttf",
    "Arial Bold.ttf",
    "arialbd.ttf",
    "DejaVuSans-Bold.ttf",
    "FreeSansBold.ttf",
    "NotoSans-Bold.ttf",
];

/// A rasterizer for `config`, with fallback faces from `config.font_dirs`
/// and then the platform font directories when any are found.
pub fn rasterizer(config: &EngineConfig) -> Rasterizer {
    let mut dirs = config.font_dirs.clone();
    dirs.extend(platform_font_dirs());

    let Some(regular) = read_first(&dirs, REGULAR_CANDIDATES) else {
        debug!("No fallback font found; non-embedded text will not be drawn");
        return Rasterizer::from_config(config);
    };
    let bold = read_first(&dirs, BOLD_CANDIDATES);
    Rasterizer::from_config(config)
        .with_fallback_faces(regular, bold)
        .unwrap_or_else(|err| {
            warn!("{err}");
            Rasterizer::from_config(config)
        })
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        dirs.push(PathBuf::from(r"C:\Windows\Fonts"));
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    dirs
}

fn read_first(dirs: &[PathBuf], candidates: &[&str]) -> Option<Vec<u8>> {
    let path = find_font_file(dirs, candidates)?;
    match std::fs::read(&path) {
        Ok(bytes) => {
            debug!(path = %path.display(), "Fallback font read");
            Some(bytes)
        }
        Err(err) => {
            warn!(path = %path.display(), "Cannot read fallback font: {err}");
            None
        }
    }
}

/// The best-ranked candidate file found anywhere below `dirs`.
pub(crate) fn find_font_file(dirs: &[PathBuf], candidates: &[&str]) -> Option<PathBuf> {
    let mut best: Option<(usize, PathBuf)> = None;
    for dir in dirs {
        scan_dir(dir, candidates, 0, &mut best);
        if matches!(best, Some((0, _))) {
            break;
        }
    }
    best.map(|(_, path)| path)
}

fn scan_dir(dir: &Path, candidates: &[&str], depth: usize, best: &mut Option<(usize, PathBuf)>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < MAX_FONT_DIR_DEPTH {
                scan_dir(&path, candidates, depth + 1, best);
            }
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(rank) = candidates.iter().position(|c| *c == name) {
            if best.as_ref().is_none_or(|(current, _)| rank < *current) {
                *best = Some((rank, path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_search_prefers_earlier_candidates_in_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("dejavu");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("DejaVuSans.ttf"), b"x").unwrap();
        std::fs::write(dir.path().join("Arial.ttf"), b"x").unwrap();

        let found = find_font_file(&[dir.path().to_path_buf()], REGULAR_CANDIDATES).unwrap();
        assert_eq!(found.file_name().unwrap(), "Arial.ttf");
        assert!(find_font_file(&[dir.path().to_path_buf()], BOLD_CANDIDATES).is_none());
    }

    #[test]
    fn unreadable_face_in_font_dir_falls_back_to_a_plain_rasterizer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LiberationSans-Regular.ttf"), b"not a font").unwrap();
        let config = EngineConfig {
            font_dirs: vec![dir.path().to_path_buf()],
            ..EngineConfig::default()
        };
        // Still usable: the broken face is dropped with a warning.
        let doc = fieldpress_document::PdfDocument::create();
        let err = rasterizer(&config)
            .thumbnail(&doc, &config.thumbnail_options())
            .unwrap_err();
        assert!(matches!(err, fieldpress_core::FieldpressError::PageNotFound { .. }));
    }
}
