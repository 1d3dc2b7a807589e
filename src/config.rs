//! Building a [`Palette`] from CLI specs or a JSON palette file.
//!
//! A spec is `name=#hex`. A palette file is an ordered JSON array:
//!
//! ```json
//! [
//!   { "name": "hotpink", "color": "#ff69b4" },
//!   { "name": "darkcyan", "color": [0, 139, 139] }
//! ]
//! ```

use std::path::Path;

use palette::Srgb;
use serde::Deserialize;

use crate::color::{parse_hex, to_hex};
use crate::error::{CoverageError, Result};
use crate::palette::Palette;

#[derive(Debug, Deserialize)]
struct EntryConfig {
    name: String,
    color: ColorConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColorConfig {
    Hex(String),
    Channels([i64; 3]),
}

/// Split `name=#hex` into a name and its color.
pub fn parse_entry(spec: &str) -> Result<(String, Srgb<u8>)> {
    let (name, color) = spec.split_once('=').ok_or_else(|| CoverageError::ParseColor {
        input: spec.to_string(),
        reason: "expected name=#rrggbb".to_string(),
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CoverageError::InvalidPalette(format!(
            "{spec:?} has a blank name"
        )));
    }
    Ok((name.to_string(), parse_hex(color)?))
}

pub fn palette_from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Palette> {
    let entries = specs
        .iter()
        .map(|s| parse_entry(s.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Palette::new(entries)
}

pub fn palette_from_json(text: &str) -> Result<Palette> {
    let entries: Vec<EntryConfig> = serde_json::from_str(text)?;
    let channels = entries
        .into_iter()
        .map(|entry| -> Result<(String, [i64; 3])> {
            let channels = match entry.color {
                ColorConfig::Hex(hex) => {
                    let rgb = parse_hex(&hex)?;
                    [rgb.red, rgb.green, rgb.blue].map(i64::from)
                }
                ColorConfig::Channels(channels) => channels,
            };
            Ok((entry.name, channels))
        })
        .collect::<Result<Vec<_>>>()?;
    Palette::from_channels(channels)
}

pub fn load_palette(path: &Path) -> Result<Palette> {
    let text = std::fs::read_to_string(path)?;
    let palette = palette_from_json(&text)?;
    tracing::debug!(path = %path.display(), colors = palette.len(), "Loaded palette");
    for entry in palette.iter() {
        tracing::trace!(name = %entry.name, color = %to_hex(entry.rgb), "Palette color");
    }
    Ok(palette)
}
