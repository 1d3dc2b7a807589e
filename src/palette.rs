//! The fixed, ordered set of named reference colors images are measured against.

use std::collections::HashSet;

use palette::Srgb;

use crate::error::{CoverageError, Result};

/// A single named reference color.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    pub rgb: Srgb<u8>,
}

/// An immutable, insertion-ordered mapping from color name to RGB.
///
/// Order matters: it decides report column order and which entry wins when a
/// color is exactly as close to two entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

/// The five colors printed on Figment cards.
const REFERENCE: [(&str, [u8; 3]); 5] = [
    ("hotpink", [0xff, 0x69, 0xb4]),
    ("darkcyan", [0x00, 0x8b, 0x8b]),
    ("lightgray", [0xd3, 0xd3, 0xd3]),
    ("blue", [0x00, 0x5d, 0xba]),
    ("white", [0xff, 0xff, 0xff]),
];

impl Palette {
    /// Build a palette from `(name, rgb)` pairs, keeping their order.
    ///
    /// Names must be unique and non-blank. An empty list is accepted here;
    /// classification is what rejects it.
    pub fn new<I, N>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Srgb<u8>)>,
        N: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (name, rgb) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(CoverageError::InvalidPalette(format!(
                    "entry {} has a blank name",
                    out.len()
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(CoverageError::InvalidPalette(format!(
                    "duplicate color name {name:?}"
                )));
            }
            out.push(PaletteEntry { name, rgb });
        }
        Ok(Self { entries: out })
    }

    /// Like [`Palette::new`], but from unchecked integer channels.
    pub fn from_channels<I, N>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, [i64; 3])>,
        N: Into<String>,
    {
        let checked = entries
            .into_iter()
            .map(|(name, channels)| -> Result<(String, Srgb<u8>)> {
                let name: String = name.into();
                let mut rgb = [0u8; 3];
                for (dst, value) in rgb.iter_mut().zip(channels) {
                    *dst = u8::try_from(value).map_err(|_| {
                        CoverageError::InvalidPalette(format!(
                            "{name:?} has component {value} outside 0..=255"
                        ))
                    })?;
                }
                Ok((name, Srgb::new(rgb[0], rgb[1], rgb[2])))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(checked)
    }

    /// hotpink, darkcyan, lightgray, blue, white.
    pub fn reference() -> Self {
        Self {
            entries: REFERENCE
                .iter()
                .map(|(name, [r, g, b])| PaletteEntry {
                    name: (*name).to_string(),
                    rgb: Srgb::new(*r, *g, *b),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<Srgb<u8>> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.rgb)
    }

    /// Index of the entry closest to `rgb` by squared Euclidean distance.
    ///
    /// Entries are scanned in order and the running best is only replaced on
    /// a strictly smaller distance, so ties go to the earlier entry.
    pub fn nearest(&self, rgb: [u8; 3]) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, u32)>, (idx, entry)| {
                let dist = squared_distance(rgb, entry.rgb);
                match best {
                    Some((_, best_dist)) if best_dist <= dist => best,
                    _ => Some((idx, dist)),
                }
            })
            .map(|(idx, _)| idx)
    }
}

#[inline(always)]
fn squared_distance(c: [u8; 3], p: Srgb<u8>) -> u32 {
    let dr = c[0] as i32 - p.red as i32;
    let dg = c[1] as i32 - p.green as i32;
    let db = c[2] as i32 - p.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}
