//! Nearest-color classification of an image against a [`Palette`].

use std::collections::HashMap;

use image::RgbImage;
use serde::Serialize;

use crate::error::{CoverageError, Result};
use crate::palette::Palette;

/// Distinct pixel color -> number of pixels with that color.
pub type Histogram = HashMap<[u8; 3], u64>;

/// Pixels attributed to one palette entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub name: String,
    pub count: u64,
    /// `count / total_pixels`
    pub fraction: f64,
}

/// Per-palette-name pixel counts and fractions for one image, in palette order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    pub total_pixels: u64,
    pub unique_colors: usize,
    pub entries: Vec<CoverageEntry>,
}

impl Coverage {
    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.count))
    }

    pub fn percentages(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.fraction))
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        self.entry(name).map(|e| e.count)
    }

    pub fn percentage(&self, name: &str) -> Option<f64> {
        self.entry(name).map(|e| e.fraction)
    }

    fn entry(&self, name: &str) -> Option<&CoverageEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Count every distinct color in one linear pass.
pub fn histogram(pixels: &RgbImage) -> Histogram {
    let mut counts = Histogram::new();
    for pixel in pixels.pixels() {
        *counts.entry(pixel.0).or_insert(0) += 1;
    }
    counts
}

/// Assign every pixel of `pixels` to its nearest palette entry and tally.
///
/// Work is one pass over the pixels plus one distance evaluation per
/// (distinct color, palette entry) pair, so cost follows color diversity
/// rather than resolution.
pub fn classify(pixels: &RgbImage, palette: &Palette) -> Result<Coverage> {
    if palette.is_empty() {
        return Err(CoverageError::EmptyPalette);
    }
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(CoverageError::EmptyImage);
    }

    let colors = histogram(pixels);
    let mut counts = vec![0u64; palette.len()];
    for (color, count) in &colors {
        // Non-empty palette always yields an index.
        if let Some(idx) = palette.nearest(*color) {
            counts[idx] += count;
        }
    }

    let total_pixels = u64::from(pixels.width()) * u64::from(pixels.height());
    tracing::debug!(
        width = pixels.width(),
        height = pixels.height(),
        unique_colors = colors.len(),
        "Classified image colors"
    );

    let entries = palette
        .iter()
        .zip(counts)
        .map(|(entry, count)| CoverageEntry {
            name: entry.name.clone(),
            count,
            fraction: count as f64 / total_pixels as f64,
        })
        .collect();

    Ok(Coverage {
        total_pixels,
        unique_colors: colors.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::palette::Srgb;
    use image::Rgb;

    fn grid(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y)))
    }

    #[test]
    fn monochrome_white_card() {
        let img = grid(10, 10, |_, _| [255, 255, 255]);
        let coverage = classify(&img, &Palette::reference()).unwrap();

        assert_eq!(coverage.count("white"), Some(100));
        for name in ["hotpink", "darkcyan", "lightgray", "blue"] {
            assert_eq!(coverage.count(name), Some(0));
        }
        assert_eq!(coverage.percentage("white"), Some(1.0));
        assert_eq!(coverage.unique_colors, 1);
    }

    #[test]
    fn two_color_split() {
        // First three rows pink, last row near-black.
        let img = grid(4, 4, |_, y| if y < 3 { [255, 105, 180] } else { [1, 1, 1] });
        let coverage = classify(&img, &Palette::reference()).unwrap();

        let counts: Vec<_> = coverage.counts().collect();
        assert_eq!(
            counts,
            [
                ("hotpink", 12),
                ("darkcyan", 4),
                ("lightgray", 0),
                ("blue", 0),
                ("white", 0)
            ]
        );
        assert_eq!(coverage.percentage("hotpink"), Some(0.75));
        assert_eq!(coverage.percentage("darkcyan"), Some(0.25));
    }

    #[test]
    fn counts_sum_to_pixel_total() {
        let img = grid(37, 23, |x, y| [(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8]);
        let coverage = classify(&img, &Palette::reference()).unwrap();

        assert_eq!(coverage.total_pixels, 37 * 23);
        assert_eq!(coverage.counts().map(|(_, c)| c).sum::<u64>(), 37 * 23);
        let total: f64 = coverage.percentages().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9, "fractions sum to {total}");
    }

    #[test]
    fn repeated_calls_agree() {
        let img = grid(16, 9, |x, y| [(x * 16) as u8, (y * 28) as u8, 77]);
        let palette = Palette::reference();
        assert_eq!(classify(&img, &palette).unwrap(), classify(&img, &palette).unwrap());
    }

    #[test]
    fn equidistant_color_goes_to_first_entry() {
        let palette = Palette::new([
            ("black", Srgb::new(0, 0, 0)),
            ("red", Srgb::new(200, 0, 0)),
        ])
        .unwrap();
        let img = grid(3, 3, |x, _| if x == 0 { [100, 0, 0] } else { [150, 0, 0] });
        let coverage = classify(&img, &palette).unwrap();
        assert_eq!(coverage.count("black"), Some(3));
        assert_eq!(coverage.count("red"), Some(6));
    }

    #[test]
    fn histogram_counts_each_color() {
        let img = grid(3, 2, |x, _| if x == 2 { [9, 9, 9] } else { [0, 0, 0] });
        let colors = histogram(&img);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[&[0, 0, 0]], 4);
        assert_eq!(colors[&[9, 9, 9]], 2);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let empty_palette = Palette::new(Vec::<(&str, Srgb<u8>)>::new()).unwrap();
        let img = grid(2, 2, |_, _| [0, 0, 0]);
        assert!(matches!(
            classify(&img, &empty_palette),
            Err(CoverageError::EmptyPalette)
        ));

        let empty_img = RgbImage::new(0, 5);
        assert!(matches!(
            classify(&empty_img, &Palette::reference()),
            Err(CoverageError::EmptyImage)
        ));
    }
}
