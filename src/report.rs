//! CSV summary: one header row, then one row per analysed image.

use std::io;

use crate::classify::Coverage;
use crate::error::{CoverageError, Result};
use crate::palette::Palette;

/// Fixed-point with six decimals, e.g. `0.123456`.
pub fn format_fraction(fraction: f64) -> String {
    format!("{fraction:.6}")
}

/// `Filename, <name>_percent..., <name>...` in palette order.
pub fn header(palette: &Palette) -> Vec<String> {
    std::iter::once("Filename".to_string())
        .chain(palette.names().map(|name| format!("{name}_percent")))
        .chain(palette.names().map(str::to_string))
        .collect()
}

pub struct ReportWriter<W: io::Write> {
    writer: csv::Writer<W>,
    columns: Vec<String>,
}

impl<W: io::Write> ReportWriter<W> {
    /// Wraps `writer` and emits the header row straight away.
    pub fn new(writer: W, palette: &Palette) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(header(palette))?;
        Ok(Self {
            writer,
            columns: palette.names().map(str::to_string).collect(),
        })
    }

    /// Fails with `InvalidPalette` if `coverage` lacks one of the header's colors.
    pub fn write_row(&mut self, filename: &str, coverage: &Coverage) -> Result<()> {
        let missing = |name: &str| {
            CoverageError::InvalidPalette(format!(
                "coverage for {filename:?} has no {name:?} column"
            ))
        };
        let mut percents = Vec::with_capacity(self.columns.len());
        let mut counts = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            let entry = coverage
                .entries
                .iter()
                .find(|e| &e.name == name)
                .ok_or_else(|| missing(name.as_str()))?;
            percents.push(format_fraction(entry.fraction));
            counts.push(entry.count.to_string());
        }

        let mut row = Vec::with_capacity(1 + 2 * self.columns.len());
        row.push(filename.to_string());
        row.extend(percents);
        row.extend(counts);
        self.writer.write_record(&row)?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use image::{Rgb, RgbImage};
    use pretty_assertions::assert_eq;

    #[test]
    fn six_decimals_always() {
        assert_eq!(format_fraction(1.0), "1.000000");
        assert_eq!(format_fraction(0.0), "0.000000");
        assert_eq!(format_fraction(0.1234564), "0.123456");
    }

    #[test]
    fn coverage_from_another_palette_is_rejected() {
        let other = Palette::from_channels([("ink", [0, 0, 0])]).unwrap();
        let coverage = classify(&RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])), &other).unwrap();

        let mut report = ReportWriter::new(Vec::new(), &Palette::reference()).unwrap();
        let err = report.write_row("card.png", &coverage).unwrap_err();
        assert!(matches!(err, CoverageError::InvalidPalette(_)));

        let out = String::from_utf8(report.finish().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 1, "only the header is written");
    }

    #[test]
    fn writes_header_and_rows() {
        let palette = Palette::reference();
        let img = RgbImage::from_fn(4, 4, |_, y| {
            if y < 3 { Rgb([255, 105, 180]) } else { Rgb([1, 1, 1]) }
        });
        let coverage = classify(&img, &palette).unwrap();

        let mut report = ReportWriter::new(Vec::new(), &palette).unwrap();
        report.write_row("card, front.png", &coverage).unwrap();
        let out = String::from_utf8(report.finish().unwrap()).unwrap();

        assert_eq!(
            out,
            "Filename,hotpink_percent,darkcyan_percent,lightgray_percent,blue_percent,white_percent,hotpink,darkcyan,lightgray,blue,white\n\
             \"card, front.png\",0.750000,0.250000,0.000000,0.000000,0.000000,12,4,0,0,0\n"
        );
    }
}
