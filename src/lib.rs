use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect};

pub mod classify;
pub mod color;
pub mod config;
pub mod decode;
pub mod error;
pub mod palette;
pub mod report;
#[cfg(not(target_arch = "wasm32"))]
pub mod batch;

pub use crate::classify::{Coverage, CoverageEntry, classify};
pub use crate::error::CoverageError;
pub use crate::palette::{Palette, PaletteEntry};

fn js_err(e: CoverageError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Measure how much of an encoded image each palette color covers.
///
/// `palette` is an array of `"name=#rrggbb"` strings; the card reference
/// palette is used when it is omitted. The returned object has the shape
/// `{ total, columns, counts: {name: n}, percentages: {name: "0.123456"} }`
/// with keys in palette order.
#[wasm_bindgen]
pub fn analyze(input: Vec<u8>, palette: Option<Array>) -> std::result::Result<Object, JsValue> {
    // ----------------------
    // 1. Palette
    // ----------------------
    let palette = match palette {
        Some(js_palette) => {
            let mut specs = Vec::new();
            for val in js_palette.iter() {
                let s = val
                    .as_string()
                    .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
                specs.push(s);
            }
            config::palette_from_specs(&specs).map_err(js_err)?
        }
        None => Palette::reference(),
    };

    // ----------------------
    // 2. Decode and classify
    // ----------------------
    let img = decode::decode_rgb(&input).map_err(js_err)?;
    let coverage = classify(&img, &palette).map_err(js_err)?;

    // ----------------------
    // 3. Convert to JS types
    // ----------------------
    let columns = Array::new();
    let counts = Object::new();
    let percentages = Object::new();
    for entry in &coverage.entries {
        let key = JsValue::from_str(&entry.name);
        columns.push(&key);
        Reflect::set(&counts, &key, &JsValue::from_f64(entry.count as f64))?;
        Reflect::set(
            &percentages,
            &key,
            &JsValue::from_str(&report::format_fraction(entry.fraction)),
        )?;
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("total"), &JsValue::from_f64(coverage.total_pixels as f64))?;
    Reflect::set(&result, &JsValue::from_str("columns"), &columns)?;
    Reflect::set(&result, &JsValue::from_str("counts"), &counts)?;
    Reflect::set(&result, &JsValue::from_str("percentages"), &percentages)?;

    Ok(result)
}
