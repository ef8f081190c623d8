use log::warn;
use serde::Serialize;

use crate::{sm3::structs::Sm3Page, sm4::structs::Page, types::PageStrings};

/// A calibrated, owned image grid materialized from a page.
///
/// Samples land at `data[row][x_res - 1 - x]`, the documented x-axis flip
/// of the raw stream; `scan_dir` and the sign of `y_scale` stay on the
/// page for callers that want display orientation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataField {
    pub x_res: usize,
    pub y_res: usize,
    /// Physical extents, `res * |scale|`.
    pub x_real: f64,
    pub y_real: f64,
    pub x_unit: Option<String>,
    pub z_unit: Option<String>,
    /// Row-major calibrated values, `y_res * x_res` long.
    pub data: Vec<f64>,
}

impl DataField {
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.x_res + col]
    }
}

/// One calibrated curve of a line (spectrum) page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub label: Option<String>,
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Page<'_> {
    /// Materialize an image page into a calibrated grid.
    pub fn to_field(&self) -> DataField {
        image_field(
            self.header.x_size,
            self.header.y_size,
            self.header.x_scale,
            self.header.y_scale,
            self.header.z_scale,
            self.header.z_offset,
            self.samples(),
            &self.strings,
        )
    }

    /// Materialize a line page into one curve per row.
    pub fn to_curves(&self) -> Vec<Curve> {
        let label = self.label().map(str::to_string);
        line_curves(
            self.header.x_size,
            self.header.y_size,
            self.header.x_scale,
            self.header.x_offset,
            self.header.z_scale,
            self.header.z_offset,
            self.samples(),
            &self.strings,
            |_| label.clone(),
        )
    }
}

impl Sm3Page<'_> {
    pub fn to_field(&self) -> DataField {
        image_field(
            self.x_size,
            self.y_size,
            self.x_scale,
            self.y_scale,
            self.z_scale,
            self.z_offset,
            self.samples(),
            &self.strings,
        )
    }

    /// Curves carry their 1-based index as label; SM3 lines have no
    /// per-curve descriptions of their own.
    pub fn to_curves(&self) -> Vec<Curve> {
        line_curves(
            self.x_size,
            self.y_size,
            self.x_scale,
            self.x_offset,
            self.z_scale,
            self.z_offset,
            self.samples(),
            &self.strings,
            |i| Some((i + 1).to_string()),
        )
    }
}

fn image_field(
    x_size: u32,
    y_size: u32,
    x_scale: f64,
    y_scale: f64,
    z_scale: f64,
    z_offset: f64,
    samples: impl Iterator<Item = i32>,
    strings: &PageStrings,
) -> DataField {
    let x_res = x_size as usize;
    let y_res = y_size as usize;
    let mut data = vec![0.0; x_res * y_res];
    for (i, raw) in samples.take(x_res * y_res).enumerate() {
        let row = i / x_res;
        let col = i % x_res;
        data[row * x_res + (x_res - 1 - col)] = raw as f64 * z_scale + z_offset;
    }

    DataField {
        x_res,
        y_res,
        x_real: x_res as f64 * x_scale.abs(),
        y_real: y_res as f64 * y_scale.abs(),
        x_unit: lateral_units(strings),
        z_unit: strings.z_units().map(|u| fix_unit(u).to_string()),
        data,
    }
}

#[allow(clippy::too_many_arguments)]
fn line_curves(
    x_size: u32,
    y_size: u32,
    x_scale: f64,
    x_offset: f64,
    z_scale: f64,
    z_offset: f64,
    samples: impl Iterator<Item = i32>,
    strings: &PageStrings,
    label: impl Fn(usize) -> Option<String>,
) -> Vec<Curve> {
    let res = x_size as usize;
    let ncurves = y_size as usize;
    let x: Vec<f64> = (0..res).map(|j| j as f64 * x_scale + x_offset).collect();
    let x_unit = strings.x_units().map(str::to_string);
    let y_unit = strings.z_units().map(|u| fix_unit(u).to_string());

    let mut raw = samples;
    (0..ncurves)
        .map(|i| Curve {
            label: label(i),
            x_unit: x_unit.clone(),
            y_unit: y_unit.clone(),
            x: x.clone(),
            y: raw
                .by_ref()
                .take(res)
                .map(|v| v as f64 * z_scale + z_offset)
                .collect(),
        })
        .collect()
}

fn lateral_units(strings: &PageStrings) -> Option<String> {
    match (strings.x_units(), strings.y_units()) {
        (Some(x), Some(y)) => {
            if x != y {
                warn!("X and Y units differ, using X");
            }
            Some(x.to_string())
        }
        (Some(x), None) => Some(x.to_string()),
        (None, Some(y)) => Some(y.to_string()),
        (None, None) => None,
    }
}

/// Some writers emit units no unit parser should have to accept.
pub fn fix_unit(unit: &str) -> &str {
    match unit {
        "N/sec" => "s^-1",
        "Vrms" | "Vp" => "V",
        other => other,
    }
}
