//! Measurement units: parsing literals and converting between lengths.
//!
//! Absolute lengths (pt, cm, mm, inch, EMU) convert freely through EMU.
//! Character widths and line multiples depend on the rendered document and
//! never convert to anything but themselves.

mod measurement;
mod parse;

pub use measurement::{
    MeasurementValue, UnitKind, EMU_PER_CM, EMU_PER_INCH, EMU_PER_MM, EMU_PER_POINT,
};
pub use parse::{
    lookup_label, lookup_unit, named_font_size, parse_measurement, parse_measurement_with_default,
};

/// Twentieths of a point per point (OOXML "twips").
pub const TWIPS_PER_POINT: f64 = 20.0;

/// Convert twips to points.
pub fn twips_to_points(twips: f64) -> f64 {
    twips / TWIPS_PER_POINT
}

/// Convert points to whole twips.
pub fn points_to_twips(points: f64) -> i64 {
    (points * TWIPS_PER_POINT).round() as i64
}
