//! Parsing of measurement literals such as `"2字符"`, `"12pt"`, `"1.5倍"`
//! or named labels like `"小四"`.

use regex::Regex;
use std::sync::OnceLock;

use super::measurement::{MeasurementValue, UnitKind};
use crate::error::{Error, Result};

/// Unit tokens accepted after a number, with their synonyms.
const UNIT_TABLE: &[(&str, UnitKind)] = &[
    ("pt", UnitKind::Point),
    ("pts", UnitKind::Point),
    ("point", UnitKind::Point),
    ("points", UnitKind::Point),
    ("磅", UnitKind::Point),
    ("cm", UnitKind::Centimeter),
    ("厘米", UnitKind::Centimeter),
    ("公分", UnitKind::Centimeter),
    ("mm", UnitKind::Millimeter),
    ("毫米", UnitKind::Millimeter),
    ("in", UnitKind::Inch),
    ("inch", UnitKind::Inch),
    ("inches", UnitKind::Inch),
    ("\"", UnitKind::Inch),
    ("英寸", UnitKind::Inch),
    ("emu", UnitKind::Emu),
    ("char", UnitKind::CharacterWidth),
    ("chars", UnitKind::CharacterWidth),
    ("ch", UnitKind::CharacterWidth),
    ("字符", UnitKind::CharacterWidth),
    ("字", UnitKind::CharacterWidth),
    ("line", UnitKind::LineMultiple),
    ("lines", UnitKind::LineMultiple),
    ("行", UnitKind::LineMultiple),
    ("倍", UnitKind::LineMultiple),
    ("x", UnitKind::LineMultiple),
    ("times", UnitKind::LineMultiple),
    ("multiple", UnitKind::LineMultiple),
];

/// Named Chinese font sizes in points.
const NAMED_FONT_SIZES: &[(&str, f64)] = &[
    ("初号", 42.0),
    ("小初", 36.0),
    ("一号", 26.0),
    ("小一", 24.0),
    ("二号", 22.0),
    ("小二", 18.0),
    ("三号", 16.0),
    ("小三", 15.0),
    ("四号", 14.0),
    ("小四", 12.0),
    ("五号", 10.5),
    ("小五", 9.0),
    ("六号", 7.5),
    ("小六", 6.5),
    ("七号", 5.5),
    ("八号", 5.0),
];

/// Other enumerated labels (indents, line spacing, spacing).
const NAMED_LABELS: &[(&str, MeasurementValue)] = &[
    ("无", MeasurementValue::chars(0.0)),
    ("none", MeasurementValue::chars(0.0)),
    ("首行缩进", MeasurementValue::chars(2.0)),
    ("首行缩进2字符", MeasurementValue::chars(2.0)),
    ("单倍行距", MeasurementValue::lines(1.0)),
    ("单倍", MeasurementValue::lines(1.0)),
    ("single", MeasurementValue::lines(1.0)),
    ("1.5倍行距", MeasurementValue::lines(1.5)),
    ("双倍行距", MeasurementValue::lines(2.0)),
    ("2倍行距", MeasurementValue::lines(2.0)),
    ("double", MeasurementValue::lines(2.0)),
];

fn literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^([+-]?(?:\d+(?:\.\d*)?|\.\d+))\s*([A-Za-z"\p{Han}]+)$"#).unwrap()
    })
}

/// Look up a unit token (case-insensitive for ASCII spellings).
pub fn lookup_unit(token: &str) -> Option<UnitKind> {
    let lowered = token.trim().to_ascii_lowercase();
    UNIT_TABLE
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, unit)| *unit)
}

/// Look up a named font size (`"小四"` → 12pt).
pub fn named_font_size(label: &str) -> Option<f64> {
    let label = label.trim();
    NAMED_FONT_SIZES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, size)| *size)
}

/// Look up any enumerated label.
pub fn lookup_label(label: &str) -> Option<MeasurementValue> {
    let label = label.trim();
    if let Some(size) = named_font_size(label) {
        return Some(MeasurementValue::points(size));
    }
    let lowered = label.to_lowercase();
    NAMED_LABELS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, value)| *value)
}

/// Parse a literal into a measurement.
///
/// Resolution order: `<number><unit>`, enumerated label, bare number.
/// A bare number comes back in `default_unit`.
pub fn parse_measurement_with_default(
    literal: &str,
    default_unit: UnitKind,
) -> Result<MeasurementValue> {
    let text = literal.trim();
    if text.is_empty() {
        return Err(Error::InvalidMeasurement(literal.to_string()));
    }

    if let Some(caps) = literal_regex().captures(text) {
        if let Some(unit) = lookup_unit(&caps[2]) {
            let magnitude: f64 = caps[1]
                .parse()
                .map_err(|_| Error::InvalidMeasurement(literal.to_string()))?;
            return Ok(MeasurementValue::new(magnitude, unit));
        }
    }

    if let Some(value) = lookup_label(text) {
        return Ok(value);
    }

    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| MeasurementValue::new(v, default_unit))
        .ok_or_else(|| Error::InvalidMeasurement(literal.to_string()))
}

/// Parse a literal; bare numbers are taken as points.
pub fn parse_measurement(literal: &str) -> Result<MeasurementValue> {
    parse_measurement_with_default(literal, UnitKind::Point)
}

impl std::str::FromStr for MeasurementValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_measurement(s)
    }
}
