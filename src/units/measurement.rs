//! Measurement values and unit conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// EMU per inch (English Metric Units, the OOXML base length).
pub const EMU_PER_INCH: f64 = 914_400.0;
/// EMU per point.
pub const EMU_PER_POINT: f64 = 12_700.0;
/// EMU per centimeter.
pub const EMU_PER_CM: f64 = 360_000.0;
/// EMU per millimeter.
pub const EMU_PER_MM: f64 = 36_000.0;

/// Kind of unit a measurement is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Typographic point (1/72 inch)
    Point,
    /// Centimeter
    Centimeter,
    /// Millimeter
    Millimeter,
    /// Inch
    Inch,
    /// English Metric Unit
    Emu,
    /// Multiple of the current font's character width
    CharacterWidth,
    /// Multiple of the current line height
    LineMultiple,
}

impl UnitKind {
    /// Whether the unit is an absolute length convertible to EMU.
    pub fn is_convertible(self) -> bool {
        !self.is_document_relative()
    }

    /// Whether the unit depends on the rendered document (font, line height).
    pub fn is_document_relative(self) -> bool {
        matches!(self, UnitKind::CharacterWidth | UnitKind::LineMultiple)
    }

    /// Canonical ASCII suffix used by `Display`.
    pub fn suffix(self) -> &'static str {
        match self {
            UnitKind::Point => "pt",
            UnitKind::Centimeter => "cm",
            UnitKind::Millimeter => "mm",
            UnitKind::Inch => "in",
            UnitKind::Emu => "emu",
            UnitKind::CharacterWidth => "char",
            UnitKind::LineMultiple => "line",
        }
    }

    fn emu_factor(self) -> Option<f64> {
        match self {
            UnitKind::Point => Some(EMU_PER_POINT),
            UnitKind::Centimeter => Some(EMU_PER_CM),
            UnitKind::Millimeter => Some(EMU_PER_MM),
            UnitKind::Inch => Some(EMU_PER_INCH),
            UnitKind::Emu => Some(1.0),
            UnitKind::CharacterWidth | UnitKind::LineMultiple => None,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A magnitude paired with its unit. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementValue {
    /// Numeric magnitude
    pub magnitude: f64,
    /// Unit the magnitude is expressed in
    pub unit: UnitKind,
}

impl MeasurementValue {
    /// Create a measurement.
    pub const fn new(magnitude: f64, unit: UnitKind) -> Self {
        Self { magnitude, unit }
    }

    /// Points.
    pub const fn points(magnitude: f64) -> Self {
        Self::new(magnitude, UnitKind::Point)
    }

    /// Character widths.
    pub const fn chars(magnitude: f64) -> Self {
        Self::new(magnitude, UnitKind::CharacterWidth)
    }

    /// Line multiples.
    pub const fn lines(magnitude: f64) -> Self {
        Self::new(magnitude, UnitKind::LineMultiple)
    }

    /// Convert to another unit.
    ///
    /// Document-relative units only convert to themselves.
    pub fn convert_to(&self, target: UnitKind) -> Result<MeasurementValue> {
        if self.unit == target {
            return Ok(*self);
        }
        match (self.unit.emu_factor(), target.emu_factor()) {
            (Some(from), Some(to)) => Ok(Self::new(self.magnitude * from / to, target)),
            _ => Err(Error::UnitIncompatible {
                from: self.unit.to_string(),
                to: target.to_string(),
            }),
        }
    }

    /// Length in EMU, defined for absolute lengths only.
    pub fn to_emu(&self) -> Result<i64> {
        self.convert_to(UnitKind::Emu).map(|v| v.magnitude.round() as i64)
    }

    /// Length in points, defined for absolute lengths only.
    pub fn to_points(&self) -> Result<f64> {
        self.convert_to(UnitKind::Point).map(|v| v.magnitude)
    }

    /// Whether the magnitude is (numerically) zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude.abs() < 1e-9
    }

    /// Compare two measurements within a tolerance expressed in the shared unit.
    ///
    /// Absolute lengths are compared in points (tolerance 0.05pt); document
    /// relative values only compare to the same unit (tolerance 0.01). Zero
    /// equals zero regardless of unit.
    pub fn approx_eq(&self, other: &MeasurementValue) -> bool {
        if self.is_zero() && other.is_zero() {
            return true;
        }
        if self.unit.is_document_relative() || other.unit.is_document_relative() {
            return self.unit == other.unit && (self.magnitude - other.magnitude).abs() < 0.01;
        }
        match (self.to_points(), other.to_points()) {
            (Ok(a), Ok(b)) => (a - b).abs() < 0.05,
            _ => false,
        }
    }
}

impl fmt::Display for MeasurementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_conversion_consistency() {
        let inch = MeasurementValue::new(1.0, UnitKind::Inch);
        let cm = inch.convert_to(UnitKind::Centimeter).unwrap();
        let pt = inch.convert_to(UnitKind::Point).unwrap();
        let mm = inch.convert_to(UnitKind::Millimeter).unwrap();

        assert!((cm.magnitude - 2.54).abs() < 1e-9);
        assert!((pt.magnitude - 72.0).abs() < 1e-9);
        assert!((mm.magnitude - 25.4).abs() < 1e-9);
        assert_eq!(inch.to_emu().unwrap(), 914_400);
        assert_eq!(MeasurementValue::points(1.0).to_emu().unwrap(), 12_700);
    }

    #[test]
    fn test_document_relative_units_do_not_convert() {
        let chars = MeasurementValue::chars(2.0);
        assert!(matches!(
            chars.convert_to(UnitKind::LineMultiple),
            Err(Error::UnitIncompatible { .. })
        ));
        assert!(matches!(
            MeasurementValue::lines(1.0).convert_to(UnitKind::CharacterWidth),
            Err(Error::UnitIncompatible { .. })
        ));
        assert!(chars.convert_to(UnitKind::Centimeter).is_err());
        assert!(chars.to_emu().is_err());
        assert!(MeasurementValue::points(12.0)
            .convert_to(UnitKind::LineMultiple)
            .is_err());
    }

    #[test]
    fn test_identity_conversion() {
        let chars = MeasurementValue::chars(2.0);
        assert_eq!(chars.convert_to(UnitKind::CharacterWidth).unwrap(), chars);
    }

    #[test]
    fn test_approx_eq() {
        let a = MeasurementValue::new(0.74, UnitKind::Centimeter);
        let b = MeasurementValue::points(21.0);
        assert!(a.approx_eq(&b));
        assert!(MeasurementValue::chars(0.0).approx_eq(&MeasurementValue::points(0.0)));
        assert!(!MeasurementValue::chars(2.0).approx_eq(&MeasurementValue::points(24.0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(MeasurementValue::chars(2.0).to_string(), "2char");
        assert_eq!(MeasurementValue::points(10.5).to_string(), "10.5pt");
    }
}
