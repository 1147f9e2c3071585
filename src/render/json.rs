//! JSON rendering for reports, outlines and classified lists.

use serde::Serialize;

use crate::error::Result;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any report type to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckMode, CheckReport};

    fn empty_report() -> CheckReport {
        CheckReport {
            mode: CheckMode::Annotate,
            nodes: Vec::new(),
            skipped: Vec::new(),
            unmatched: Vec::new(),
            duplicates: Vec::new(),
            field_errors: Vec::new(),
            promoted: 0,
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&empty_report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"mode\": \"annotate\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&empty_report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }
}
