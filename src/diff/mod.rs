//! Diff engine and correction engine.
//!
//! [`DiffEngine`] compares an effective style spec against a target spec and
//! returns [`DiffRecord`]s ordered by severity. [`CorrectionEngine`] writes
//! those records back through the document's mutable views.

mod correct;
mod engine;
mod record;

pub use correct::{AppliedCorrection, CorrectionEngine};
pub use engine::DiffEngine;
pub use record::{sort_by_severity, DiffRecord, DiffValue, FieldId, Language, WarningMask};
