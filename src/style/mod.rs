//! Style specs, the effective-style cascade and rulebook targets.

mod cascade;
mod spec;
mod target;

pub use cascade::{StyleCascade, DEFAULT_FONT_SIZE};
pub use spec::{CharacterStyleSpec, ParagraphStyleSpec};
pub use target::{build_target, FieldError, TargetStyle};
