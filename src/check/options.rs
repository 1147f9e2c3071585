//! Options for a check run.

use serde::{Deserialize, Serialize};

use crate::diff::Language;

/// What the checker does with the differences it finds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Leave the document as is and attach review comments (default)
    #[default]
    Annotate,
    /// Rewrite differing attributes
    Correct,
}

/// Options for [`Checker`](super::Checker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Annotate or correct
    pub mode: CheckMode,
    /// Message language
    pub language: Language,
    /// Comment author
    pub author: String,
    /// Comment author initials
    pub initials: String,
    /// In correct mode, also leave a comment describing each correction
    pub comment_corrections: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            mode: CheckMode::Annotate,
            language: Language::Zh,
            author: "thesisfmt".to_string(),
            initials: "TF".to_string(),
            comment_corrections: false,
        }
    }
}

impl CheckOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }

    /// Correct instead of annotating.
    pub fn correct(mut self) -> Self {
        self.mode = CheckMode::Correct;
        self
    }

    /// Set the message language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set comment author and initials.
    pub fn with_author(mut self, author: impl Into<String>, initials: impl Into<String>) -> Self {
        self.author = author.into();
        self.initials = initials.into();
        self
    }

    /// Comment every applied correction.
    pub fn with_correction_comments(mut self, enabled: bool) -> Self {
        self.comment_corrections = enabled;
        self
    }
}
