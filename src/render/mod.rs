//! Rendering check reports and outlines for output.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{outline_to_text, to_text};

/// Trimmed text cut to `max_chars` characters, with `…` when shortened.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("  第一章 绪论  ", 10), "第一章 绪论");
        assert_eq!(preview("本文研究论文格式", 4), "本文研究…");
    }
}
