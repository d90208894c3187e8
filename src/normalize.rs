//! Bounds extracted text to the inference input budget and frames it with the
//! instruction prompt.

use crate::config::SummarizerConfig;

/// Extracted text cut to the input budget, wrapped in the instruction prompt
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedText {
    /// The full input sent to the inference endpoint
    pub prompt: String,
    /// Number of characters of source text kept
    pub kept_chars: usize,
    /// Whether the source text was cut short
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    max_chars: usize,
    instruction: String,
}

impl Normalizer {
    pub fn new(max_chars: usize, instruction: impl Into<String>) -> Self {
        Self {
            max_chars,
            instruction: instruction.into(),
        }
    }

    pub fn from_config(config: &SummarizerConfig) -> Self {
        Self::new(config.max_input_chars, config.prompt.clone())
    }

    /// Keep the first `max_chars` characters (mid-word cuts allowed) and prepend the instruction.
    pub fn normalize(&self, text: &str) -> BoundedText {
        let bounded = truncate_chars(text, self.max_chars);
        let kept_chars = bounded.chars().count();

        BoundedText {
            prompt: format!("{}\n\n{}", self.instruction, bounded),
            kept_chars,
            truncated: bounded.len() < text.len(),
        }
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
