//! Review prompt construction
//!
//! A prompt is the provider preamble, a heading with the file count, and one
//! section per file. The whole string is cut to the relay's character cap,
//! which may land in the middle of a file.

use crate::files::SourceFile;

use super::Provider;

/// A prompt ready to send to a review service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    file_count: usize,
    truncated: bool,
}

impl Prompt {
    /// Prompt text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of files included (before truncation)
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Whether the character cap cut the prompt short
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Builder for review prompts
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    provider: Provider,
    preamble: Option<String>,
    char_budget: usize,
}

impl PromptBuilder {
    /// Create a builder using the provider's preamble and default cap
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            preamble: None,
            char_budget: provider.default_char_budget(),
        }
    }

    /// Replace the built-in preamble
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    /// Set the character cap
    pub fn with_char_budget(mut self, char_budget: usize) -> Self {
        self.char_budget = char_budget;
        self
    }

    /// Build the prompt for the given sources
    pub fn build(&self, sources: &[SourceFile]) -> Prompt {
        let preamble = self
            .preamble
            .as_deref()
            .unwrap_or_else(|| self.provider.preamble());

        let mut text = String::with_capacity(preamble.len() + 256);
        text.push_str(preamble);
        text.push_str("\n\n");
        text.push_str(&self.provider.files_heading(sources.len()));
        text.push('\n');
        for source in sources {
            text.push_str(&file_section(source));
        }

        let truncated = truncate_chars(&mut text, self.char_budget);

        Prompt {
            text,
            file_count: sources.len(),
            truncated,
        }
    }
}

/// Header and contents for one file
fn file_section(source: &SourceFile) -> String {
    format!("\n\n--- File: {} ---\n{}", source.path, source.content)
}

/// Cut `text` to at most `max_chars` characters; returns whether it was cut
fn truncate_chars(text: &mut String, max_chars: usize) -> bool {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            text.truncate(byte_idx);
            true
        }
        None => false,
    }
}
