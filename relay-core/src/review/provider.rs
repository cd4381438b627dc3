//! Review service providers and their fixed per-provider wording

use serde::{Deserialize, Serialize};

/// Embedded review preambles for each provider
const CLAUDE_PREAMBLE: &str = include_str!("prompts/claude.md");
const GEMINI_PREAMBLE: &str = include_str!("prompts/gemini.md");

/// Output token limit sent to both services
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Sampling temperature sent to both services
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// The external service a relay forwards code to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Anthropic Messages API
    Claude,
    /// Google Generative Language API
    Gemini,
}

impl Provider {
    /// All known providers
    pub const ALL: [Provider; 2] = [Provider::Claude, Provider::Gemini];

    /// Human-readable service name
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Gemini => "Gemini",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Claude => "CLAUDE_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Banner marker embedded in every comment this provider's relay posts
    ///
    /// The summary poster recognizes relay comments by this literal substring.
    pub fn banner(&self) -> &'static str {
        match self {
            Provider::Claude => "🧠 Claude Go Code Review",
            Provider::Gemini => "🐹 Gemini Go Code Review",
        }
    }

    /// Default model identifier
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Claude => "claude-sonnet-4-20250514",
            Provider::Gemini => "gemini-1.5-flash-latest",
        }
    }

    /// Default prompt character cap
    pub fn default_char_budget(&self) -> usize {
        match self {
            Provider::Claude => 22_000,
            Provider::Gemini => 18_000,
        }
    }

    /// Default API origin
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Provider::Claude => "https://api.anthropic.com",
            Provider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// The instructional preamble placed before the code
    pub fn preamble(&self) -> &'static str {
        match self {
            Provider::Claude => CLAUDE_PREAMBLE.trim_end(),
            Provider::Gemini => GEMINI_PREAMBLE.trim_end(),
        }
    }

    /// Heading introducing the file sections
    pub fn files_heading(&self, file_count: usize) -> String {
        match self {
            Provider::Claude => format!("Code to review ({} files):", file_count),
            Provider::Gemini => format!("Files analyzed ({}):", file_count),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
