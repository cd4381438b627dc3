//! Review module for forwarding code to external review services
//!
//! This module provides the provider definitions, prompt construction and
//! the HTTP clients for the Claude and Gemini review APIs.

mod claude;
mod gemini;
mod prompt;
mod provider;
mod service;

pub use claude::ClaudeService;
pub use gemini::GeminiService;
pub use prompt::{Prompt, PromptBuilder};
pub use provider::{Provider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use service::{build_service, ReviewService, ServiceSettings};
