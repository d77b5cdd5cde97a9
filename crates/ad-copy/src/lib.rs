//! Ad Copy Generation
//!
//! Writes a short classified-ad description for a priced car using the
//! Gemini `generateContent` API, with exponential-backoff retries.

mod client;
mod prompt;

pub use client::{backoff_delay, AdCopyClient, AdCopyConfig, FALLBACK_TEXT};
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION};

use thiserror::Error;

/// Errors generating ad copy
#[derive(Debug, Error)]
pub enum AdCopyError {
    #[error("No API key configured for ad copy generation")]
    MissingApiKey,
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("API call failed with status {0}")]
    Status(u16),
    #[error("Ad copy generation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}
