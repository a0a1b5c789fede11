//! LLM access for checklist generation and trip advice
//!
//! Supports OpenAI-compatible backends (OpenAI, local Ollama) and
//! Anthropic. Uses BYOK (bring your own key): API keys come from
//! environment variables or the user config file.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY`: Required for the OpenAI backend (default)
//! - `ANTHROPIC_API_KEY`: Required for the Anthropic backend
//! - `OLLAMA_MODEL`: Optional model override for Ollama
//!
//! # Example
//!
//! ```rust,ignore
//! use tripcheck::ai::{AiClient, AiConfig, LlmBackend, Message};
//!
//! let config = AiConfig::for_backend(LlmBackend::OpenAi);
//! let client = AiClient::from_env_or_key(config, None)?;
//! let reply = client.generate(vec![Message::user("Lagos to Abuja")], Some(prompt))?;
//! ```

mod client;
pub mod prompts;

pub use client::{AiClient, AiConfig, LlmBackend, Message, Role};

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type AiResult<T> = Result<T, AiError>;
