//! LLM API client for OpenAI-compatible and Anthropic backends
//!
//! Sync HTTP via ureq, so no async runtime is needed.

use crate::ai::{AiError, AiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OLLAMA_TAGS_URL: &str = "http://localhost:11434/api/tags";

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
}

impl LlmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "openai",
            LlmBackend::Anthropic => "anthropic",
            LlmBackend::Ollama => "ollama",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "OpenAI",
            LlmBackend::Anthropic => "Anthropic",
            LlmBackend::Ollama => "Ollama (local)",
        }
    }

    /// Environment variable holding the key (the model name for Ollama)
    pub fn env_key(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
            LlmBackend::Ollama => "OLLAMA_MODEL",
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "https://platform.openai.com/api-keys",
            LlmBackend::Anthropic => "https://console.anthropic.com/settings/keys",
            LlmBackend::Ollama => "https://ollama.com (runs locally, no key)",
        }
    }

    /// Model used when neither config nor environment names one. These
    /// follow JSON-shaped instructions well enough for checklist output.
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "gpt-4o",
            LlmBackend::Anthropic => "claude-sonnet-4-20250514",
            LlmBackend::Ollama => "llama3.1:8b",
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "https://api.openai.com/v1/chat/completions",
            LlmBackend::Anthropic => "https://api.anthropic.com/v1/messages",
            LlmBackend::Ollama => "http://localhost:11434/v1/chat/completions",
        }
    }

    /// Speaks the chat-completions protocol
    pub fn is_openai_compatible(&self) -> bool {
        !matches!(self, LlmBackend::Anthropic)
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmBackend::Ollama)
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmBackend {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt" => Ok(LlmBackend::OpenAi),
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            "ollama" => Ok(LlmBackend::Ollama),
            other => Err(AiError::ConfigError(format!(
                "Unknown backend '{}'. Valid backends: openai, anthropic, ollama",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Request settings shared by checklist generation and advice
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub backend: LlmBackend,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask chat-completions backends for a JSON object reply
    pub json_output: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::for_backend(LlmBackend::default())
    }
}

impl AiConfig {
    pub fn for_backend(backend: LlmBackend) -> Self {
        Self {
            backend,
            model: None,
            max_tokens: 4096,
            temperature: 0.2,
            json_output: false,
        }
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }
}

/// Blocking LLM client for the three supported backends
pub struct AiClient {
    config: AiConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // non-2xx is mapped to AiError::ApiError
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl AiClient {
    pub fn new(config: AiConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            agent: make_agent(REQUEST_TIMEOUT),
        }
    }

    /// Build a client, reading the key from the backend's environment
    /// variable first and `fallback_key` (usually the user config) second.
    ///
    /// Ollama needs no key; `OLLAMA_MODEL` overrides its model instead.
    pub fn from_env_or_key(mut config: AiConfig, fallback_key: Option<&str>) -> AiResult<Self> {
        let backend = config.backend;
        if !backend.requires_api_key() {
            if let Some(model) = non_blank_env(backend.env_key()) {
                config.model = Some(model);
            }
            return Ok(Self::new(config, String::new()));
        }

        let api_key = non_blank_env(backend.env_key())
            .or_else(|| fallback_key.map(str::to_string))
            .ok_or_else(|| AiError::MissingApiKey {
                env_var: backend.env_key().to_string(),
                signup_url: backend.signup_url().to_string(),
            })?;

        Ok(Self::new(config, api_key))
    }

    /// Whether a local Ollama server answers on its default port
    pub fn ollama_available() -> bool {
        make_agent(Duration::from_secs(2))
            .get(OLLAMA_TAGS_URL)
            .call()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    pub fn backend(&self) -> LlmBackend {
        self.config.backend
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }

    /// Send `messages` (plus an optional system prompt) and return the
    /// reply text
    pub fn generate(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        debug!(
            "Sending {} message(s) to {} ({})",
            messages.len(),
            self.config.backend,
            self.config.model()
        );
        if self.config.backend.is_openai_compatible() {
            self.chat_completion(messages, system)
        } else {
            self.anthropic_message(messages, system)
        }
    }

    fn chat_completion(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        let messages = system
            .map(|sys| Message::new(Role::System, sys))
            .into_iter()
            .chain(messages)
            .collect();
        let body = ChatRequest {
            model: self.config.model(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: self.config.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let bearer = format!("Bearer {}", self.api_key);
        let auth;
        let headers: &[(&str, &str)] = if self.config.backend.requires_api_key() {
            auth = [("Authorization", bearer.as_str())];
            &auth
        } else {
            &[]
        };

        let reply: ChatResponse = self.post(headers, &body)?;
        reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| AiError::ParseError("No response choices".to_string()))
    }

    fn anthropic_message(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        let body = AnthropicRequest {
            model: self.config.model(),
            max_tokens: self.config.max_tokens,
            messages: messages
                .into_iter()
                .filter(|m| m.role != Role::System)
                .collect(),
            system,
            temperature: self.config.temperature,
        };

        let headers = [
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
        ];
        let reply: AnthropicResponse = self.post(&headers, &body)?;
        join_text_blocks(reply)
    }

    /// POST a JSON body to the backend endpoint and decode the reply
    fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        headers: &[(&str, &str)],
        body: &B,
    ) -> AiResult<R> {
        let mut request = self
            .agent
            .post(self.config.backend.endpoint())
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send_json(body).map_err(|e| AiError::ApiError {
            status: 0,
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(AiError::ApiError { status, message });
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| AiError::ParseError(e.to_string()))
    }
}

/// Concatenate the text blocks of an Anthropic reply, skipping tool use
/// and other block types
fn join_text_blocks(reply: AnthropicResponse) -> AiResult<String> {
    let text: String = reply
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .map(|block| block.text)
        .collect();
    if text.is_empty() {
        return Err(AiError::ParseError("No text content in response".to_string()));
    }
    Ok(text)
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    temperature: f32,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        assert_eq!(LlmBackend::default(), LlmBackend::OpenAi);
        assert_eq!(LlmBackend::OpenAi.default_model(), "gpt-4o");
        assert!(LlmBackend::Ollama.is_openai_compatible());
        assert!(!LlmBackend::Anthropic.is_openai_compatible());
        assert!(!LlmBackend::Ollama.requires_api_key());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("OpenAI".parse::<LlmBackend>().unwrap(), LlmBackend::OpenAi);
        assert_eq!("claude".parse::<LlmBackend>().unwrap(), LlmBackend::Anthropic);
        assert_eq!(" ollama ".parse::<LlmBackend>().unwrap(), LlmBackend::Ollama);
        assert!("gemini".parse::<LlmBackend>().is_err());
    }

    #[test]
    fn test_config_model() {
        let config = AiConfig::default();
        assert_eq!(config.model(), "gpt-4o");

        let config = AiConfig {
            model: Some("custom-model".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model(), "custom-model");
    }

    #[test]
    fn test_anthropic_request_omits_missing_system() {
        let body = AnthropicRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 10,
            messages: vec![Message::user("hi")],
            system: None,
            temperature: 0.2,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("system"));
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn test_anthropic_text_blocks_joined() {
        let reply: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"[{"},{"type":"tool_use"},{"type":"text","text":"}]"}]}"#,
        )
        .unwrap();
        assert_eq!(join_text_blocks(reply).unwrap(), "[{}]");
    }

    #[test]
    fn test_anthropic_reply_without_text_is_error() {
        let reply: AnthropicResponse =
            serde_json::from_str(r#"{"content":[{"type":"tool_use"}]}"#).unwrap();
        assert!(matches!(
            join_text_blocks(reply),
            Err(AiError::ParseError(_))
        ));
    }

    #[test]
    fn test_fallback_key_used() {
        let config = AiConfig {
            backend: LlmBackend::Anthropic,
            ..Default::default()
        };
        // Passes whether or not ANTHROPIC_API_KEY is set in the environment
        let client = AiClient::from_env_or_key(config, Some("sk-ant-test")).unwrap();
        assert_eq!(client.backend(), LlmBackend::Anthropic);
    }

    #[test]
    fn test_json_output_serialized_only_when_requested() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: vec![Message::user("hi")],
            max_tokens: 10,
            temperature: 0.0,
            response_format: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("response_format"));

        let body = ChatRequest {
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
            ..body
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""response_format":{"type":"json_object"}"#));
    }
}
