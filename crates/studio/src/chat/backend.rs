use std::future::Future;

use shared::PromptMessage;

use super::config::{ProviderConfig, ProviderKind};

/// Text and token usage returned by one provider call
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub content: String,
    pub tokens: u64,
}

/// Failure of a single provider call
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Provider is not configured
    UnknownProvider(ProviderKind),
    /// API key environment variable is not set
    MissingApiKey(String),
    /// Transport-level failure
    Http(String),
    /// Non-success HTTP status
    Status { provider: String, status: u16 },
    /// Provider did not answer within its timeout
    Timeout { provider: String, timeout_ms: u64 },
    /// Response body did not contain a completion
    InvalidResponse(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::UnknownProvider(kind) => write!(f, "Unknown provider: {kind}"),
            ChatError::MissingApiKey(var) => write!(f, "{var} not set"),
            ChatError::Http(msg) => write!(f, "HTTP error: {msg}"),
            ChatError::Status { provider, status } => {
                write!(f, "{provider} API error: {status}")
            }
            ChatError::Timeout {
                provider,
                timeout_ms,
            } => write!(f, "{provider} timed out after {timeout_ms} ms"),
            ChatError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}

/// One completion call against a configured provider
pub trait ChatBackend {
    fn complete(
        &self,
        provider: &ProviderConfig,
        messages: &[PromptMessage],
    ) -> impl Future<Output = Result<ProviderReply, ChatError>> + Send;
}

/// Extract the reply from an OpenAI-style `chat/completions` body
pub fn parse_completion(body: &serde_json::Value) -> Result<ProviderReply, ChatError> {
    let content = body["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .and_then(|choice| choice["message"]["content"].as_str())
        .ok_or_else(|| ChatError::InvalidResponse("missing choices[0].message.content".into()))?;
    Ok(ProviderReply {
        content: content.trim().to_string(),
        tokens: body["usage"]["total_tokens"].as_u64().unwrap_or(0),
    })
}

/// reqwest client speaking the OpenAI-compatible completion protocol
#[cfg(feature = "native")]
#[derive(Debug, Clone, Default)]
pub struct HttpBackend {
    client: reqwest::Client,
}

#[cfg(feature = "native")]
impl HttpBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "native")]
impl ChatBackend for HttpBackend {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        messages: &[PromptMessage],
    ) -> Result<ProviderReply, ChatError> {
        let api_key = std::env::var(&provider.api_key_env)
            .map_err(|_| ChatError::MissingApiKey(provider.api_key_env.clone()))?;

        let response = self
            .client
            .post(&provider.endpoint)
            .bearer_auth(api_key)
            .timeout(std::time::Duration::from_millis(provider.timeout_ms))
            .json(&serde_json::json!({
                "model": provider.model,
                "messages": messages,
                "temperature": provider.temperature,
                "max_tokens": provider.max_tokens,
            }))
            .send()
            .await
            .map_err(|e| request_error(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                provider: provider.name.clone(),
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| request_error(provider, e))?;
        parse_completion(&body)
    }
}

#[cfg(feature = "native")]
fn request_error(provider: &ProviderConfig, e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout {
            provider: provider.name.clone(),
            timeout_ms: provider.timeout_ms,
        }
    } else {
        ChatError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_completion() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "  Use the scale tool. "}}],
            "usage": {"total_tokens": 42}
        });
        let reply = parse_completion(&body).unwrap();
        assert_eq!(reply.content, "Use the scale tool.");
        assert_eq!(reply.tokens, 42);
    }

    #[test]
    fn test_parse_completion_without_usage() {
        let body = json!({"choices": [{"message": {"content": "hi"}}]});
        assert_eq!(parse_completion(&body).unwrap().tokens, 0);
    }

    #[test]
    fn test_parse_completion_missing_choices() {
        let err = parse_completion(&json!({"error": "quota"})).unwrap_err();
        assert!(matches!(err, ChatError::InvalidResponse(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ChatError::Status {
            provider: "Groq".into(),
            status: 429,
        };
        assert_eq!(err.to_string(), "Groq API error: 429");
        assert_eq!(
            ChatError::MissingApiKey("GROQ_API_KEY".into()).to_string(),
            "GROQ_API_KEY not set"
        );
    }
}
