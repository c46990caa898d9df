//! AI tutor chat: prompt building and sequential provider fallback.

pub mod backend;
pub mod config;

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use shared::{AiChatResponse, ChatRole, PromptMessage, SceneContext};

pub use backend::{ChatBackend, ChatError, ProviderReply};
#[cfg(feature = "native")]
pub use backend::HttpBackend;
pub use config::{ChatConfig, ProviderConfig, ProviderKind, ProviderUpdate};

/// Provider name reported for canned answers
pub const FALLBACK_PROVIDER: &str = "Fallback";

/// Result of a provider health probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub available: bool,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Chat front end over a [`ChatBackend`]
pub struct ChatService<B> {
    config: ChatConfig,
    backend: B,
}

impl<B: ChatBackend> ChatService<B> {
    pub fn new(config: ChatConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// System prompt, platform context and the current editor state
    fn system_message(&self, context: Option<&SceneContext>) -> String {
        let mut system = format!(
            "{}\n\n{}",
            self.config.system_prompt,
            self.config.context.summary()
        );
        if let Some(ctx) = context {
            system.push_str(&describe_scene(ctx));
        }
        system
    }

    /// System message, the last `context_messages` of history, then the user message
    pub fn build_prompt(
        &self,
        message: &str,
        history: &[PromptMessage],
        context: Option<&SceneContext>,
    ) -> Vec<PromptMessage> {
        let keep = self.config.ui.context_messages.min(history.len());
        let mut messages = Vec::with_capacity(keep + 2);
        messages.push(PromptMessage::new(
            ChatRole::System,
            self.system_message(context),
        ));
        messages.extend_from_slice(&history[history.len() - keep..]);
        messages.push(PromptMessage::new(ChatRole::User, message));
        messages
    }

    async fn call(
        &self,
        kind: ProviderKind,
        messages: &[PromptMessage],
    ) -> Result<(String, ProviderReply), ChatError> {
        let provider = self
            .config
            .provider(kind)
            .ok_or(ChatError::UnknownProvider(kind))?;
        let reply = self.backend.complete(provider, messages).await?;
        Ok((provider.name.clone(), reply))
    }

    /// Try each provider of the fallback chain in order and return the first
    /// success. When every provider fails, answer with a canned response.
    pub async fn send_message(
        &self,
        message: &str,
        history: &[PromptMessage],
        context: Option<&SceneContext>,
    ) -> AiChatResponse {
        let messages = self.build_prompt(message, history, context);
        let start = Instant::now();
        let mut last_error = None;

        for (attempt, kind) in self.config.fallback_chain.iter().enumerate() {
            if self.config.enable_logging {
                tracing::info!(provider = %kind, "Attempting provider");
            }
            match self.call(*kind, &messages).await {
                Ok((provider, reply)) => {
                    return AiChatResponse {
                        content: reply.content,
                        provider,
                        success: true,
                        response_time_ms: elapsed_ms(start),
                        tokens: reply.tokens,
                        fallback_used: attempt > 0,
                        error: None,
                    };
                }
                Err(e) => {
                    if self.config.enable_logging {
                        tracing::warn!(provider = %kind, "Provider failed: {e}");
                    }
                    last_error = Some(e.to_string());
                }
            }
        }

        AiChatResponse {
            content: self.fallback_response(message).to_string(),
            provider: FALLBACK_PROVIDER.to_string(),
            success: false,
            response_time_ms: elapsed_ms(start),
            tokens: 0,
            fallback_used: true,
            error: Some(last_error.unwrap_or_else(|| "No providers configured".to_string())),
        }
    }

    /// Ask one provider directly, without fallback
    pub async fn route_to_provider(
        &self,
        kind: ProviderKind,
        message: &str,
        history: &[PromptMessage],
    ) -> AiChatResponse {
        let messages = self.build_prompt(message, history, None);
        let start = Instant::now();
        match self.call(kind, &messages).await {
            Ok((provider, reply)) => AiChatResponse {
                content: reply.content,
                provider,
                success: true,
                response_time_ms: elapsed_ms(start),
                tokens: reply.tokens,
                fallback_used: false,
                error: None,
            },
            Err(e) => AiChatResponse {
                content: format!("{kind} provider failed: {e}"),
                provider: kind.to_string(),
                success: false,
                response_time_ms: elapsed_ms(start),
                tokens: 0,
                fallback_used: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// Canned answer chosen by keyword
    pub fn fallback_response(&self, message: &str) -> &str {
        self.config.fallback.for_message(message)
    }

    /// Change a provider's settings. Returns `false` for unconfigured providers.
    pub fn update_provider(&mut self, kind: ProviderKind, update: &ProviderUpdate) -> bool {
        match self.config.provider_mut(kind) {
            Some(provider) => {
                provider.apply(update);
                true
            }
            None => false,
        }
    }

    pub fn set_fallback_chain(&mut self, chain: Vec<ProviderKind>) {
        self.config.fallback_chain = chain;
    }

    /// Probe every configured provider with a one-word prompt
    pub async fn provider_status(&self) -> BTreeMap<ProviderKind, ProviderStatus> {
        let probe = [PromptMessage::new(ChatRole::User, "test")];
        let mut status = BTreeMap::new();
        for provider in &self.config.providers {
            let result = self.backend.complete(provider, &probe).await;
            status.insert(
                provider.kind,
                ProviderStatus {
                    available: result.is_ok(),
                    endpoint: provider.endpoint.clone(),
                    error: result.err().map(|e| e.to_string()),
                },
            );
        }
        status
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn describe_scene(ctx: &SceneContext) -> String {
    let mut out = format!("\n\nCurrent scene: {} object(s)", ctx.object_count);
    if !ctx.object_types.is_empty() {
        let types: Vec<&str> = ctx.object_types.iter().map(|t| t.as_str()).collect();
        out.push_str(&format!(" ({})", types.join(", ")));
    }
    out.push('.');
    if let Some(selected) = &ctx.selected_object {
        out.push_str(&format!("\nSelected: {selected}."));
    }
    if let Some(challenge) = &ctx.challenge {
        out.push_str(&format!(
            "\nWorking on challenge #{} \"{}\" ({}).",
            challenge.id, challenge.title, challenge.difficulty
        ));
    }
    out
}
