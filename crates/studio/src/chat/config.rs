//! Chat assistant configuration: providers, fallback chain, prompts and canned answers.

use serde::{Deserialize, Serialize};

/// Known chat providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Oumi,
    Groq,
}

impl ProviderKind {
    pub fn key(&self) -> &'static str {
        match self {
            ProviderKind::Oumi => "oumi",
            ProviderKind::Groq => "groq",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One OpenAI-compatible completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Display name reported in replies
    pub name: String,
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub timeout_ms: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn oumi() -> Self {
        Self {
            kind: ProviderKind::Oumi,
            name: "Oumi".to_string(),
            endpoint: "https://api.oumi.ai/v1/chat/completions".to_string(),
            model: "oumi-flash".to_string(),
            api_key_env: "OUMI_API_KEY".to_string(),
            timeout_ms: 8_000,
            max_tokens: 800,
            temperature: 0.2,
        }
    }

    pub fn groq() -> Self {
        Self {
            kind: ProviderKind::Groq,
            name: "Groq".to_string(),
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_ms: 10_000,
            max_tokens: 500,
            temperature: 0.1,
        }
    }

    /// Partial update, e.g. from a settings screen
    pub fn apply(&mut self, update: &ProviderUpdate) {
        if let Some(endpoint) = &update.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(model) = &update.model {
            self.model = model.clone();
        }
        if let Some(timeout_ms) = update.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
    }
}

/// Partial update of a [`ProviderConfig`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUpdate {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Platform description appended to the system prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformContext {
    pub platform: String,
    pub description: String,
    pub features: Vec<String>,
    pub modes: Vec<String>,
}

impl Default for PlatformContext {
    fn default() -> Self {
        Self {
            platform: "CADara".to_string(),
            description: "Interactive 3D modeling education platform".to_string(),
            features: [
                "Interactive 3D Environment",
                "Progressive Learning",
                "Challenge-based Learning",
                "Transform Controls (move/rotate/scale)",
            ]
            .map(String::from)
            .to_vec(),
            modes: [
                "Playground (free modeling)",
                "Challenge (structured learning)",
                "Tutorial (guided learning)",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl PlatformContext {
    pub fn summary(&self) -> String {
        format!(
            "{} is an {}.\nFeatures: {}.\nModes: {}.",
            self.platform,
            self.description.to_lowercase(),
            self.features.join(", "),
            self.modes.join(", ")
        )
    }
}

/// Canned answers used when every provider fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackResponses {
    pub boolean: String,
    pub challenge: String,
    pub transform: String,
    pub error: String,
    pub default: String,
}

impl Default for FallbackResponses {
    fn default() -> Self {
        Self {
            boolean: "Boolean operations let you combine shapes! Union merges objects, \
                      Subtract removes one from another, and Intersect keeps only overlapping \
                      parts. Try selecting two objects and clicking the operation button."
                .to_string(),
            challenge: "Complete your current challenge by meeting all requirements. \
                        Check the objectives panel to see what is still missing; \
                        the next challenge is waiting once you finish."
                .to_string(),
            transform: "To transform objects: 1) Select an object by clicking it, \
                        2) Choose Move/Rotate/Scale from the toolbar, 3) Drag the colored \
                        arrows/circles to transform. Press ESC to deselect."
                .to_string(),
            error: "Common issues: 1) Objects not aligning - use grid snap, \
                    2) Boolean operation failed - ensure objects overlap, \
                    3) Can't select object - click directly on the mesh. \
                    What specific error are you seeing?"
                .to_string(),
            default: "I'm here to help with CADara! I can assist with:\n\
                      - 3D modeling techniques\n\
                      - Challenge completion\n\
                      - Tool usage (move, rotate, scale)\n\
                      - Boolean operations\n\
                      - Troubleshooting issues\n\n\
                      What would you like to know?"
                .to_string(),
        }
    }
}

impl FallbackResponses {
    /// Pick a canned answer by keyword
    pub fn for_message(&self, message: &str) -> &str {
        let message = message.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| message.contains(w));

        if mentions(&["boolean", "union", "subtract"]) {
            &self.boolean
        } else if mentions(&["challenge", "next"]) {
            &self.challenge
        } else if mentions(&["move", "rotate", "scale"]) {
            &self.transform
        } else if mentions(&["error", "fix", "problem"]) {
            &self.error
        } else {
            &self.default
        }
    }
}

/// Conversation limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUiConfig {
    /// Messages kept in the conversation log
    pub max_messages: usize,
    /// History messages sent with each prompt
    pub context_messages: usize,
}

impl Default for ChatUiConfig {
    fn default() -> Self {
        Self {
            max_messages: 50,
            context_messages: 4,
        }
    }
}

const SYSTEM_PROMPT: &str = "You are an expert CAD tutor assistant for CADara, an interactive 3D modeling learning platform.

CADara Features:
- Interactive 3D playground with cube, sphere, cylinder, cone shapes
- Transform tools: move, rotate, scale
- Measurement and alignment tools
- Guided tutorials and step-by-step challenges
- Real-time feedback and progress tracking

Your role:
- Answer questions about CAD concepts and 3D modeling
- Help troubleshoot modeling issues
- Explain challenge requirements
- Provide step-by-step guidance
- Suggest next learning steps

Be concise, helpful, and encouraging. Use simple language for beginners.";

/// Complete chat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    pub providers: Vec<ProviderConfig>,
    /// Providers tried in order for each message
    pub fallback_chain: Vec<ProviderKind>,
    pub system_prompt: String,
    #[serde(default)]
    pub context: PlatformContext,
    #[serde(default)]
    pub fallback: FallbackResponses,
    #[serde(default)]
    pub ui: ChatUiConfig,
    /// Log each provider attempt
    #[serde(default)]
    pub enable_logging: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            providers: vec![ProviderConfig::oumi(), ProviderConfig::groq()],
            fallback_chain: vec![ProviderKind::Oumi, ProviderKind::Groq],
            system_prompt: SYSTEM_PROMPT.to_string(),
            context: PlatformContext::default(),
            fallback: FallbackResponses::default(),
            ui: ChatUiConfig::default(),
            enable_logging: true,
        }
    }
}

impl ChatConfig {
    pub fn provider(&self, kind: ProviderKind) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.kind == kind)
    }

    pub fn provider_mut(&mut self, kind: ProviderKind) -> Option<&mut ProviderConfig> {
        self.providers.iter_mut().find(|p| p.kind == kind)
    }
}

#[cfg(feature = "native")]
impl ChatConfig {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "cadara", "cadara")
            .map(|dirs| dirs.config_dir().join("chat.json"))
    }

    /// Load from the user config dir, or return defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring unreadable {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("No config directory available")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(&path, json).map_err(|e| e.to_string())
    }
}
