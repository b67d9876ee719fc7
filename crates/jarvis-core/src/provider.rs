//! Generation Service Strategy
//!
//! The session talks to a text-completion backend only through
//! [`GenerationService`]: prompt in, text out, or an error carrying a
//! message. Any provider satisfying that contract can be injected.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jarvis_core::{ChatSession, GenerationService};
//!
//! let service: Arc<dyn GenerationService> = Arc::new(GeminiProvider::from_env()?);
//! let mut session = ChatSession::new(service);
//! session.submit("Hello").await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;

/// Configuration for text generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-1.5-flash")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const fn default_temperature() -> f32 { 0.7 }
const fn default_max_tokens() -> u32 { 2048 }
const fn default_top_p() -> f32 { 0.95 }

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: Vec::new(),
        }
    }
}

/// Provider metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Provider name (e.g., "Gemini")
    pub name: String,

    /// Model requests are sent to
    pub model: String,
}

/// Strategy trait for text-generation backends
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait GenerationService: Send + Sync {
    /// Provider name and target model
    fn info(&self) -> ServiceInfo;

    /// Check if the provider is reachable and the model exists
    async fn health_check(&self) -> ServiceResult<bool> {
        Ok(true)
    }

    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> ServiceResult<String>;
}
