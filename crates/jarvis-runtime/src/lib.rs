//! # jarvis-runtime
//!
//! Generation service providers for JARVIS.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Generative Language API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jarvis_runtime::GeminiProvider;
//!
//! let provider = Arc::new(GeminiProvider::from_env()?);
//! let mut session = ChatSession::new(provider);
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

// Re-export core types for convenience
pub use jarvis_core::{
    ChatError, ChatSession, GenerationOptions, GenerationService, Result, Role, ServiceError, Turn,
};
