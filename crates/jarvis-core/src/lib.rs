//! # jarvis-core
//!
//! Chat session logic for the JARVIS assistant, independent of any UI or
//! network stack.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ChatSession                            │
//! │  ┌─────────────┐  ┌─────────────────┐  ┌──────────────────┐  │
//! │  │ Transcript  │  │ Fallback table  │  │ GenerationService│  │
//! │  │ (turns)     │──│ + classifier    │──│ (Strategy)       │  │
//! │  └─────────────┘  └─────────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session moves between two states. `begin` appends the user turn and
//! enters `Awaiting`; the returned [`PendingReply`] performs the network
//! call without borrowing the session; `complete` appends the assistant
//! turn and returns to `Idle`.

pub mod error;
pub mod fallback;
pub mod message;
pub mod provider;
pub mod session;

pub use error::{ChatError, Result, ServiceError, ServiceResult};
pub use fallback::{FailureKind, FALLBACK_REPLIES, pick_fallback};
pub use message::{GREETING, Role, Transcript, Turn};
pub use provider::{GenerationOptions, GenerationService, ServiceInfo};
pub use session::{ChatSession, PendingReply, Reply, SessionId, SessionState};
