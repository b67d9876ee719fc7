//! JARVIS terminal chat
//!
//! Reads one message per line from stdin and prints replies on stdout.
//! Logs go to stderr so they never interleave with the conversation.

mod repl;

use std::sync::Arc;

use jarvis_core::{ChatSession, GenerationService};
use jarvis_runtime::GeminiProvider;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,jarvis_core=info,jarvis_runtime=info,jarvis_cli=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Initialize generation provider
    let provider = Arc::new(GeminiProvider::from_env()?);
    let model = provider.info().model;

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Gemini ({})", model),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Gemini model {} not reachable - replies may fall back", model);
            tracing::warn!("  Check GEMINI_API_KEY and GEMINI_MODEL");
        }
    }

    let mut session = ChatSession::new(provider);
    tracing::info!(session = %session.id(), started = %session.created_at(), "Type /help for commands");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    repl::run(&mut session, stdin, &mut stdout).await
}
