use thiserror::Error;

/// The operator-facing chat channel (a bot, in practice). Strictly fire-and-forget: the engine makes one delivery
/// attempt per message and swallows any failure.
#[allow(async_fn_in_trait)]
pub trait ChatSink: Clone {
    async fn send(&self, text: &str) -> Result<(), ChatSinkError>;
}

#[derive(Debug, Clone, Error)]
#[error("Could not deliver chat message: {0}")]
pub struct ChatSinkError(pub String);
