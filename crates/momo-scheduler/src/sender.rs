use async_trait::async_trait;

/// The collaborator that performs the actual fetch-and-deliver side effect.
///
/// Implementations must tolerate being called repeatedly in a tight retry
/// sequence and concurrently from overlapping force-sends.
#[async_trait]
pub trait DailySender: Send + Sync + 'static {
    /// Whether delivery is currently possible: a destination is configured
    /// and the feature toggle is on. Consulted before start and before every
    /// cycle.
    fn is_enabled(&self) -> bool;

    /// Perform one full delivery attempt.
    async fn send(&self) -> anyhow::Result<()>;

    /// Current state for diagnostic logging.
    fn status(&self) -> SenderStatus;
}

/// Diagnostic snapshot of a sender.
#[derive(Debug, Clone)]
pub struct SenderStatus {
    pub enabled: bool,
    /// Human-readable destination descriptor (e.g. the webhook URL).
    pub destination: String,
}
