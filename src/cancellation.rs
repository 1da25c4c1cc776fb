//! Cooperative cancellation checkpoints for the generation pipeline.

use std::fmt;

pub use tokio_util::sync::CancellationToken;

/// Raised at a checkpoint once the run's cancellation signal has fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationError {
    context: String,
}

impl CancellationError {
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }

    /// Checkpoint that observed the signal.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl fmt::Display for CancellationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation cancelled at {}", self.context)
    }
}

impl std::error::Error for CancellationError {}

/// Returns `Err` when cancellation was requested on `token`.
///
/// `context` names the checkpoint and is attached to the error and the
/// trace event.
pub fn check_cancellation(
    token: &CancellationToken,
    context: &str,
) -> Result<(), CancellationError> {
    if token.is_cancelled() {
        tracing::debug!(target: "pipeline", context, "cancellation detected");
        Err(CancellationError::new(context))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_token_passes_checkpoint() {
        let token = CancellationToken::new();
        assert!(check_cancellation(&token, "scan").is_ok());
    }

    #[test]
    fn cancelled_token_fails_every_checkpoint() {
        let token = CancellationToken::new();
        assert!(check_cancellation(&token, "first").is_ok());
        token.cancel();
        let err = check_cancellation(&token, "second").expect_err("cancelled");
        assert_eq!(err.context(), "second");
        assert_eq!(err.to_string(), "operation cancelled at second");
        assert!(check_cancellation(&token, "third").is_err());
    }

    #[test]
    fn child_tokens_observe_parent_cancellation() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();
        assert!(check_cancellation(&child, "child").is_err());
    }
}
