use std::sync::{Mutex, PoisonError};

use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::host::Snapshot;

use super::{GenerationDriver, GenerationOutput};

/// Narrow interface a host uses to schedule generation runs.
pub trait GenerationService {
    /// Generate fragments for `snapshot`.
    fn submit(&self, snapshot: &Snapshot) -> Result<GenerationOutput>;

    /// Abandon the run in flight, if any.
    fn cancel(&self);
}

/// A driver paired with the signal of its most recent run.
///
/// Each submission supersedes the previous one: its token is cancelled and
/// replaced before the new run starts.
#[derive(Debug, Default)]
pub struct GenerationSession {
    driver: GenerationDriver,
    current: Mutex<CancellationToken>,
}

impl GenerationSession {
    #[must_use]
    pub fn new(driver: GenerationDriver) -> Self {
        Self {
            driver,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// Signal of the run in flight (or of the last finished run).
    #[must_use]
    pub fn current_token(&self) -> CancellationToken {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn begin(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        let fresh = CancellationToken::new();
        *current = fresh.clone();
        fresh
    }
}

impl GenerationService for GenerationSession {
    fn submit(&self, snapshot: &Snapshot) -> Result<GenerationOutput> {
        let token = self.begin();
        self.driver.run(snapshot, &token)
    }

    fn cancel(&self) {
        tracing::debug!(
            target: "pipeline",
            stage = "driver.cancel",
            "cancelling generation run"
        );
        self.current_token().cancel();
    }
}
