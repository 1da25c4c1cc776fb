//! Cancellation-result containers returned by the synthesized overloads.
//!
//! Each result owns a controller token and the computation started with a
//! child of that token. Cancelling the controller is a one-way latch; the
//! computation stops only if it observes its token.

mod task;
mod value_task;

pub use task::CancellableTask;
pub use value_task::CancellableValueTask;

pub use crate::cancellation::{CancellationError, CancellationToken};

use std::fmt;

use crate::classify::TaskKind;

/// Fault raised when a postfix marker runs because no wrapper was
/// synthesized for its call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMisuse {
    kind: TaskKind,
    marker: String,
    attribute: String,
}

impl MarkerMisuse {
    /// `attribute` is the fully-qualified opt-in attribute name.
    #[must_use]
    pub fn new(kind: TaskKind, marker: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            kind,
            marker: marker.into(),
            attribute: attribute.into(),
        }
    }

    /// Generic marker signature (`Await<T>(this Task<T> task)`).
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}<T>(this {}<T> task)", self.marker, self.kind.name())
    }
}

impl fmt::Display for MarkerMisuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The stub (marker) method '{}' for postfix await expressions may not be called. \
             This indicates either a bug in the postfix await generator or an incorrect usage \
             thereof. Make sure that any type containing members using this method are \
             annotated with the '{}' attribute.",
            self.signature(),
            self.attribute
        )
    }
}

impl std::error::Error for MarkerMisuse {}
