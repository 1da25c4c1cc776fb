//! Cancellable overload synthesis.
//!
//! Every method of a partial type that returns `Task`/`ValueTask` (optionally
//! generic) and takes a `CancellationToken` gains an overload without the
//! token. The overload owns a fresh token source, forwards to the original
//! method, and returns the task bundled with its source as a cancellable
//! result.

mod emit;
mod model;
mod scan;

pub use emit::{GENERATOR_NAME, emit_group, group_by_containing_type};
pub use model::{CancellableMethodModel, ContainingTypeDescriptor, ParameterDescriptor};
pub use scan::{Candidate, scan_candidates};

use crate::cancellation::{CancellationError, CancellationToken};
use crate::emit::Fragment;
use crate::host::Snapshot;

/// Drives scan, modeling and emission for cancellable overloads.
#[derive(Debug, Clone)]
pub struct CancellableGenerator {
    runtime_namespace: String,
    indent: usize,
}

impl CancellableGenerator {
    #[must_use]
    pub fn new(runtime_namespace: impl Into<String>, indent: usize) -> Self {
        Self {
            runtime_namespace: runtime_namespace.into(),
            indent,
        }
    }

    /// Models for every qualifying method, in snapshot order.
    pub fn models(
        &self,
        snapshot: &Snapshot,
        token: &CancellationToken,
    ) -> Result<Vec<CancellableMethodModel>, CancellationError> {
        let candidates = scan_candidates(snapshot, token)?;
        let mut models = Vec::new();
        for candidate in &candidates {
            match CancellableMethodModel::create(
                candidate.declaration,
                candidate.method,
                &self.runtime_namespace,
                token,
            )? {
                Some(model) => models.push(model),
                None => tracing::trace!(
                    target: "pipeline",
                    stage = "cancellable.model",
                    declaration = %candidate.declaration.name,
                    method = %candidate.method.name,
                    "method does not qualify"
                ),
            }
        }
        tracing::debug!(
            target: "pipeline",
            stage = "cancellable.model",
            candidates = candidates.len(),
            matched = models.len(),
            "modeled cancellable methods"
        );
        Ok(models)
    }

    /// Generate one fragment per containing type.
    pub fn generate(
        &self,
        snapshot: &Snapshot,
        token: &CancellationToken,
    ) -> Result<Vec<Fragment>, CancellationError> {
        let models = self.models(snapshot, token)?;
        let mut fragments = Vec::new();
        for group in group_by_containing_type(models) {
            if let Some(fragment) = emit_group(&group, self.indent, token)? {
                tracing::debug!(
                    target: "pipeline",
                    stage = "cancellable.emit",
                    fragment = %fragment.id,
                    methods = group.len(),
                    "emitted cancellable overloads"
                );
                fragments.push(fragment);
            }
        }
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests;
