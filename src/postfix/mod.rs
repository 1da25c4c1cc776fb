//! Postfix await synthesis.
//!
//! Inside opted-in declarations, every `receiver.Await()` call is resolved
//! to the container it awaits. Each distinct container gets a wrapper struct
//! exposing one `ValueTask` accessor per property of the payload, plus an
//! `Await` overload returning that wrapper. Accessors return `ValueTask`, so
//! `x.Await().A.Await().B` resolves one level per marker call.

mod dedup;
mod emit;
pub mod markers;
mod model;
mod scan;

pub use dedup::deduplicate;
pub use emit::{GENERATOR_NAME, emit_wrapper};
pub use model::{AwaitExtensionModel, AwaitInvocationModel, PropertyModel, WrappedTypeModel};
pub use scan::{classify_receiver, marker_receiver, scan_declaration};

use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::emit::Fragment;
use crate::host::Snapshot;

/// Drives scan, dedup and emission for postfix await wrappers.
#[derive(Debug, Clone)]
pub struct PostfixGenerator {
    marker: String,
    opt_in_attribute: String,
    indent: usize,
}

impl PostfixGenerator {
    #[must_use]
    pub fn new(marker: impl Into<String>, opt_in_attribute: impl Into<String>, indent: usize) -> Self {
        Self {
            marker: marker.into(),
            opt_in_attribute: opt_in_attribute.into(),
            indent,
        }
    }

    /// Marker invocations across all opted-in declarations, in discovery order.
    pub fn invocations(
        &self,
        snapshot: &Snapshot,
        token: &CancellationToken,
    ) -> Result<Vec<AwaitInvocationModel>, CancellationError> {
        let mut invocations = Vec::new();
        for declaration in snapshot.declarations() {
            check_cancellation(token, "postfix.scan")?;
            if !declaration.has_attribute(&self.opt_in_attribute) {
                continue;
            }
            let found = scan_declaration(declaration, snapshot, &self.marker, token)?;
            tracing::trace!(
                target: "pipeline",
                stage = "postfix.scan",
                declaration = %declaration.name,
                invocations = found.len(),
                "scanned opted-in declaration"
            );
            invocations.extend(found);
        }
        Ok(invocations)
    }

    /// One extension model per distinct awaited container.
    pub fn extensions(
        &self,
        snapshot: &Snapshot,
        token: &CancellationToken,
    ) -> Result<Vec<AwaitExtensionModel>, CancellationError> {
        let invocations = self.invocations(snapshot, token)?;
        let discovered = invocations.len();
        let extensions = deduplicate(invocations, token)?;
        tracing::debug!(
            target: "pipeline",
            stage = "postfix.dedup",
            invocations = discovered,
            unique = extensions.len(),
            "deduplicated marker invocations"
        );
        Ok(extensions)
    }

    /// Generate one fragment per distinct awaited container.
    pub fn generate(
        &self,
        snapshot: &Snapshot,
        token: &CancellationToken,
    ) -> Result<Vec<Fragment>, CancellationError> {
        let extensions = self.extensions(snapshot, token)?;
        let mut fragments = Vec::with_capacity(extensions.len());
        for extension in &extensions {
            let fragment = emit_wrapper(extension, &self.marker, self.indent, token)?;
            tracing::debug!(
                target: "pipeline",
                stage = "postfix.emit",
                fragment = %fragment.id,
                container = %extension.container,
                properties = extension.wrapped.properties.len(),
                "emitted postfix wrapper"
            );
            fragments.push(fragment);
        }
        Ok(fragments)
    }
}
