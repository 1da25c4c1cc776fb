//! Generation driver: runs the enabled generators over one snapshot and
//! collects their fragments in a stable order.

use std::collections::HashSet;
use std::time::Instant;

use crate::cancellable::CancellableGenerator;
use crate::cancellation::{CancellationToken, check_cancellation};
use crate::config::GeneratorConfig;
use crate::emit::Fragment;
use crate::error::{Error, Result};
use crate::host::Snapshot;
use crate::postfix::PostfixGenerator;
use crate::postfix::markers::support_fragments;

mod output;
mod service;

pub use output::{WriteReport, write_fragments};
pub use service::{GenerationService, GenerationSession};

/// Fragment counts per generator for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub support: usize,
    pub cancellable: usize,
    pub postfix: usize,
}

impl GenerationStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.support + self.cancellable + self.postfix
    }
}

/// Fragments produced by one run, support files first, then cancellable
/// overloads, then postfix wrappers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub fragments: Vec<Fragment>,
    pub stats: GenerationStats,
}

impl GenerationOutput {
    #[must_use]
    pub fn fragment(&self, id: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|fragment| fragment.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationDriver {
    config: GeneratorConfig,
}

impl GenerationDriver {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run every enabled generator over `snapshot`.
    ///
    /// # Errors
    /// Returns [`Error::Cancelled`] when `token` fires before the run
    /// completes; no partial output is returned in that case. Returns an
    /// internal error when two fragments share an id.
    pub fn run(&self, snapshot: &Snapshot, token: &CancellationToken) -> Result<GenerationOutput> {
        let start = Instant::now();
        check_cancellation(token, "driver.start")?;
        tracing::info!(
            target: "pipeline",
            stage = "driver.start",
            declarations = snapshot.declarations().len(),
            cancellable = self.config.cancellable,
            postfix = self.config.postfix,
            runtime_namespace = %self.config.runtime_namespace,
            "starting generation"
        );

        let config = &self.config;
        let mut output = GenerationOutput::default();

        if config.postfix && config.emit_support_files {
            let support = support_fragments(
                &config.runtime_namespace,
                &config.marker_name,
                &config.opt_in_attribute,
                config.indent_size,
            );
            output.stats.support = support.len();
            output.fragments.extend(support);
        }

        if config.cancellable {
            let generator =
                CancellableGenerator::new(config.runtime_namespace.clone(), config.indent_size);
            let fragments = generator.generate(snapshot, token)?;
            output.stats.cancellable = fragments.len();
            output.fragments.extend(fragments);
        }

        if config.postfix {
            let generator = PostfixGenerator::new(
                config.marker_name.clone(),
                config.opt_in_attribute.clone(),
                config.indent_size,
            );
            let fragments = generator.generate(snapshot, token)?;
            output.stats.postfix = fragments.len();
            output.fragments.extend(fragments);
        }

        ensure_unique_ids(&output.fragments)?;
        check_cancellation(token, "driver.complete")?;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            target: "pipeline",
            stage = "driver.complete",
            support = output.stats.support,
            cancellable = output.stats.cancellable,
            postfix = output.stats.postfix,
            elapsed_ms,
            "generation complete"
        );
        Ok(output)
    }
}

/// Fragment ids name output files; a repeated id would overwrite output.
pub(crate) fn ensure_unique_ids(fragments: &[Fragment]) -> Result<()> {
    let mut seen = HashSet::with_capacity(fragments.len());
    for fragment in fragments {
        if !seen.insert(fragment.id.as_str()) {
            return Err(Error::internal(format!(
                "fragment id `{}` was produced more than once",
                fragment.id
            )));
        }
    }
    Ok(())
}
