use std::io::Write;
use std::path::Path;

use crate::cancellation::CancellationToken;
use crate::cli::GenerateOptions;
use crate::config::GeneratorConfig;
use crate::driver::{GenerationDriver, write_fragments};
use crate::error::Result;
use crate::host::Snapshot;

use super::reporting;

pub(super) fn run(options: &GenerateOptions, out: &mut dyn Write) -> Result<()> {
    let snapshot = Snapshot::load(&options.snapshot)?;
    let config = resolve_config(options)?;
    let driver = GenerationDriver::new(config);
    let output = driver.run(&snapshot, &CancellationToken::new())?;

    if options.stdout {
        reporting::print_fragments(&output, out)?;
        return Ok(());
    }
    let report = write_fragments(&options.out, &output)?;
    reporting::print_summary(&options.out, &output, &report, out)?;
    Ok(())
}

/// Explicit `--config`, else `tasksynth.yaml` found next to or above the
/// snapshot, else defaults; command-line switches applied last.
pub(super) fn resolve_config(options: &GenerateOptions) -> Result<GeneratorConfig> {
    let mut config = match &options.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => {
            let start = options
                .snapshot
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            GeneratorConfig::discover(start)?.unwrap_or_default()
        }
    };
    if options.no_cancellable {
        config.cancellable = false;
    }
    if options.no_postfix {
        config.postfix = false;
    }
    if let Some(namespace) = &options.runtime_namespace {
        config.runtime_namespace.clone_from(namespace);
    }
    config.validate()?;
    tracing::debug!(
        target: "pipeline",
        stage = "config.resolve",
        source = %config
            .source
            .as_deref()
            .map_or_else(|| "<defaults>".to_string(), |path| path.display().to_string()),
        cancellable = config.cancellable,
        postfix = config.postfix,
        "resolved generator configuration"
    );
    Ok(config)
}
