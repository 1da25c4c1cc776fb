use std::time::Duration;

use crate::cli::Command;
use crate::logging::{LogFormat, LogLevel, LogOptions};

pub(super) fn resolve_effective_level(options: &LogOptions, trace_requested: bool) -> LogLevel {
    let base = options.level;
    if trace_requested && base < LogLevel::Trace {
        LogLevel::Trace
    } else {
        base
    }
}

pub(super) fn command_requests_trace(command: &Command) -> bool {
    matches!(command, Command::Generate(options) if options.trace)
}

pub(super) fn init_logging(options: &LogOptions, enforced_level: LogLevel) {
    use std::io::IsTerminal;
    use std::sync::OnceLock;
    use tracing_subscriber::{EnvFilter, fmt};

    static INITIALISED: OnceLock<()> = OnceLock::new();

    let _ = INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        let level = enforced_level.as_tracing_level();
        let make_filter = || {
            let directive = enforced_level.to_string();
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
        };

        match options.format {
            LogFormat::Json => {
                let subscriber = fmt::fmt()
                    .with_env_filter(make_filter())
                    .with_max_level(level)
                    .with_ansi(use_ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .json()
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
            _ => {
                let subscriber = fmt::fmt()
                    .with_env_filter(make_filter())
                    .with_max_level(level)
                    .with_ansi(use_ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .compact()
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
        }
    });
}

pub(super) fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Generate(_) => "generate",
        Command::Help { .. } => "help",
        Command::Version => "version",
    }
}

fn snapshot_summary(command: &Command) -> String {
    match command {
        Command::Generate(options) => options.snapshot.display().to_string(),
        _ => "<none>".into(),
    }
}

pub(super) fn log_run_start(command: &Command, options: &LogOptions, trace_requested: bool) {
    tracing::info!(
        target: "pipeline",
        stage = "cli.run.start",
        command = command_name(command),
        status = "start",
        log_level = %options.level,
        log_format = %options.format,
        trace = trace_requested,
        snapshot = %snapshot_summary(command)
    );
}

pub(super) fn log_run_complete(
    command: &Command,
    elapsed: Duration,
    result: &crate::error::Result<()>,
) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(()) => tracing::info!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "ok",
            elapsed_ms
        ),
        Err(err) if err.is_cancelled() => tracing::warn!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "cancelled",
            elapsed_ms
        ),
        Err(err) => tracing::error!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "error",
            elapsed_ms,
            error = %err
        ),
    }
}
