use super::*;
use crate::cli::GenerateOptions;
use crate::config::CONFIG_BASENAME;
use crate::logging::{LogLevel, LogOptions};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DEMO: &str = include_str!("../../../tests/fixtures/demo_snapshot.json");

fn cli(command: Command) -> Cli {
    Cli {
        command,
        log_options: LogOptions::DEFAULT,
    }
}

fn run_to_string(command: Command) -> (Result<()>, String) {
    let mut out = Vec::new();
    let result = run_with_output(cli(command), &mut out);
    (result, String::from_utf8(out).expect("utf8 output"))
}

fn write_demo(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("snapshot.json");
    fs::write(&path, DEMO).expect("write snapshot");
    path
}

#[test]
fn trace_flag_elevates_level() {
    let options = LogOptions::DEFAULT;
    assert_eq!(
        logging::resolve_effective_level(&options, true),
        LogLevel::Trace
    );
    assert_eq!(
        logging::resolve_effective_level(&options, false),
        options.level
    );

    let mut generate = GenerateOptions::new("a.json");
    assert!(!logging::command_requests_trace(&Command::Generate(
        generate.clone()
    )));
    generate.trace = true;
    assert!(logging::command_requests_trace(&Command::Generate(generate)));
    assert!(!logging::command_requests_trace(&Command::Version));
}

#[test]
fn help_and_version_write_to_output() {
    let (result, text) = run_to_string(Command::Help { topic: None });
    assert!(result.is_ok());
    assert!(text.contains("USAGE:"));

    let (result, text) = run_to_string(Command::Help {
        topic: Some("generate".into()),
    });
    assert!(result.is_ok());
    assert!(text.contains("--no-postfix"));

    let (result, _) = run_to_string(Command::Help {
        topic: Some("bogus".into()),
    });
    assert!(matches!(result, Err(Error::Cli(_))));

    let (result, text) = run_to_string(Command::Version);
    assert!(result.is_ok());
    assert!(text.starts_with("tasksynth "));
}

#[test]
fn generate_writes_fragments_and_summary() {
    let dir = tempdir().expect("tempdir");
    let snapshot = write_demo(dir.path());
    let out_dir = dir.path().join("out");
    let mut options = GenerateOptions::new(&snapshot);
    options.out.clone_from(&out_dir);

    let (result, text) = run_to_string(Command::Generate(options.clone()));
    result.expect("generate");
    assert!(text.contains("generated 5 fragment(s)"));
    assert!(text.contains("(5 written, 0 unchanged)"));
    assert!(out_dir.join("Demo_Repository.Cancellable.g.cs").is_file());
    assert!(out_dir.join("Demo_BarTask.g.cs").is_file());

    let (result, text) = run_to_string(Command::Generate(options));
    result.expect("regenerate");
    assert!(text.contains("(0 written, 5 unchanged)"));
}

#[test]
fn generate_to_stdout_prints_banners() {
    let dir = tempdir().expect("tempdir");
    let snapshot = write_demo(dir.path());
    let mut options = GenerateOptions::new(&snapshot);
    options.stdout = true;
    options.no_postfix = true;

    let (result, text) = run_to_string(Command::Generate(options));
    result.expect("generate");
    assert!(text.starts_with("// ---- Demo_Repository.Cancellable.g.cs ----\n"));
    assert!(!text.contains("TaskExtensions"));
    assert!(!dir.path().join(GenerateOptions::DEFAULT_OUT_DIR).exists());
}

#[test]
fn config_is_discovered_and_overridden_by_switches() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join(CONFIG_BASENAME),
        "runtime_namespace: Found\nfeatures:\n  postfix: false\n",
    )
    .expect("write config");
    let nested = dir.path().join("obj");
    fs::create_dir_all(&nested).expect("mkdir");
    let snapshot = write_demo(&nested);

    let options = GenerateOptions::new(&snapshot);
    let config = generate::resolve_config(&options).expect("config");
    assert_eq!(config.runtime_namespace, "Found");
    assert!(!config.postfix);

    let mut options = GenerateOptions::new(&snapshot);
    options.runtime_namespace = Some("Cli.Wins".into());
    options.no_cancellable = true;
    let config = generate::resolve_config(&options).expect("config");
    assert_eq!(config.runtime_namespace, "Cli.Wins");
    assert!(!config.cancellable);

    options.runtime_namespace = Some("not valid".into());
    let err = generate::resolve_config(&options).expect_err("invalid namespace");
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn missing_snapshot_is_a_snapshot_error() {
    let dir = tempdir().expect("tempdir");
    let options = GenerateOptions::new(dir.path().join("absent.json"));
    let (result, _) = run_to_string(Command::Generate(options));
    assert!(matches!(result, Err(Error::Snapshot { .. })));
}

#[test]
fn reporting_formats_errors() {
    let mut out = Vec::new();
    reporting::report_error_to(&Error::Cancelled, &mut out).expect("report");
    assert_eq!(String::from_utf8(out).expect("utf8"), "error: generation cancelled\n");

    let mut out = Vec::new();
    let err = Error::Cli(crate::cli::CliError::new("missing command"));
    reporting::report_error_to(&err, &mut out).expect("report");
    assert_eq!(String::from_utf8(out).expect("utf8"), "missing command\n");
}
