use super::*;
use crate::logging::{LogFormat, LogLevel};
use std::path::Path;

fn expect_cli_ok<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    match Cli::parse_from(args.into_iter()) {
        Ok(cli) => cli,
        Err(err) => panic!("expected CLI parse to succeed, found error: {err}"),
    }
}

fn expect_cli_err<I, T>(args: I) -> CliError
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    match Cli::parse_from(args.into_iter()) {
        Ok(cli) => panic!("expected CLI parse to fail, parsed {:?}", cli.command),
        Err(err) => err,
    }
}

fn generate_options(cli: &Cli) -> &GenerateOptions {
    match &cli.command {
        Command::Generate(options) => options,
        other => panic!("expected generate command, found {other:?}"),
    }
}

#[test]
fn resolves_canonical_and_alias_commands() {
    let generate = resolve_command("generate").expect("generate must be registered");
    assert_eq!(generate.name(), "generate");
    let alias = resolve_command("gen").expect("gen alias must be registered");
    assert_eq!(alias.name(), "generate");
    assert!(resolve_command("build").is_none());
}

#[test]
fn generate_defaults() {
    let cli = expect_cli_ok(["generate", "snapshot.json"]);
    let options = generate_options(&cli);
    assert_eq!(options.snapshot, Path::new("snapshot.json"));
    assert_eq!(options.out, Path::new(GenerateOptions::DEFAULT_OUT_DIR));
    assert!(options.config.is_none());
    assert!(!options.no_cancellable);
    assert!(!options.no_postfix);
    assert!(!options.stdout);
    assert!(!options.trace);
}

#[test]
fn generate_accepts_every_option() {
    let cli = expect_cli_ok([
        "gen",
        "--out",
        "obj/gen",
        "in.json",
        "--config",
        "cfg.yaml",
        "--no-cancellable",
        "--no-postfix",
        "--runtime-namespace",
        " Acme.Tasks ",
        "--stdout",
        "--trace",
        "--log-format",
        "json",
        "--log-level",
        "debug",
    ]);
    let options = generate_options(&cli);
    assert_eq!(options.snapshot, Path::new("in.json"));
    assert_eq!(options.out, Path::new("obj/gen"));
    assert_eq!(options.config.as_deref(), Some(Path::new("cfg.yaml")));
    assert!(options.no_cancellable && options.no_postfix);
    assert_eq!(options.runtime_namespace.as_deref(), Some("Acme.Tasks"));
    assert!(options.stdout && options.trace);
    assert_eq!(cli.log_options.format, LogFormat::Json);
    assert_eq!(cli.log_options.level, LogLevel::Debug);
}

#[test]
fn generate_rejects_bad_arguments() {
    let err = expect_cli_err(["generate"]);
    assert!(err.to_string().contains("requires a snapshot file"));
    assert!(err.to_string().contains("USAGE:"));

    let err = expect_cli_err(["generate", "a.json", "b.json"]);
    assert!(err.to_string().contains("unexpected argument 'b.json'"));

    let err = expect_cli_err(["generate", "a.json", "--frobnicate"]);
    assert!(err.to_string().contains("unsupported option '--frobnicate'"));

    let err = expect_cli_err(["generate", "a.json", "--out"]);
    assert!(err.to_string().contains("expected path after --out"));

    let err = expect_cli_err(["generate", "a.json", "--log-level", "loud"]);
    assert!(err.to_string().contains("invalid log level 'loud'"));
}

#[test]
fn help_and_version_forms() {
    let cli = expect_cli_ok(["help"]);
    assert_eq!(cli.command, Command::Help { topic: None });

    let cli = expect_cli_ok(["--help", "Generate"]);
    assert_eq!(
        cli.command,
        Command::Help {
            topic: Some("generate".into())
        }
    );

    let cli = expect_cli_ok(["generate", "--help"]);
    assert_eq!(
        cli.command,
        Command::Help {
            topic: Some("generate".into())
        }
    );

    assert_eq!(expect_cli_ok(["-V"]).command, Command::Version);
    assert_eq!(expect_cli_ok(["version"]).command, Command::Version);
    assert_eq!(
        expect_cli_ok(["version", "-h"]).command,
        Command::Help {
            topic: Some("version".into())
        }
    );
    let err = expect_cli_err(["version", "extra"]);
    assert!(err.to_string().contains("unsupported option 'extra'"));
}

#[test]
fn missing_and_unknown_commands_report_usage() {
    let err = expect_cli_err(std::iter::empty::<String>());
    assert!(err.message().starts_with("missing command"));

    let err = expect_cli_err(["frobnicate"]);
    assert!(err.message().starts_with("unknown command 'frobnicate'"));
    assert!(err.message().contains("COMMANDS:"));
}

#[test]
fn help_topics_render() {
    let general = Cli::usage();
    assert!(general.contains("generate"));
    assert!(general.contains("TASKSYNTH_LOG_LEVEL"));

    let generate = Cli::help_for("gen").expect("alias resolves");
    assert!(generate.contains("--runtime-namespace <ns>"));
    assert!(generate.contains("ALIASES:"));

    let err = Cli::help_for("nope").expect_err("unknown topic");
    assert!(
        err.message()
            .starts_with("unknown help topic 'nope'; available commands: generate, help, version")
    );
}
