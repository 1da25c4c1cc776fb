use crate::logging::LogSettings;

use super::super::{Cli, CliError, Command, GenerateOptions};
use super::common::{is_help_flag, parse_log_flag, take_path, take_value};

pub(crate) fn parse(args: Vec<String>) -> Result<Cli, CliError> {
    if args.iter().any(|value| is_help_flag(value)) {
        return Ok(Cli::with_env_logging(Command::Help {
            topic: Some("generate".into()),
        }));
    }

    let mut snapshot = None;
    let mut options = GenerateOptions::new("");
    let mut log_settings = LogSettings::default();
    let mut idx = 0;
    while idx < args.len() {
        let flag = args[idx].as_str();
        idx += 1;
        if parse_log_flag(flag, &args, &mut idx, &mut log_settings)? {
            continue;
        }
        match flag {
            "-o" | "--out" => options.out = take_path(&args, &mut idx, flag)?,
            "-c" | "--config" => options.config = Some(take_path(&args, &mut idx, flag)?),
            "--no-cancellable" => options.no_cancellable = true,
            "--no-postfix" => options.no_postfix = true,
            "--runtime-namespace" => {
                let value = take_value(&args, &mut idx, flag, "namespace")?;
                options.runtime_namespace = Some(value.trim().to_string());
            }
            "--stdout" => options.stdout = true,
            "--trace" => options.trace = true,
            other if other.starts_with('-') => {
                return Err(CliError::with_usage(format!(
                    "unsupported option '{other}' for command"
                )));
            }
            path => {
                if snapshot.is_some() {
                    return Err(CliError::with_usage(format!(
                        "unexpected argument '{path}'; generate accepts a single snapshot"
                    )));
                }
                if path.trim().is_empty() {
                    return Err(CliError::with_usage("snapshot path must not be empty"));
                }
                snapshot = Some(path.to_string());
            }
        }
    }

    let Some(snapshot) = snapshot else {
        return Err(CliError::with_usage(
            "generate requires a snapshot file (tasksynth generate <snapshot.json>)",
        ));
    };
    options.snapshot = snapshot.into();

    Ok(Cli {
        command: Command::Generate(options),
        log_options: log_settings.merged_with_env(),
    })
}
