use std::path::PathBuf;

use crate::logging::{LogFormat, LogLevel, LogSettings};

use super::super::CliError;

pub(crate) fn is_help_flag(value: &str) -> bool {
    matches!(value, "-h" | "--help")
}

/// Value following `flag`, advancing `idx` past it.
pub(crate) fn take_value<'a>(
    args: &'a [String],
    idx: &mut usize,
    flag: &str,
    expected: &str,
) -> Result<&'a str, CliError> {
    let Some(value) = args.get(*idx) else {
        return Err(CliError::with_usage(format!(
            "expected {expected} after {flag}"
        )));
    };
    *idx += 1;
    Ok(value.as_str())
}

pub(crate) fn take_path(
    args: &[String],
    idx: &mut usize,
    flag: &str,
) -> Result<PathBuf, CliError> {
    let value = take_value(args, idx, flag, "path")?;
    if value.trim().is_empty() {
        return Err(CliError::with_usage(format!("{flag} path must not be empty")));
    }
    Ok(PathBuf::from(value))
}

/// Try to consume a logging flag at `args[*idx - 1]`.
///
/// Returns `Ok(false)` when `flag` is not a logging option.
pub(crate) fn parse_log_flag(
    flag: &str,
    args: &[String],
    idx: &mut usize,
    settings: &mut LogSettings,
) -> Result<bool, CliError> {
    match flag {
        "--log-format" => {
            let value = take_value(args, idx, flag, "value")?;
            let format = value
                .parse::<LogFormat>()
                .map_err(|err| CliError::with_usage(err.to_string()))?;
            settings.apply_format(format);
            Ok(true)
        }
        "--log-level" => {
            let value = take_value(args, idx, flag, "value")?;
            let level = value
                .parse::<LogLevel>()
                .map_err(|err| CliError::with_usage(err.to_string()))?;
            settings.apply_level(level);
            Ok(true)
        }
        _ => Ok(false),
    }
}
