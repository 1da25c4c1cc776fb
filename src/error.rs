use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::cli::CliError;

/// Unified error type for the generator.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Cli(CliError),
    /// The host snapshot could not be read or decoded.
    Snapshot {
        path: Option<PathBuf>,
        message: String,
    },
    /// The generator configuration could not be read or decoded.
    Config {
        path: Option<PathBuf>,
        message: String,
    },
    /// The run was abandoned because its cancellation signal fired.
    Cancelled,
    Internal {
        message: String,
        backtrace: Option<Backtrace>,
    },
}

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn snapshot(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path,
            message: message.into(),
        }
    }

    pub fn config(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path,
            message: message.into(),
        }
    }

    /// Construct a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            backtrace: capture_backtrace(),
        }
    }

    /// Whether the error is a cooperative abort rather than a fault.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Return the captured backtrace, if any.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            Error::Internal { backtrace, .. } => backtrace.as_ref(),
            _ => None,
        }
    }
}

fn capture_backtrace() -> Option<Backtrace> {
    if cfg!(debug_assertions) {
        Some(Backtrace::force_capture())
    } else {
        None
    }
}

fn write_located(
    f: &mut fmt::Formatter<'_>,
    what: &str,
    path: Option<&PathBuf>,
    message: &str,
) -> fmt::Result {
    match path {
        Some(path) => write!(f, "{what} error in {}: {message}", path.display()),
        None => write!(f, "{what} error: {message}"),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Cli(err) => write!(f, "{err}"),
            Error::Snapshot { path, message } => {
                write_located(f, "snapshot", path.as_ref(), message)
            }
            Error::Config { path, message } => write_located(f, "config", path.as_ref(), message),
            Error::Cancelled => f.write_str("generation cancelled"),
            Error::Internal { message, .. } => write!(f, "internal error: {message}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Cli(err) => Some(err),
            Error::Snapshot { .. }
            | Error::Config { .. }
            | Error::Cancelled
            | Error::Internal { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<CliError> for Error {
    fn from(error: CliError) -> Self {
        Error::Cli(error)
    }
}

impl From<crate::cancellation::CancellationError> for Error {
    fn from(_: crate::cancellation::CancellationError) -> Self {
        Error::Cancelled
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::internal(message)
    }
}
