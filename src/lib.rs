#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::perf, clippy::suspicious)] // Catch correctness + perf + suspicious patterns early.
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Source synthesis for task-returning APIs: cancellable overloads for
//! methods taking a cancellation token, and wrapper types that let awaits be
//! written in postfix position.

pub mod cancellable;
pub mod cancellation;
pub mod classify;
pub mod cli;
pub mod config;
pub mod driver;
pub mod emit;
pub mod error;
pub mod host;
pub mod logging;
pub mod postfix;
pub mod runtime;
pub mod version;

pub use cancellation::CancellationToken;
pub use config::GeneratorConfig;
pub use driver::{GenerationDriver, GenerationOutput, GenerationStats};
pub use emit::Fragment;
pub use error::{Error, Result};
pub use host::Snapshot;
