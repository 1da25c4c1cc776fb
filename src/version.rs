//! Build metadata helpers used by the CLI.

use std::env::consts;

/// Cargo build profile associated with the binary.
#[must_use]
pub fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

/// Render a scripting-friendly version string.
#[must_use]
pub fn formatted() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let profile = build_profile();
    format!(
        "tasksynth {version}\nprofile: {profile}\ntarget: {}-{}",
        consts::ARCH,
        consts::OS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_includes_required_fields() {
        let version = formatted();
        assert!(version.starts_with("tasksynth "));
        assert!(version.contains(env!("CARGO_PKG_VERSION")));
        assert!(version.contains("profile:"));
        assert!(version.contains("target:"));
    }
}
