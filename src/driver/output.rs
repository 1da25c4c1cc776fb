use std::fs;
use std::path::{Path, PathBuf};

use crate::emit::fingerprint;
use crate::error::Result;

use super::GenerationOutput;

/// Outcome of writing fragments to disk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Files left alone because their content already matched.
    pub unchanged: Vec<PathBuf>,
}

/// Write every fragment of `output` under `dir`, named by fragment id.
///
/// Existing files whose content fingerprint equals the fragment's are not
/// rewritten, so unchanged outputs keep their modification time.
pub fn write_fragments(dir: &Path, output: &GenerationOutput) -> Result<WriteReport> {
    fs::create_dir_all(dir)?;
    let mut report = WriteReport::default();
    for fragment in &output.fragments {
        let path = dir.join(&fragment.id);
        if existing_fingerprint(&path)?.as_deref() == Some(fragment.fingerprint.as_str()) {
            tracing::trace!(
                target: "pipeline",
                stage = "driver.write",
                path = %path.display(),
                "fragment unchanged"
            );
            report.unchanged.push(path);
            continue;
        }
        fs::write(&path, &fragment.source)?;
        tracing::debug!(
            target: "pipeline",
            stage = "driver.write",
            path = %path.display(),
            bytes = fragment.source.len(),
            "wrote fragment"
        );
        report.written.push(path);
    }
    Ok(report)
}

fn existing_fingerprint(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(fingerprint(&text)))
}
