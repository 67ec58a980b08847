// Output directory selection and header writes

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Cannot create directory {}: {}", .0.display(), .1)]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("Directory {} is not writable: {}", .0.display(), .1)]
    Probe(PathBuf, #[source] std::io::Error),

    #[error("Cannot write {}: {}", .0.display(), .1)]
    Write(PathBuf, #[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Scratch file written and removed to test a directory
pub const WRITE_PROBE_NAME: &str = ".write_test";

/// Pick the directory a header for `input` should be written to.
///
/// An explicit `out_dir` is created and used as-is. Otherwise the input's
/// own directory is used if it passes a write probe, else `fallback`.
pub fn resolve_output_dir(
    input: &Path,
    out_dir: Option<&Path>,
    fallback: &Path,
) -> Result<PathBuf> {
    if let Some(dir) = out_dir {
        create_dir(dir)?;
        return Ok(dir.to_path_buf());
    }

    let sibling = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    match create_dir(&sibling).and_then(|_| probe_writable(&sibling)) {
        Ok(()) => Ok(sibling),
        Err(e) => {
            tracing::warn!("{}; falling back to {}", e, fallback.display());
            create_dir(fallback)?;
            Ok(fallback.to_path_buf())
        }
    }
}

/// Write then delete a scratch file in `dir`
pub fn probe_writable(dir: &Path) -> Result<()> {
    let probe = dir.join(WRITE_PROBE_NAME);
    fs::write(&probe, b"x")
        .and_then(|_| fs::remove_file(&probe))
        .map_err(|e| OutputError::Probe(dir.to_path_buf(), e))
}

/// Write header text verbatim
pub fn write_header(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| OutputError::Write(path.to_path_buf(), e))
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| OutputError::CreateDir(dir.to_path_buf(), e))
}
