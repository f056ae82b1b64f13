//! Rendering backends and output files.
//!
//! A [`Renderer`] turns a [`Diagram`] into image bytes. [`write_output`] then
//! places those bytes at their final path through a temporary file in the
//! same directory, so a failed document never leaves a truncated image behind
//! and never touches outputs written earlier.

pub mod graphviz;

use std::{
    fs::{self, Permissions},
    io,
    io::Write,
    path::Path,
};

use tempfile::Builder;
use thiserror::Error;

use crate::{config::OutputFormat, diagram::Diagram};

pub use graphviz::GraphvizRenderer;

/// Errors raised while rendering or writing a diagram.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A sink that draws diagrams.
pub trait Renderer {
    /// Format of the bytes returned by [`Renderer::render`].
    fn format(&self) -> OutputFormat;

    fn render(&self, diagram: &Diagram) -> Result<Vec<u8>, ExportError>;
}

/// Atomically writes `bytes` to `path`, replacing any existing file.
///
/// A replaced file keeps its permissions. A new file gets the permissions
/// [`fs::write`] would give it, rather than the owner-only mode of temporary
/// files.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the temporary file cannot be created,
/// written or moved into place. `path` is left untouched in that case.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let existing = fs::metadata(path).ok().filter(|meta| meta.is_file());

    let mut builder = Builder::new();
    if let (None, Some(permissions)) = (&existing, new_file_permissions()) {
        builder.permissions(permissions);
    }

    let mut file = builder.tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    if let Some(meta) = existing {
        file.as_file().set_permissions(meta.permissions())?;
    }
    file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

/// Creation mode of a plain file; the process umask still applies.
#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_write_output_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.png");

        write_output(&path, b"first").unwrap();
        write_output(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_output_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("doc.png");

        assert!(matches!(
            write_output(&path, b"data"),
            Err(ExportError::Io(_))
        ));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_uses_regular_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.svg");
        let written = dir.path().join("doc.svg");
        fs::write(&plain, b"data").unwrap();

        write_output(&written, b"data").unwrap();

        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&written), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.svg");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        write_output(&path, b"new").unwrap();

        let meta = fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o640);
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }
}
