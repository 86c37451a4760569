//! Result files that replace their target only once fully written.

use std::fs::{self, File};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{HuffError, Result};

/// Fail when `output` already exists and is the same file as `input`.
pub fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }
    if fs::canonicalize(input)? == fs::canonicalize(output)? {
        return Err(HuffError::invalid_usage(format!(
            "output {} is the input file",
            output.display()
        )));
    }
    Ok(())
}

/// Run `write` against a temporary file next to `path`, then move it over
/// `path`.
///
/// When `write` fails the temporary file is dropped and whatever was at
/// `path` stays as it was.
pub fn write_replacing<F>(path: &Path, write: F) -> Result<u64>
where
    F: FnOnce(&mut File) -> Result<u64>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    let written = write(staged.as_file_mut())?;
    staged.persist(path).map_err(|e| HuffError::Io(e.error))?;
    log::debug!("wrote {} bits to {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_failed_write_keeps_existing_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("notes.txt");
        fs::write(&target, b"precious").unwrap();

        let err = write_replacing(&target, |out| {
            out.write_all(b"half a res")?;
            Err(HuffError::truncated("stream ended early"))
        })
        .unwrap_err();
        assert!(matches!(err, HuffError::Truncated { .. }));
        assert_eq!(fs::read(&target).unwrap(), b"precious");
        assert_eq!(entries(dir.path()), vec!["notes.txt"]);
    }

    #[test]
    fn test_failed_write_creates_nothing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("fresh.txt");
        assert!(write_replacing(&target, |_| Err(HuffError::invalid_usage("no"))).is_err());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_successful_write_replaces_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.hf");
        fs::write(&target, b"old contents that are longer").unwrap();

        let bits = write_replacing(&target, |out| {
            out.write_all(b"new")?;
            Ok(24)
        })
        .unwrap();
        assert_eq!(bits, 24);
        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(entries(dir.path()), vec!["out.hf"]);
    }

    #[test]
    fn test_same_file_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.txt");
        fs::write(&input, b"abc").unwrap();

        let err = ensure_distinct(&input, &dir.path().join(".").join("a.txt")).unwrap_err();
        assert!(matches!(err, HuffError::InvalidUsage { .. }));
        assert!(ensure_distinct(&input, &dir.path().join("a.txt.hf")).is_ok());

        fs::write(dir.path().join("b.txt"), b"abc").unwrap();
        assert!(ensure_distinct(&input, &dir.path().join("b.txt")).is_ok());
    }
}
