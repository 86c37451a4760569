//! Batch benchmark: compress every file of a directory and report totals.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{HuffError, Result};
use crate::header::HeaderFormat;
use crate::huffman_codec::HuffmanCodec;

#[derive(Debug, Clone, PartialEq)]
pub struct FileMark {
    pub name: String,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub seconds: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkReport {
    pub output_dir: PathBuf,
    pub files: Vec<FileMark>,
}

impl MarkReport {
    pub fn total_original_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.original_bytes).sum()
    }

    pub fn total_compressed_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.compressed_bytes).sum()
    }

    pub fn total_seconds(&self) -> f64 {
        self.files.iter().map(|f| f.seconds).sum()
    }

    /// Share of the input removed by compression, in percent.
    pub fn percent_compression(&self) -> f64 {
        let original = self.total_original_bytes();
        if original == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.total_compressed_bytes() as f64 / original as f64)
    }
}

/// Always compresses with the tree header and `force`, so every file is
/// written and sizes are comparable across runs.
pub struct HuffMark {
    suffix: String,
}

impl HuffMark {
    /// Files already ending in `suffix` are skipped; outputs get `suffix` appended.
    pub fn new<S: Into<String>>(suffix: S) -> Self {
        HuffMark {
            suffix: suffix.into(),
        }
    }

    /// Compress each regular file directly inside `dir` into a new sibling
    /// directory named `"<dir> (compressed)"`.
    pub fn run(&self, dir: &Path) -> Result<MarkReport> {
        if !dir.is_dir() {
            return Err(HuffError::invalid_usage(format!("{} is not a directory", dir.display())));
        }
        let output_dir = unique_dir(&compressed_dir_name(dir)?);
        fs::create_dir(&output_dir)?;

        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        entries.sort();

        let mut report = MarkReport {
            output_dir: output_dir.clone(),
            files: Vec::new(),
        };
        for path in entries {
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            if name.ends_with(&self.suffix) {
                continue;
            }
            let mark = self.compress_one(&path, &name, &output_dir)?;
            log::info!(
                "{} from {} to {} in {:.3}",
                mark.name,
                mark.original_bytes,
                mark.compressed_bytes,
                mark.seconds
            );
            report.files.push(mark);
        }
        Ok(report)
    }

    fn compress_one(&self, path: &Path, name: &str, output_dir: &Path) -> Result<FileMark> {
        let start = Instant::now();
        let mut codec = HuffmanCodec::new();
        codec.preprocess(File::open(path)?, HeaderFormat::Tree)?;

        let out_path = output_dir.join(format!("{}{}", name, self.suffix));
        codec.encode(File::open(path)?, File::create(&out_path)?, true)?;
        let seconds = start.elapsed().as_secs_f64();

        Ok(FileMark {
            name: name.to_string(),
            original_bytes: fs::metadata(path)?.len(),
            compressed_bytes: fs::metadata(&out_path)?.len(),
            seconds,
        })
    }
}

/// Sibling of `dir` named `"<dir> (compressed)"`. Resolves `.` and `..`
/// first, so only the filesystem root has no name.
fn compressed_dir_name(dir: &Path) -> Result<PathBuf> {
    let dir = fs::canonicalize(dir)?;
    let name = dir
        .file_name()
        .ok_or_else(|| HuffError::invalid_usage(format!("{} has no directory name", dir.display())))?;
    let parent = dir.parent().unwrap_or_else(|| Path::new("/"));
    Ok(parent.join(format!("{} (compressed)", name.to_string_lossy())))
}

/// `base`, or `base (1)`, `base (2)`, ... whichever does not exist yet.
fn unique_dir(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }
    let mut n = 1;
    loop {
        let candidate = PathBuf::from(format!("{} ({})", base.display(), n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_unique_dir_appends_counter() {
        let root = tempdir().unwrap();
        let base = root.path().join("data (compressed)");
        assert_eq!(unique_dir(&base), base);

        fs::create_dir(&base).unwrap();
        let next = unique_dir(&base);
        assert_eq!(next, root.path().join("data (compressed) (1)"));

        fs::create_dir(&next).unwrap();
        assert_eq!(unique_dir(&base), root.path().join("data (compressed) (2)"));
    }

    #[test]
    fn test_dir_name_resolves_dot_components() {
        let root = tempdir().unwrap();
        let data = root.path().join("data");
        fs::create_dir_all(data.join("inner")).unwrap();
        let expected = fs::canonicalize(root.path()).unwrap().join("data (compressed)");

        assert_eq!(compressed_dir_name(&data).unwrap(), expected);
        assert_eq!(compressed_dir_name(&data.join("inner").join("..")).unwrap(), expected);
        assert_eq!(compressed_dir_name(&data.join(".")).unwrap(), expected);
    }

    #[test]
    fn test_dir_name_of_current_dir() {
        let cwd = fs::canonicalize(".").unwrap();
        let expected = match (cwd.parent(), cwd.file_name()) {
            (Some(parent), Some(name)) => parent.join(format!("{} (compressed)", name.to_string_lossy())),
            _ => return,
        };
        assert_eq!(compressed_dir_name(Path::new(".")).unwrap(), expected);
    }

    #[test]
    fn test_run_on_parent_relative_path() {
        let root = tempdir().unwrap();
        let data = root.path().join("corpus");
        fs::create_dir_all(data.join("sub")).unwrap();
        fs::write(data.join("a.txt"), b"aaaaaaaabbbbcc".repeat(20)).unwrap();

        let report = HuffMark::new(".hf").run(&data.join("sub").join("..")).unwrap();
        let expected = fs::canonicalize(root.path()).unwrap().join("corpus (compressed)");
        assert_eq!(report.output_dir, expected);
        assert!(expected.join("a.txt.hf").is_file());
    }

    #[test]
    fn test_percent_of_empty_report() {
        assert_eq!(MarkReport::default().percent_compression(), 0.0);
    }

    #[test]
    fn test_rejects_non_directory() {
        let root = tempdir().unwrap();
        let file = root.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(HuffMark::new(".hf").run(&file).is_err());
    }
}
