//! Working-directory path resolution and supporting file operations
//!
//! Everything here is plain filesystem I/O; read and write failures come
//! back as structured fields on the outcome, never as a panic.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::errors::Result;

/// Resolve a caller-supplied path against `base`.
///
/// Empty input returns `base` unchanged. Absolute input passes through
/// lexically normalized, with its own root kept. Relative input is joined
/// under `base` and normalized.
///
/// This is a convenience resolver, not a confinement boundary: `..`
/// segments and absolute inputs can still name paths outside `base`.
pub fn resolve_in_root(base: &Path, requested: &str) -> PathBuf {
    if requested.is_empty() {
        return base.to_path_buf();
    }

    let requested = Path::new(requested);
    if requested.is_absolute() {
        normalize(requested)
    } else {
        normalize(&base.join(requested))
    }
}

/// Lexically collapse `.` and `..` components without touching the
/// filesystem. `..` above the root is dropped, as in `abspath`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.ends_with("..") || (!out.pop() && !out.has_root()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// One entry from a directory listing
#[derive(Debug, Clone, Serialize)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    /// File size in bytes; `None` when the metadata could not be read,
    /// `Some(0)` for directories
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirListing {
    pub base: String,
    pub requested: String,
    pub recursive: bool,
    pub count: usize,
    pub entries: Vec<DirEntryInfo>,
}

/// List entries under `base`, or under `path` resolved against it
pub fn list_dir(base: &Path, path: Option<&str>, recursive: bool) -> Result<DirListing> {
    let full = match path {
        Some(requested) => resolve_in_root(base, requested),
        None => base.to_path_buf(),
    };

    let mut entries = Vec::new();
    collect_entries(&full, recursive, &mut entries)?;

    Ok(DirListing {
        base: base.display().to_string(),
        requested: path.unwrap_or(".").to_string(),
        recursive,
        count: entries.len(),
        entries,
    })
}

fn collect_entries(dir: &Path, recursive: bool, out: &mut Vec<DirEntryInfo>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_dir = path.is_dir();
        let size = if is_dir {
            Some(0)
        } else {
            fs::metadata(&path).map(|meta| meta.len()).ok()
        };

        out.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: path.display().to_string(),
            is_dir,
            size,
        });

        if recursive && is_dir {
            collect_entries(&path, recursive, out)?;
        }
    }
    Ok(())
}

/// Outcome of a text read; failures land in `error`, never a panic
#[derive(Debug, Clone, Serialize)]
pub struct ReadOutcome {
    pub path: String,
    pub exists: bool,
    pub is_file: bool,
    pub truncated: bool,
    /// Character count of the full file, even when truncated
    pub length: usize,
    pub content: String,
    pub max_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read a text file from a `base`-scoped path, truncating to `max_chars`
/// characters. Invalid byte sequences are replaced, never an error.
pub fn read_text(base: &Path, path: &str, max_chars: usize) -> ReadOutcome {
    let full = resolve_in_root(base, path);
    let mut outcome = ReadOutcome {
        path: full.display().to_string(),
        exists: full.exists(),
        is_file: full.is_file(),
        truncated: false,
        length: 0,
        content: String::new(),
        max_chars,
        error: None,
    };

    if !outcome.is_file {
        return outcome;
    }

    let data = match fs::read(&full) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };

    outcome.length = data.chars().count();
    if outcome.length > max_chars {
        outcome.content = data.chars().take(max_chars).collect();
        outcome.truncated = true;
    } else {
        outcome.content = data;
    }
    outcome
}

/// Write mode for [`write_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Overwrite,
    Append,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteOutcome {
    pub path: String,
    pub mode: WriteMode,
    pub success: bool,
    pub bytes_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Write a text file under a `base`-scoped path, creating parent
/// directories as needed
pub fn write_text(base: &Path, path: &str, content: &str, mode: WriteMode) -> WriteOutcome {
    let full = resolve_in_root(base, path);
    let mut outcome = WriteOutcome {
        path: full.display().to_string(),
        mode,
        success: false,
        bytes_written: 0,
        error: None,
    };

    if let Some(parent) = full.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    }

    let written = match mode {
        WriteMode::Overwrite => fs::write(&full, content),
        WriteMode::Append => fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .and_then(|mut file| file.write_all(content.as_bytes())),
    };

    match written {
        Ok(()) => {
            outcome.success = true;
            outcome.bytes_written = content.len();
        }
        Err(e) => outcome.error = Some(e.to_string()),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_empty_returns_base() {
        let base = Path::new("/work");
        assert_eq!(resolve_in_root(base, ""), PathBuf::from("/work"));
    }

    #[test]
    fn resolve_relative_joins_under_base() {
        let base = Path::new("/work");
        assert_eq!(resolve_in_root(base, "a/b.txt"), PathBuf::from("/work/a/b.txt"));
    }

    #[test]
    fn resolve_absolute_passes_through() {
        let base = Path::new("/work");
        assert_eq!(resolve_in_root(base, "/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn resolve_is_idempotent() {
        let base = Path::new("/work");
        let once = resolve_in_root(base, "x/../y/./z");
        let twice = resolve_in_root(base, once.to_str().unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn resolve_parent_escape_is_lexical() {
        // Documented behavior: `..` is collapsed, not rejected, so the
        // result may leave the base directory.
        let base = Path::new("/work/sub");
        assert_eq!(
            resolve_in_root(base, "../other/file"),
            PathBuf::from("/work/other/file")
        );
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("../../a")), PathBuf::from("../../a"));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        let written = write_text(base, "notes/hello.txt", "hello files", WriteMode::Overwrite);
        assert!(written.success, "{:?}", written.error);
        assert_eq!(written.bytes_written, 11);

        let read = read_text(base, "notes/hello.txt", 1024);
        assert!(read.is_file);
        assert!(!read.truncated);
        assert_eq!(read.content, "hello files");
        assert_eq!(read.length, 11);
    }

    #[test]
    fn append_mode_extends_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        assert!(write_text(base, "log.txt", "one\n", WriteMode::Overwrite).success);
        assert!(write_text(base, "log.txt", "two\n", WriteMode::Append).success);

        let read = read_text(base, "log.txt", 1024);
        assert_eq!(read.content, "one\ntwo\n");
    }

    #[test]
    fn read_truncates_to_max_chars_and_reports_full_length() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        assert!(write_text(base, "big.txt", &"x".repeat(100), WriteMode::Overwrite).success);

        let read = read_text(base, "big.txt", 10);
        assert!(read.truncated);
        assert_eq!(read.content.len(), 10);
        assert_eq!(read.length, 100);
    }

    #[test]
    fn read_missing_file_reports_absence_not_error() {
        let dir = tempfile::tempdir().unwrap();

        let read = read_text(dir.path(), "nope.txt", 1024);
        assert!(!read.exists);
        assert!(!read.is_file);
        assert!(read.error.is_none());
        assert!(read.content.is_empty());
    }

    #[test]
    fn list_dir_sees_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        assert!(write_text(base, "a.txt", "aa", WriteMode::Overwrite).success);
        assert!(write_text(base, "sub/b.txt", "bbb", WriteMode::Overwrite).success);

        let flat = list_dir(base, None, false).unwrap();
        assert_eq!(flat.count, 2);
        assert!(flat.entries.iter().any(|e| e.name == "a.txt" && !e.is_dir));
        assert!(flat.entries.iter().any(|e| e.name == "sub" && e.is_dir));

        let deep = list_dir(base, None, true).unwrap();
        assert_eq!(deep.count, 3);
        assert!(deep.entries.iter().any(|e| e.name == "b.txt"));
    }

    #[test]
    fn list_dir_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_dir(dir.path(), Some("absent"), false).is_err());
    }
}
