use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub fn absolute_path(path: PathBuf) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Creates `path` (including its parents) if it does not exist yet and returns its canonical
/// form.
pub fn ensure_directory(path: &Path) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(path)?;
    Ok(std::fs::canonicalize(path)?)
}

pub fn modification_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Returns true if the file name ends with the given temporary-file suffix.
/// An empty suffix never matches.
pub fn has_temporary_suffix(name: &OsStr, suffix: &str) -> bool {
    !suffix.is_empty() && name.as_encoded_bytes().ends_with(suffix.as_bytes())
}

/// Writes `content` into `path` so that readers observe either the old state or the complete
/// new content. The data is first written into a temporary file in the same directory, which is
/// then renamed over `path`.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::Builder::new()
        .prefix(".mm-")
        .tempfile_in(directory)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn temporary_suffix() {
        assert!(has_temporary_suffix(OsStr::new("draft.txt.tmp"), ".tmp"));
        assert!(has_temporary_suffix(OsStr::new(".tmp"), ".tmp"));
        assert!(!has_temporary_suffix(OsStr::new("case1.txt"), ".tmp"));
        assert!(!has_temporary_suffix(OsStr::new("tmp.txt"), ".tmp"));
        assert!(!has_temporary_suffix(OsStr::new("file.tmp"), ""));
    }

    #[test]
    fn ensure_directory_creates_nested() {
        let dir = TempDir::with_prefix("mm").unwrap();
        let nested = dir.path().join("a").join("b");
        let created = ensure_directory(&nested).unwrap();
        assert!(created.is_dir());
        assert!(created.is_absolute());

        // Second call on an existing directory succeeds
        assert_eq!(ensure_directory(&nested).unwrap(), created);
    }

    #[test]
    fn write_atomic_replaces_content() {
        let dir = TempDir::with_prefix("mm").unwrap();
        let path = dir.path().join("out.txt");
        write_file_atomic(&path, b"first").unwrap();
        write_file_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");

        // No leftovers from the temporary files
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn write_atomic_missing_directory() {
        let dir = TempDir::with_prefix("mm").unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(write_file_atomic(&path, b"data").is_err());
    }

    #[test]
    fn absolute_path_keeps_absolute() {
        let path = PathBuf::from("/a/b");
        assert_eq!(absolute_path(path.clone()).unwrap(), path);
        assert!(absolute_path(PathBuf::from("x")).unwrap().is_absolute());
    }
}
