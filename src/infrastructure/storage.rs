use std::fs;
use std::path::{Path, PathBuf};

/// Create `path` (and parents) when missing and return it
pub fn ensure_dir(path: &Path) -> std::io::Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Write `bytes` to `dir/filename`, creating `dir` first, and return the
/// absolute path of the written file
pub fn write_file(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let dir = ensure_dir(dir)?;
    let path = dir.join(filename);
    fs::write(&path, bytes)?;
    fs::canonicalize(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_nested_dir() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("files").join("exports");

        let path = write_file(&dir, "out.csv", b"a,b\n").unwrap();

        assert!(path.is_absolute());
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");
    }
}
