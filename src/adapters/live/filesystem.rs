//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_and_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LiveFileSystem;
        let file = dir.path().join("nested").join("a.txt");

        fs.write(&file, "hello").unwrap();
        assert!(fs.exists(&file));
        assert!(fs.is_dir(&dir.path().join("nested")));
        assert_eq!(fs.read_to_string(&file).unwrap(), "hello");
        assert_eq!(fs.list_dir(&dir.path().join("nested")).unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn missing_path_is_not_dir() {
        let fs = LiveFileSystem;
        assert!(!fs.exists(Path::new("/nonexistent/firemono-test")));
        assert!(!fs.is_dir(Path::new("/nonexistent/firemono-test")));
    }
}
