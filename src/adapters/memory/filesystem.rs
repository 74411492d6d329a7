//! In-memory filesystem keyed by full path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::ports::filesystem::FileSystem;

/// In-memory filesystem for exercising the generator without touching disk.
///
/// Directories are implicit: a path is a directory when at least one stored
/// file lives underneath it.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file, creating implicit parent directories.
    pub fn seed(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.lock().unwrap().insert(path.into(), contents.into());
    }

    /// Returns a snapshot of every stored path and its contents.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        !files.contains_key(path) && files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let files = self.files.lock().unwrap();
        let mut names: Vec<String> = files
            .keys()
            .filter_map(|k| {
                let rest = k.strip_prefix(path).ok()?;
                let first = rest.components().next()?;
                Some(first.as_os_str().to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// Shared handle so tests can keep inspecting the tree after boxing it into
/// a context.
impl FileSystem for std::sync::Arc<MemoryFileSystem> {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.as_ref().read_to_string(path)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.as_ref().write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.as_ref().exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.as_ref().is_dir(path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.as_ref().list_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_directories_and_listing() {
        let fs = MemoryFileSystem::new();
        fs.seed("/ws/apps/demo/firebase.json", "{}");
        fs.seed("/ws/apps/demo/rules/storage.rules", "rules");

        assert!(fs.exists(Path::new("/ws/apps/demo")));
        assert!(fs.is_dir(Path::new("/ws/apps/demo")));
        assert!(!fs.is_dir(Path::new("/ws/apps/demo/firebase.json")));
        assert_eq!(
            fs.list_dir(Path::new("/ws/apps/demo")).unwrap(),
            vec!["firebase.json", "rules"]
        );
    }

    #[test]
    fn read_missing_file_errors() {
        let fs = MemoryFileSystem::new();
        assert!(fs.read_to_string(Path::new("/missing")).is_err());
    }
}
