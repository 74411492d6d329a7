//! Filtered file-tree import into the workspace.

use std::path::{Path, PathBuf};

use crate::ports::filesystem::FileSystem;

/// What a tree import did: files written and top-level entries skipped.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of files written at the destination.
    pub files_copied: usize,
    /// Top-level entry names skipped by the exclusion set.
    pub skipped: Vec<String>,
}

/// Copies `source` into `dest`, skipping top-level entries named in
/// `exclude`.
///
/// The walk uses an explicit worklist so arbitrarily deep trees cannot
/// overflow the stack. Exclusions apply to the top level only; a nested
/// directory with an excluded name is still copied. Files are read in full
/// and written verbatim, overwriting whatever is at the destination, which
/// makes a re-run with identical source content a no-op. A missing source
/// is zero work, not an error.
///
/// # Errors
///
/// Returns an error if a directory listing, file read, or file write fails.
pub fn copy_tree(
    fs: &dyn FileSystem,
    source: &Path,
    dest: &Path,
    exclude: &[&str],
) -> Result<ImportReport, String> {
    let mut report = ImportReport::default();
    if !fs.exists(source) {
        return Ok(report);
    }

    // (source dir, destination dir, is the top level)
    let mut work: Vec<(PathBuf, PathBuf, bool)> =
        vec![(source.to_path_buf(), dest.to_path_buf(), true)];

    while let Some((src_dir, dest_dir, top_level)) = work.pop() {
        let entries = fs
            .list_dir(&src_dir)
            .map_err(|e| format!("Failed to list {}: {e}", src_dir.display()))?;
        for name in entries {
            if top_level && exclude.contains(&name.as_str()) {
                report.skipped.push(name);
                continue;
            }
            let src_path = src_dir.join(&name);
            let dest_path = dest_dir.join(&name);
            if fs.is_dir(&src_path) {
                work.push((src_path, dest_path, false));
            } else {
                let contents = fs
                    .read_to_string(&src_path)
                    .map_err(|e| format!("Failed to read {}: {e}", src_path.display()))?;
                fs.write(&dest_path, &contents)
                    .map_err(|e| format!("Failed to write {}: {e}", dest_path.display()))?;
                report.files_copied += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    fn seeded_fs() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.seed("/init/firebase.json", "{}");
        fs.seed("/init/firestore.rules", "rules");
        fs.seed("/init/functions/package.json", "{}");
        fs.seed("/init/functions/src/index.ts", "code");
        fs.seed("/init/public/nested/functions/inner.txt", "kept");
        fs
    }

    #[test]
    fn excludes_top_level_entries_only() {
        let fs = seeded_fs();
        let report =
            copy_tree(&fs, Path::new("/init"), Path::new("/ws/app"), &["functions"]).unwrap();

        assert_eq!(report.skipped, vec!["functions"]);
        assert!(!fs.exists(Path::new("/ws/app/functions")));
        // A nested directory with the excluded name is still copied.
        assert_eq!(
            fs.read_to_string(Path::new("/ws/app/public/nested/functions/inner.txt")).unwrap(),
            "kept"
        );
        assert_eq!(report.files_copied, 3);
    }

    #[test]
    fn copies_everything_without_exclusions() {
        let fs = seeded_fs();
        let report = copy_tree(&fs, Path::new("/init"), Path::new("/ws/app"), &[]).unwrap();
        assert_eq!(report.files_copied, 5);
        assert!(report.skipped.is_empty());
        assert_eq!(fs.read_to_string(Path::new("/ws/app/functions/src/index.ts")).unwrap(), "code");
    }

    #[test]
    fn rerun_is_idempotent() {
        let fs = seeded_fs();
        copy_tree(&fs, Path::new("/init"), Path::new("/ws/app"), &["functions"]).unwrap();
        let first = fs.snapshot();
        copy_tree(&fs, Path::new("/init"), Path::new("/ws/app"), &["functions"]).unwrap();
        assert_eq!(fs.snapshot(), first);
    }

    #[test]
    fn missing_source_is_zero_work() {
        let fs = MemoryFileSystem::new();
        let report = copy_tree(&fs, Path::new("/absent"), Path::new("/ws/app"), &[]).unwrap();
        assert_eq!(report, ImportReport::default());
    }

    #[test]
    fn overwrites_stale_destination_files() {
        let fs = seeded_fs();
        fs.seed("/ws/app/firebase.json", "stale");
        copy_tree(&fs, Path::new("/init"), Path::new("/ws/app"), &[]).unwrap();
        assert_eq!(fs.read_to_string(Path::new("/ws/app/firebase.json")).unwrap(), "{}");
    }
}
