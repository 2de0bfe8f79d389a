//! Directory listing with recursive size computation.
//!
//! Only the immediate children of the scanned directory become entries.
//! Directory children are sized by walking their whole subtree; a subtree
//! that cannot be fully walked is reported with size zero and a warning
//! instead of failing the listing.

use crate::PackerError;
use crate::Result;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// One filesystem object offered for selection.
///
/// The size is computed once during the scan and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Base name, lossily converted for display.
    pub name: String,

    /// Scanned directory joined with the base name.
    pub path: PathBuf,

    /// Direct size for files, recursive sum of non-directory descendants
    /// for directories.
    pub size: u64,

    /// Whether the entry is a directory (symlinks are never directories).
    pub is_directory: bool,
}

impl Entry {
    /// Returns `true` for dot-prefixed names.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// A child whose size could not be computed completely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryWarning {
    /// The child entry that was reported with size zero.
    pub path: PathBuf,

    /// Description of the traversal failure.
    pub message: String,
}

impl fmt::Display for InventoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (counted as 0 bytes)", self.path.display(), self.message)
    }
}

/// Receives entries as they are sized.
///
/// Sizing large trees can take a while; the CLI uses this to drive a
/// spinner.
pub trait ScanProgress {
    /// Called after each entry has been sized.
    fn on_entry(&mut self, entry: &Entry);

    /// Called once after the last entry.
    fn on_complete(&mut self) {}
}

/// A `ScanProgress` that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScanProgress;

impl ScanProgress for NoScanProgress {
    fn on_entry(&mut self, _entry: &Entry) {}
}

/// The sized children of one directory.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    /// Entries in listing order (sorted by file name).
    pub entries: Vec<Entry>,

    /// Children whose subtree walk failed.
    pub warnings: Vec<InventoryWarning>,
}

impl Inventory {
    /// Lists and sizes the immediate children of `dir`.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryUnreadable` if `dir` does not exist, is not a
    /// directory, or cannot be listed. Failures below the top level never
    /// produce an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use packer_core::Inventory;
    ///
    /// let inventory = Inventory::scan("/data")?;
    /// for entry in &inventory.entries {
    ///     println!("{} {}", entry.name, entry.size);
    /// }
    /// # Ok::<(), packer_core::PackerError>(())
    /// ```
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self> {
        Self::scan_with_progress(dir, &mut NoScanProgress)
    }

    /// Same as [`Inventory::scan`], reporting each sized entry.
    ///
    /// # Errors
    ///
    /// See [`Inventory::scan`].
    pub fn scan_with_progress(
        dir: impl AsRef<Path>,
        progress: &mut dyn ScanProgress,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let unreadable = |source| PackerError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        };

        let mut children = Vec::new();
        let mut inventory = Self::default();

        for child in fs::read_dir(dir).map_err(unreadable)? {
            match child {
                Ok(child) => children.push(child),
                Err(e) => inventory.warn(dir, format!("cannot read directory entry: {e}")),
            }
        }
        children.sort_by_key(fs::DirEntry::file_name);

        for child in children {
            let path = child.path();
            let name = child.file_name().to_string_lossy().into_owned();
            let is_directory = child.file_type().is_ok_and(|t| t.is_dir());

            let size = if is_directory {
                subtree_size(&path)
            } else {
                fs::symlink_metadata(&path).map(|m| m.len())
            };
            let size = size.unwrap_or_else(|message| {
                inventory.warn(&path, message.to_string());
                0
            });

            let entry = Entry {
                name,
                path,
                size,
                is_directory,
            };
            log::debug!(
                "sized {} ({} bytes, directory: {})",
                entry.path.display(),
                entry.size,
                entry.is_directory
            );
            progress.on_entry(&entry);
            inventory.entries.push(entry);
        }

        progress.on_complete();
        Ok(inventory)
    }

    /// Returns `true` if the directory had no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn warn(&mut self, path: &Path, message: String) {
        // Surfaced to the operator through `warnings`; the log only traces it.
        log::debug!("{}: {message}; reporting size 0", path.display());
        self.warnings.push(InventoryWarning {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Sums the sizes of all non-directory descendants of `root`.
///
/// Symlinks are not followed and count with their own size. The first
/// traversal error aborts the walk.
fn subtree_size(root: &Path) -> std::io::Result<u64> {
    let mut total: u64 = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::other)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let metadata = entry.metadata().map_err(std::io::Error::other)?;
        total = total.saturating_add(metadata.len());
    }
    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, len: usize) {
        fs::write(path, vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_scan_files_and_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_bytes(&root.join("a.txt"), 100);
        fs::create_dir(root.join("sub")).unwrap();
        write_bytes(&root.join("sub/b.txt"), 4000);

        let inventory = Inventory::scan(root).unwrap();

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.entries[0].name, "a.txt");
        assert_eq!(inventory.entries[0].size, 100);
        assert!(!inventory.entries[0].is_directory);
        assert_eq!(inventory.entries[1].name, "sub");
        assert_eq!(inventory.entries[1].size, 4000);
        assert!(inventory.entries[1].is_directory);
        assert_eq!(inventory.entries[1].path, root.join("sub"));
        assert!(inventory.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories_sum_recursively() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("d/e/f")).unwrap();
        write_bytes(&root.join("d/one"), 10);
        write_bytes(&root.join("d/e/two"), 20);
        write_bytes(&root.join("d/e/f/three"), 30);

        let inventory = Inventory::scan(root).unwrap();
        assert_eq!(inventory.entries[0].size, 60);
    }

    #[test]
    fn test_scan_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for name in ["zeta", "alpha", "mid"] {
            write_bytes(&root.join(name), 1);
        }

        let inventory = Inventory::scan(root).unwrap();
        let names: Vec<_> = inventory.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp = TempDir::new().unwrap();
        let inventory = Inventory::scan(temp.path()).unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = Inventory::scan(temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, PackerError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_scan_file_is_unreadable_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        write_bytes(&file, 5);
        let err = Inventory::scan(&file).unwrap_err();
        assert!(matches!(err, PackerError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_hidden_entries_are_listed() {
        let temp = TempDir::new().unwrap();
        write_bytes(&temp.path().join(".env"), 3);
        let inventory = Inventory::scan(temp.path()).unwrap();
        assert!(inventory.entries[0].is_hidden());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("big")).unwrap();
        write_bytes(&root.join("big/data"), 5000);
        fs::create_dir(root.join("dir")).unwrap();
        std::os::unix::fs::symlink(root.join("big"), root.join("dir/link")).unwrap();
        std::os::unix::fs::symlink(root.join("big"), root.join("top-link")).unwrap();

        let inventory = Inventory::scan(root).unwrap();
        let dir = inventory.entries.iter().find(|e| e.name == "dir").unwrap();
        let link = inventory
            .entries
            .iter()
            .find(|e| e.name == "top-link")
            .unwrap();

        assert!(dir.size < 5000, "link target must not be counted");
        assert!(!link.is_directory);
        assert!(link.size < 5000);
    }

    /// An unreadable subdirectory is indistinguishable from an empty one in
    /// the size column; the warning is the only signal.
    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_reports_zero_with_warning() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("locked/inner")).unwrap();
        write_bytes(&root.join("locked/inner/secret"), 700);
        write_bytes(&root.join("visible"), 7);
        fs::set_permissions(root.join("locked/inner"), fs::Permissions::from_mode(0o000))
            .unwrap();

        // Root ignores permission bits, in which case nothing fails.
        let restricted = fs::read_dir(root.join("locked/inner")).is_err();
        let inventory = Inventory::scan(root).unwrap();
        fs::set_permissions(root.join("locked/inner"), fs::Permissions::from_mode(0o755))
            .unwrap();

        let locked = &inventory.entries[0];
        assert_eq!(locked.name, "locked");
        assert_eq!(inventory.entries[1].size, 7);
        if restricted {
            assert_eq!(locked.size, 0);
            assert_eq!(inventory.warnings.len(), 1);
            assert_eq!(inventory.warnings[0].path, root.join("locked"));
        } else {
            assert_eq!(locked.size, 700);
        }
    }

    #[test]
    fn test_progress_sees_every_entry() {
        struct Counter(usize, bool);
        impl ScanProgress for Counter {
            fn on_entry(&mut self, _entry: &Entry) {
                self.0 += 1;
            }
            fn on_complete(&mut self) {
                self.1 = true;
            }
        }

        let temp = TempDir::new().unwrap();
        write_bytes(&temp.path().join("a"), 1);
        write_bytes(&temp.path().join("b"), 1);

        let mut counter = Counter(0, false);
        Inventory::scan_with_progress(temp.path(), &mut counter).unwrap();
        assert_eq!(counter.0, 2);
        assert!(counter.1);
    }
}
