//! Directory tree scanning

use replisync_types::{EntryKind, Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Snapshot of one directory tree at the start of a pass
///
/// Entries are keyed by path relative to the scanned root. The ordered map
/// means iteration visits parents before their children, which is the
/// ordering directory creation needs.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    /// Every file and directory found under the root
    pub entries: BTreeMap<PathBuf, EntryKind>,
    /// Per-entry scan failures (unreadable subdirectory, unsupported entry)
    pub errors: Vec<Error>,
}

impl TreeSnapshot {
    /// Create an empty snapshot, as used for a destination that does not exist yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Kind recorded for a relative path, if present
    pub fn kind_of(&self, path: &Path) -> Option<EntryKind> {
        self.entries.get(path).copied()
    }

    /// Number of entries in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan a directory tree into a [`TreeSnapshot`]
///
/// A failure to read the root itself is fatal and returned as an error; a
/// failure deeper in the tree is recorded in the snapshot and scanning
/// continues with the remaining entries. Symbolic links and special files are
/// recorded as [`Error::UnsupportedEntry`], never silently skipped.
pub async fn scan_tree<P: AsRef<Path>>(root: P) -> Result<TreeSnapshot> {
    let root = root.as_ref();
    let mut snapshot = TreeSnapshot::default();

    scan_dir(root, root, &mut snapshot, true).await?;

    debug!(
        "Scanned {} entries under '{}' ({} scan errors)",
        snapshot.entries.len(),
        root.display(),
        snapshot.errors.len()
    );
    Ok(snapshot)
}

fn scan_dir<'a>(
    base: &'a Path,
    current: &'a Path,
    snapshot: &'a mut TreeSnapshot,
    is_root: bool,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = match fs::read_dir(current).await {
            Ok(entries) => entries,
            Err(e) => {
                let error = Error::from_io(current, &e);
                if is_root {
                    return Err(error);
                }
                warn!("Skipping unreadable directory: {}", error);
                snapshot.errors.push(error);
                return Ok(());
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    snapshot.errors.push(Error::from_io(current, &e));
                    break;
                }
            };

            let entry_path = entry.path();
            let relative = entry_path
                .strip_prefix(base)
                .unwrap_or(&entry_path)
                .to_path_buf();

            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    snapshot.errors.push(Error::from_io(&entry_path, &e));
                    continue;
                }
            };

            if file_type.is_symlink() || !(file_type.is_dir() || file_type.is_file()) {
                warn!("Unsupported entry type: {}", entry_path.display());
                snapshot.errors.push(Error::UnsupportedEntry {
                    path: entry_path.clone(),
                });
                continue;
            }

            if file_type.is_dir() {
                snapshot.entries.insert(relative, EntryKind::Directory);
                scan_dir(base, &entry_path, snapshot, false).await?;
            } else {
                snapshot.entries.insert(relative, EntryKind::File);
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    #[tokio::test]
    async fn test_scan_nested_tree() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("a/b")).await.unwrap();
        fs::write(temp_dir.path().join("a/b/file.txt"), b"x")
            .await
            .unwrap();
        fs::write(temp_dir.path().join("top.txt"), b"y").await.unwrap();

        let snapshot = scan_tree(temp_dir.path()).await.unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.kind_of(Path::new("a")), Some(EntryKind::Directory));
        assert_eq!(
            snapshot.kind_of(Path::new("a/b")),
            Some(EntryKind::Directory)
        );
        assert_eq!(
            snapshot.kind_of(Path::new("a/b/file.txt")),
            Some(EntryKind::File)
        );
        assert_eq!(snapshot.kind_of(Path::new("top.txt")), Some(EntryKind::File));
        assert!(snapshot.errors.is_empty());
    }

    #[tokio::test]
    async fn test_scan_orders_parents_before_children() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("z/inner")).await.unwrap();
        fs::create_dir_all(temp_dir.path().join("a")).await.unwrap();

        let snapshot = scan_tree(temp_dir.path()).await.unwrap();
        let paths: Vec<_> = snapshot.entries.keys().cloned().collect();

        let pos = |p: &str| paths.iter().position(|x| x == Path::new(p)).unwrap();
        assert!(pos("a") < pos("z"));
        assert!(pos("z") < pos("z/inner"));
    }

    #[tokio::test]
    async fn test_scan_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("no-such-dir");

        let err = scan_tree(&missing).await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_records_symlink_as_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("real.txt"), b"x").await.unwrap();
        tokio::fs::symlink(
            temp_dir.path().join("real.txt"),
            temp_dir.path().join("link.txt"),
        )
        .await
        .unwrap();

        let snapshot = scan_tree(temp_dir.path()).await.unwrap();

        assert_eq!(snapshot.kind_of(Path::new("real.txt")), Some(EntryKind::File));
        assert_eq!(snapshot.kind_of(Path::new("link.txt")), None);
        assert_eq!(snapshot.errors.len(), 1);
        assert!(matches!(
            snapshot.errors[0],
            Error::UnsupportedEntry { .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_continues_past_unreadable_subdir() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).await.unwrap();
        fs::write(temp_dir.path().join("ok.txt"), b"x").await.unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        if std::fs::read_dir(&locked).is_ok() {
            // running with euid 0, permissions are not enforced
            return;
        }

        let snapshot = scan_tree(temp_dir.path()).await.unwrap();

        // restore so TempDir can clean up
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(snapshot.kind_of(Path::new("ok.txt")), Some(EntryKind::File));
        assert_eq!(
            snapshot.kind_of(Path::new("locked")),
            Some(EntryKind::Directory)
        );
        assert_eq!(snapshot.errors.len(), 1);
    }
}
