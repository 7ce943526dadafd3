//! File content equality decisions

use crate::hash::file_digest;
use replisync_types::{Error, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Outcome of comparing a source file against its destination candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Contents are byte-for-byte identical
    Same,
    /// Destination is missing or its contents differ
    Different,
}

/// Configuration for file comparison
#[derive(Debug, Clone, Copy)]
pub struct CompareConfig {
    /// Skip hashing when file sizes already differ
    ///
    /// Size is only a pre-filter: matching sizes still fall through to the
    /// digest, which is the ground truth for equality. Modification times are
    /// never consulted.
    pub size_prefilter: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            size_prefilter: true,
        }
    }
}

/// Decides whether a source file and a destination file hold identical content
///
/// Equality is always settled by a cryptographic digest of the full contents,
/// so clock skew and filesystem timestamp resolution cannot cause a copy to be
/// skipped wrongly.
#[derive(Debug, Clone, Default)]
pub struct FileComparator {
    config: CompareConfig,
}

impl FileComparator {
    /// Create a comparator with custom configuration
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    /// Compare a source file against a candidate destination file
    ///
    /// The caller guarantees that `source` names an existing regular file;
    /// `dest` may not exist, in which case the result is
    /// [`Comparison::Different`]. Read errors on either side propagate as
    /// typed errors and never silently decide equality.
    pub async fn compare<P: AsRef<Path>>(&self, source: P, dest: P) -> Result<Comparison> {
        let source = source.as_ref();
        let dest = dest.as_ref();

        let dest_meta = match fs::metadata(dest).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Destination missing: {}", dest.display());
                return Ok(Comparison::Different);
            }
            Err(e) => return Err(Error::from_io(dest, &e)),
        };

        if self.config.size_prefilter {
            let source_meta = fs::metadata(source)
                .await
                .map_err(|e| Error::from_io(source, &e))?;
            if source_meta.len() != dest_meta.len() {
                debug!(
                    "Size mismatch for '{}': {} vs {}",
                    source.display(),
                    source_meta.len(),
                    dest_meta.len()
                );
                return Ok(Comparison::Different);
            }
        }

        let source_digest = file_digest(source).await?;
        let dest_digest = file_digest(dest).await?;

        if source_digest == dest_digest {
            Ok(Comparison::Same)
        } else {
            Ok(Comparison::Different)
        }
    }
}
