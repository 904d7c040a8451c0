use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{Item, Label, LabelsetError, Result};

/// Handle to the dataset document on disk.
///
/// The document is a single JSON array. Reads are unlocked snapshots;
/// `submit` holds the store's mutex across its load-mutate-persist cycle so
/// concurrent submissions cannot interleave their read and write halves and
/// lose updates. Single-process, single-writer deployment is assumed.
pub struct DatasetStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DatasetStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an example dataset of `n` unlabeled items unless the file
    /// already exists. Returns whether the file was created.
    pub fn seed(&self, n: usize) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        let items: Vec<Item> = (0..n)
            .map(|i| Item {
                text: format!("test {i}"),
                label: Label::Unlabeled,
            })
            .collect();
        self.persist(&items)?;
        Ok(true)
    }

    /// Unlocked full-document snapshot. A read concurrent with a submit may
    /// observe either the pre- or post-update state.
    pub fn load(&self) -> Result<Vec<Item>> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Record a label for the item at absolute index `start_id`.
    ///
    /// The whole read-modify-write cycle runs under the write lock. The
    /// rewritten document keeps the array's order and length. An index past
    /// the end is a precondition violation and leaves the file untouched.
    /// Returns the updated item so callers can audit-log its text.
    pub fn submit(&self, start_id: usize, label: Label) -> Result<Item> {
        let _guard = self.write_lock.lock().map_err(|_| LabelsetError::Poisoned)?;

        let mut items = self.load()?;
        let len = items.len();
        let item = items
            .get_mut(start_id)
            .ok_or(LabelsetError::IndexOutOfRange {
                index: start_id,
                len,
            })?;
        item.label = label;
        let updated = item.clone();

        self.persist(&items)?;
        Ok(updated)
    }

    // Write to a sibling temp file, then rename over the original, so a
    // failed write never leaves a truncated document behind.
    fn persist(&self, items: &[Item]) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
