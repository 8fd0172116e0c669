//! Flat-file JSON persistence.
//!
//! Every collection lives in one pretty-printed JSON file under the data
//! directory and is rewritten wholesale on save; there is no append path.
//! No locking and no atomic rename either: a crash mid-write can lose the
//! file's previous content. That risk is accepted for the single-process,
//! low-concurrency deployments this store targets.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::StoreError;

pub const USERS_FILE: &str = "users.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const ORDERS_FILE: &str = "orders.json";
pub const TRACKER_FILE: &str = "id_tracker.json";

/// Monotonic counter backing product id assignment. Lives in its own file so
/// the counter can be bumped and persisted before the catalog is touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTracker {
    pub last_product_id: u64,
}

/// Handle on a data directory. Cheap to clone; holds no file state between
/// calls, so back-to-back operations always see the latest persisted bytes.
#[derive(Clone, Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Seeds the data directory: empty collections plus a zeroed id tracker,
    /// skipping any file that already exists. Explicit bootstrap step; reads
    /// never create files behind the caller's back.
    pub fn init(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io {
            name: self.root.display().to_string(),
            source: e,
        })?;
        for name in [USERS_FILE, PRODUCTS_FILE, ORDERS_FILE] {
            if !self.path(name).exists() {
                self.save_collection::<serde_json::Value>(name, &[])?;
            }
        }
        if !self.path(TRACKER_FILE).exists() {
            self.save_object(TRACKER_FILE, &IdTracker::default())?;
        }
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Loads a record collection. A missing file reads as an empty
    /// collection; this equivalence holds for collections only.
    pub fn load_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let bytes = match fs::read(self.path(name)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    name: name.to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            name: name.to_string(),
            source: e,
        })
    }

    /// Replaces the named collection's entire content.
    pub fn save_collection<T: Serialize>(&self, name: &str, records: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(|e| StoreError::Encode {
            name: name.to_string(),
            source: e,
        })?;
        self.write(name, &bytes)
    }

    /// Loads a scalar resource such as the id tracker. Unlike collections,
    /// absence is a hard [`StoreError::Missing`], never a default value.
    pub fn load_object<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let bytes = match fs::read(self.path(name)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    name: name.to_string(),
                })
            }
            Err(e) => {
                return Err(StoreError::Io {
                    name: name.to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            name: name.to_string(),
            source: e,
        })
    }

    pub fn save_object<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Encode {
            name: name.to_string(),
            source: e,
        })?;
        self.write(name, &bytes)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        debug!(resource = name, len = bytes.len(), "overwriting resource");
        fs::write(self.path(name), bytes).map_err(|e| StoreError::Io {
            name: name.to_string(),
            source: e,
        })
    }
}
