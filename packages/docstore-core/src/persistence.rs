//! Snapshot persistence: whole-database saves to a checksummed JSON
//! file and loads back into an open connection.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::collection::CollectionData;
use crate::connection::Connection;
use crate::document::Document;
use crate::error::{DbError, Result};

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk layout of one snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    database: String,
    /// CRC32 over the serialized `collections` map.
    checksum: u32,
    collections: BTreeMap<String, CollectionSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionSnapshot {
    next_id: u64,
    documents: Vec<Document>,
}

impl Connection {
    /// Writes every collection to `path` as a single JSON snapshot.
    ///
    /// The file is written to a temporary sibling first and renamed
    /// into place, so a crash mid-write never leaves a torn snapshot.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.inner().ensure_open()?;

        let collections = {
            let guard = self.inner().collections.read().await;
            guard
                .iter()
                .map(|(name, data)| {
                    (
                        name.clone(),
                        CollectionSnapshot {
                            next_id: data.next_id(),
                            documents: data.documents().to_vec(),
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>()
        };

        let snapshot = SnapshotFile {
            version: SNAPSHOT_VERSION,
            database: self.database().to_string(),
            checksum: collections_checksum(&collections)?,
            collections,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| DbError::Serialization(format!("Failed to encode snapshot: {e}")))?;

        let temp_path = temp_path(path);
        fs::write(&temp_path, json)
            .map_err(|e| DbError::Io(format!("Failed to write {}: {e}", temp_path.display())))?;
        fs::rename(&temp_path, path)
            .map_err(|e| DbError::Io(format!("Failed to rename snapshot into place: {e}")))?;

        tracing::debug!(
            "Saved snapshot of {} collections to {}",
            snapshot.collections.len(),
            path.display()
        );
        Ok(())
    }

    /// Replaces the connection's contents with the snapshot at `path`.
    ///
    /// The snapshot must carry this connection's database name and an
    /// intact checksum; otherwise nothing is loaded.
    pub async fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.inner().ensure_open()?;

        let raw = fs::read_to_string(path)
            .map_err(|e| DbError::Io(format!("Failed to read {}: {e}", path.display())))?;
        let snapshot: SnapshotFile = serde_json::from_str(&raw)
            .map_err(|e| DbError::DataCorruption(format!("unreadable snapshot: {e}")))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DbError::DataCorruption(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        let computed = collections_checksum(&snapshot.collections)?;
        if computed != snapshot.checksum {
            return Err(DbError::DataCorruption(format!(
                "checksum mismatch: recorded {}, computed {}",
                snapshot.checksum, computed
            )));
        }
        if snapshot.database != self.database() {
            return Err(DbError::SnapshotMismatch {
                expected: self.database().to_string(),
                found: snapshot.database,
            });
        }

        let mut collections = self.inner().collections.write().await;
        collections.clear();
        for (name, data) in snapshot.collections {
            collections.insert(name, CollectionData::from_parts(data.next_id, data.documents));
        }

        tracing::debug!(
            "Loaded snapshot of {} collections from {}",
            collections.len(),
            path.display()
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn collections_checksum(collections: &BTreeMap<String, CollectionSnapshot>) -> Result<u32> {
    let bytes = serde_json::to_vec(collections)
        .map_err(|e| DbError::Serialization(format!("Failed to encode collections: {e}")))?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}
