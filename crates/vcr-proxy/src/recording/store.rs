//! Interaction repository: the persistence contract and its backends.
//!
//! - `FileRepository` - one JSON file per interaction, one directory per target host
//! - `InMemoryRepository` - process-local map, for tests and throwaway sessions

use super::types::Interaction;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RECORDING_EXTENSION: &str = "json";

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Recording not found: {0}")]
    NotFound(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Corrupt recording {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize recording: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persistence contract for recorded interactions.
///
/// Implementations must allow listing/counting concurrently with writes. The
/// proxy handler serializes record/playback itself, so no per-key locking is
/// required here.
pub trait InteractionRepository: Send + Sync {
    /// Persist keyed by request fingerprint. Last write wins.
    fn store(&self, interaction: &Interaction) -> Result<(), StorageError>;

    /// Look up by fingerprint, falling back to the interaction id.
    fn find(&self, key: &str) -> Result<Interaction, StorageError>;

    fn find_all(&self) -> Result<Vec<Interaction>, StorageError>;

    fn count(&self) -> Result<usize, StorageError>;

    /// Remove everything. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Directory name for a target host: anything but ASCII alphanumerics and `-` becomes `_`.
pub fn sanitize_host(host: &str) -> String {
    let sanitized: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

/// File-backed repository.
///
/// Layout: `<root>/<sanitized host>/<fingerprint>.json`.
pub struct FileRepository {
    root: PathBuf,
    /// Guards the directory tree: listings share, writes and clears exclude.
    lock: RwLock<()>,
}

impl FileRepository {
    /// Open (and create if needed) a repository rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("Recording storage at {:?}", root);
        Ok(Self {
            root,
            lock: RwLock::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(fingerprint: &str) -> String {
        format!("{fingerprint}.{RECORDING_EXTENSION}")
    }

    fn host_dirs(&self) -> Result<Vec<PathBuf>, StorageError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }

    fn recording_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut files = Vec::new();
        for dir in self.host_dirs()? {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if is_recording_file(&path) {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }

    /// Every recording that parses; unreadable files are logged and skipped
    fn readable_interactions(&self) -> Result<Vec<Interaction>, StorageError> {
        let mut interactions = Vec::new();
        for path in self.recording_files()? {
            match Self::read_file(&path) {
                Ok(interaction) => interactions.push(interaction),
                Err(e) => warn!("Skipping unreadable recording: {}", e),
            }
        }
        Ok(interactions)
    }

    fn read_file(path: &Path) -> Result<Interaction, StorageError> {
        let contents = fs::read(path)?;
        serde_json::from_slice(&contents).map_err(|source| StorageError::Corrupt {
            path: path.display().to_string(),
            source,
        })
    }
}

fn is_recording_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(RECORDING_EXTENSION)
}

impl InteractionRepository for FileRepository {
    fn store(&self, interaction: &Interaction) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(interaction).map_err(StorageError::Serialize)?;
        let fingerprint = interaction.fingerprint();

        let _guard = self.lock.write();
        let dir = self.root.join(sanitize_host(&interaction.metadata.target));
        fs::create_dir_all(&dir)?;

        // Write beside the final path then rename, so a failed write never
        // leaves a truncated recording behind.
        let path = dir.join(Self::file_name(&fingerprint));
        let tmp = dir.join(format!(".{fingerprint}.tmp"));
        if let Err(e) = fs::write(&tmp, &json).and_then(|_| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(
            "Stored recording {} ({} {}) at {:?}",
            interaction.id, interaction.request.method, interaction.request.url, path
        );
        Ok(())
    }

    fn find(&self, key: &str) -> Result<Interaction, StorageError> {
        let _guard = self.lock.read();

        // Keys come from callers (admin API), never let them escape the root
        let is_plain_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !is_plain_key {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let file_name = Self::file_name(key);
        for dir in self.host_dirs()? {
            let path = dir.join(&file_name);
            if path.is_file() {
                return Self::read_file(&path);
            }
        }

        // Not a fingerprint: scan for a matching interaction id
        for path in self.recording_files()? {
            match Self::read_file(&path) {
                Ok(interaction) if interaction.id == key => return Ok(interaction),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable recording: {}", e),
            }
        }

        Err(StorageError::NotFound(key.to_string()))
    }

    fn find_all(&self) -> Result<Vec<Interaction>, StorageError> {
        let _guard = self.lock.read();
        let mut interactions = self.readable_interactions()?;
        interactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(interactions)
    }

    /// Same rule as `find_all`: corrupt files are not counted.
    fn count(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.read();
        Ok(self.readable_interactions()?.len())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.write();
        let dirs = self.host_dirs()?;
        let mut removed = 0usize;
        for dir in &dirs {
            match fs::remove_dir_all(dir) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Cleared recordings for {} target(s)", removed);
        Ok(())
    }
}

/// In-memory repository keyed by fingerprint
#[derive(Default)]
pub struct InMemoryRepository {
    interactions: RwLock<HashMap<String, Interaction>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InteractionRepository for InMemoryRepository {
    fn store(&self, interaction: &Interaction) -> Result<(), StorageError> {
        self.interactions
            .write()
            .insert(interaction.fingerprint(), interaction.clone());
        Ok(())
    }

    fn find(&self, key: &str) -> Result<Interaction, StorageError> {
        let interactions = self.interactions.read();
        interactions
            .get(key)
            .or_else(|| interactions.values().find(|i| i.id == key))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn find_all(&self) -> Result<Vec<Interaction>, StorageError> {
        let mut all: Vec<_> = self.interactions.read().values().cloned().collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(all)
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.interactions.read().len())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.interactions.write().clear();
        Ok(())
    }
}
