//! Creature persistence.
//!
//! Stores the full creature list as one versioned JSON document, keyed by
//! creature id. The engine itself never does I/O; the presentation layer
//! calls into this store on every record change (there is no explicit
//! save step).

use crate::creature::Creature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current store file version.
const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    creatures: Vec<Creature>,
}

impl StoreFile {
    fn empty() -> Self {
        Self {
            version: STORE_VERSION,
            creatures: Vec::new(),
        }
    }
}

/// A flat-file creature store.
///
/// A missing file reads as an empty collection; saving a draft (id 0)
/// assigns the next free id.
#[derive(Debug, Clone)]
pub struct CreatureStore {
    path: PathBuf,
}

impl CreatureStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::empty());
        }
        let content = fs::read_to_string(&self.path)?;
        let file: StoreFile = serde_json::from_str(&content)?;
        if file.version != STORE_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: STORE_VERSION,
                found: file.version,
            });
        }
        Ok(file)
    }

    fn write(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// The next free creature id (ids start at 1; 0 is the draft).
    pub fn next_id(&self) -> Result<u64, StoreError> {
        let file = self.read()?;
        Ok(file.creatures.iter().map(|c| c.id).max().unwrap_or(0) + 1)
    }

    /// Upsert a creature by id, returning the id it was stored under.
    /// Drafts (id 0) are assigned the next free id.
    pub fn save(&self, creature: &Creature) -> Result<u64, StoreError> {
        let mut file = self.read()?;
        let mut creature = creature.clone();
        if creature.id == 0 {
            creature.id = file.creatures.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        }
        let id = creature.id;
        file.creatures.retain(|c| c.id != id);
        file.creatures.push(creature);
        self.write(&file)?;
        Ok(id)
    }

    /// Load every stored creature.
    pub fn load_all(&self) -> Result<Vec<Creature>, StoreError> {
        Ok(self.read()?.creatures)
    }

    /// Load one creature by id.
    pub fn load(&self, id: u64) -> Result<Option<Creature>, StoreError> {
        Ok(self.read()?.creatures.into_iter().find(|c| c.id == id))
    }

    /// Delete a creature by id. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut file = self.read()?;
        file.creatures.retain(|c| c.id != id);
        self.write(&file)
    }
}
