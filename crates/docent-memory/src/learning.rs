//! Adaptive per-chunk scores learned from interaction outcomes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, Result};
use crate::types::{Interaction, LearningStats, ScoreAdjustment};

/// Current on-disk layout version.
pub const LEARNING_VERSION: u32 = 1;

/// Score of a chunk that has never been used.
pub const DEFAULT_SCORE: f64 = 1.0;
/// Weight of the newest outcome in the moving average.
pub const LEARNING_RATE: f64 = 0.1;
pub const SUCCESS_MULTIPLIER: f64 = 1.1;
pub const FAILURE_MULTIPLIER: f64 = 0.9;

fn default_version() -> u32 {
    1
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LearningData {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    interactions: Vec<Interaction>,
    #[serde(default)]
    chunk_scores: BTreeMap<String, f64>,
    #[serde(default)]
    query_patterns: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    command_aliases: BTreeMap<String, Vec<String>>,
}

/// One EMA step from `old` toward the outcome multiplier.
#[must_use]
pub fn updated_score(old: f64, successful: bool) -> f64 {
    let target = if successful {
        SUCCESS_MULTIPLIER
    } else {
        FAILURE_MULTIPLIER
    };
    old * (1.0 - LEARNING_RATE) + target * LEARNING_RATE
}

/// Interaction log and learned scores backed by a single JSON file.
///
/// Every mutating call persists the whole store before returning.
pub struct LearningStore {
    path: PathBuf,
    data: RwLock<LearningData>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for LearningStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl LearningStore {
    /// Open the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// was written by a newer version.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(text) => {
                let mut data: LearningData = serde_json::from_str(&text)?;
                if data.version > LEARNING_VERSION {
                    return Err(MemoryError::UnsupportedVersion {
                        found: data.version,
                        supported: LEARNING_VERSION,
                    });
                }
                data.version = LEARNING_VERSION;
                tracing::info!(
                    path = %path.display(),
                    interactions = data.interactions.len(),
                    scored_chunks = data.chunk_scores.len(),
                    "learning store loaded"
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no learning store file, starting empty");
                LearningData {
                    version: LEARNING_VERSION,
                    ..LearningData::default()
                }
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply the interaction's outcome to every chunk it used, append it to the
    /// log and persist. Returns the interaction with its adjustments filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn record_interaction(&self, mut interaction: Interaction) -> Result<Interaction> {
        self.mutate(|data| {
            interaction.adjustments = interaction
                .chunks_used
                .iter()
                .map(|chunk_id| {
                    let score = data
                        .chunk_scores
                        .entry(chunk_id.clone())
                        .or_insert(DEFAULT_SCORE);
                    let previous = *score;
                    *score = updated_score(previous, interaction.successful);
                    ScoreAdjustment {
                        chunk_id: chunk_id.clone(),
                        previous,
                        updated: *score,
                    }
                })
                .collect();
            data.interactions.push(interaction.clone());
        })?;
        tracing::debug!(
            id = %interaction.id,
            successful = interaction.successful,
            chunks = interaction.chunks_used.len(),
            "interaction recorded"
        );
        Ok(interaction)
    }

    /// Learned score for `chunk_id`, [`DEFAULT_SCORE`] if never used.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn chunk_score(&self, chunk_id: &str) -> Result<f64> {
        Ok(self
            .read()?
            .chunk_scores
            .get(chunk_id)
            .copied()
            .unwrap_or(DEFAULT_SCORE))
    }

    /// Remember `variation` as another phrasing of `canonical`. Returns
    /// `false` if it was already known.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn add_query_pattern(&self, canonical: &str, variation: &str) -> Result<bool> {
        self.append_unique(canonical, variation, |d| &mut d.query_patterns)
    }

    /// Remember `alias` as another name for `command`. Returns `false` if it
    /// was already known.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn add_command_alias(&self, command: &str, alias: &str) -> Result<bool> {
        self.append_unique(command, alias, |d| &mut d.command_aliases)
    }

    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn query_variations(&self, canonical: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .query_patterns
            .get(canonical)
            .cloned()
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn command_aliases(&self, command: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .command_aliases
            .get(command)
            .cloned()
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn interactions(&self) -> Result<Vec<Interaction>> {
        Ok(self.read()?.interactions.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn stats(&self) -> Result<LearningStats> {
        let data = self.read()?;
        Ok(LearningStats {
            total_interactions: data.interactions.len(),
            successful_interactions: data.interactions.iter().filter(|i| i.successful).count(),
            scored_chunks: data.chunk_scores.len(),
        })
    }

    fn append_unique(
        &self,
        key: &str,
        value: &str,
        map: impl FnOnce(&mut LearningData) -> &mut BTreeMap<String, Vec<String>>,
    ) -> Result<bool> {
        let mut added = false;
        self.mutate(|data| {
            let values = map(data).entry(key.to_owned()).or_default();
            if !values.iter().any(|v| v == value) {
                values.push(value.to_owned());
                added = true;
            }
        })?;
        Ok(added)
    }

    /// Apply `f` under the write lock, then persist the resulting state.
    ///
    /// Writers are serialized end to end so the file always reflects the
    /// latest in-memory state.
    fn mutate(&self, f: impl FnOnce(&mut LearningData)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| MemoryError::Lock(e.to_string()))?;

        let json = {
            let mut data = self
                .data
                .write()
                .map_err(|e| MemoryError::Lock(e.to_string()))?;
            f(&mut data);
            serde_json::to_string_pretty(&*data)?
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LearningData>> {
        self.data
            .read()
            .map_err(|e| MemoryError::Lock(e.to_string()))
    }
}
