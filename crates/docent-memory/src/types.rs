use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score change applied to one chunk by one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustment {
    pub chunk_id: String,
    pub previous: f64,
    pub updated: f64,
}

/// One answered query and whether the answer helped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: Uuid,
    pub query: String,
    pub response: String,
    pub chunks_used: Vec<String>,
    pub successful: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub context: HashMap<String, String>,
    /// Filled in when the interaction is recorded.
    #[serde(default)]
    pub adjustments: Vec<ScoreAdjustment>,
}

impl Interaction {
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        response: impl Into<String>,
        chunks_used: Vec<String>,
        successful: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            response: response.into(),
            chunks_used,
            successful,
            timestamp: Utc::now(),
            context: HashMap::new(),
            adjustments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Aggregate view over the interaction log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningStats {
    pub total_interactions: usize,
    pub successful_interactions: usize,
    pub scored_chunks: usize,
}

impl LearningStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_interactions == 0 {
            0.0
        } else {
            self.successful_interactions as f64 / self.total_interactions as f64
        }
    }
}
