//! Feedback learning: interaction log, per-chunk EMA scores, query patterns
//! and command aliases.

pub mod error;
pub mod learning;
pub mod types;

pub use error::{MemoryError, Result};
pub use learning::LearningStore;
pub use types::{Interaction, LearningStats, ScoreAdjustment};
