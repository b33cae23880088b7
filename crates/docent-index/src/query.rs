//! Query intent detection: which command and which section types a query is after.

use crate::types::SectionType;

/// Exact phrases that pin a query to one command's documentation.
const COMMAND_PHRASES: &[(&str, &str)] = &[
    ("logs command", "logs"),
    ("pod command", "pods"),
    ("deployment command", "deployments"),
];

/// Boost applied to chunks documenting the target command.
pub const COMMAND_BOOST: f32 = 2.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryIntent {
    pub target_command: Option<String>,
    /// Section types in priority order.
    pub target_types: Vec<SectionType>,
}

impl QueryIntent {
    #[must_use]
    pub fn detect(query: &str) -> Self {
        let q = query.to_lowercase();

        let target_command = COMMAND_PHRASES
            .iter()
            .find(|(phrase, _)| q.contains(phrase))
            .map(|(_, command)| (*command).to_owned());

        let target_types = if q.contains("usage") || q.contains("how to use") {
            vec![SectionType::Usage, SectionType::Example]
        } else if q.contains("example") {
            vec![SectionType::Example]
        } else if q.contains("flag") || q.contains("option") {
            vec![SectionType::Flags]
        } else if q.contains("how") {
            vec![SectionType::Usage, SectionType::Example, SectionType::Flags]
        } else {
            Vec::new()
        };

        Self {
            target_command,
            target_types,
        }
    }

    /// Multiplier for a chunk of `section_type`: `1.5 - 0.1 * i` for the first
    /// matching target type at position `i`, otherwise 1.0.
    #[must_use]
    pub fn type_boost(&self, section_type: SectionType) -> f32 {
        self.target_types
            .iter()
            .position(|t| *t == section_type)
            .map_or(1.0, |i| {
                #[allow(clippy::cast_precision_loss)]
                let i = i as f32;
                1.5 - 0.1 * i
            })
    }

    #[must_use]
    pub fn command_boost(&self, command: &str) -> f32 {
        match &self.target_command {
            Some(target) if target == command => COMMAND_BOOST,
            _ => 1.0,
        }
    }
}
