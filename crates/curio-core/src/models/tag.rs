//! Tag metadata models

use serde::{Deserialize, Serialize};

/// A tag name with its usage count across the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    /// Tag name (wire name `tag`)
    #[serde(rename = "tag")]
    pub name: String,
    /// Number of quotes carrying this tag
    #[serde(rename = "count", default)]
    pub quote_count: u64,
}

impl TagSummary {
    /// Whether no quote currently uses this tag
    #[must_use]
    pub const fn is_unused(&self) -> bool {
        self.quote_count == 0
    }
}

/// Result of the bulk "delete unused tags" action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCleanup {
    /// Tags removed from the vocabulary
    #[serde(rename = "removed_tags", default)]
    pub removed: Vec<String>,
    /// Tags still in use after the cleanup
    #[serde(rename = "remaining_tags", default)]
    pub remaining: Vec<String>,
}

impl TagCleanup {
    /// Number of tags removed
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Number of tags kept
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_summary_wire_names() {
        let summary: TagSummary = serde_json::from_str(r#"{"tag": "Wisdom", "count": 3}"#).unwrap();
        assert_eq!(summary.name, "Wisdom");
        assert_eq!(summary.quote_count, 3);
        assert!(!summary.is_unused());
    }

    #[test]
    fn test_tag_summary_defaults_count_to_zero() {
        let summary: TagSummary = serde_json::from_str(r#"{"tag": "Orphan"}"#).unwrap();
        assert!(summary.is_unused());
    }

    #[test]
    fn test_tag_cleanup_counts() {
        let cleanup: TagCleanup = serde_json::from_str(
            r#"{"removed_tags": ["Old"], "remaining_tags": ["Wisdom", "Life"]}"#,
        )
        .unwrap();
        assert_eq!(cleanup.removed_count(), 1);
        assert_eq!(cleanup.remaining_count(), 2);
    }
}
