//! Quote model and validated drafts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Maximum accepted tag length, matching the backend's limit
pub(crate) const MAX_TAG_LEN: usize = 50;

/// A quote in the remote collection
///
/// The `id` is assigned by the backend. An empty id means the quote has not
/// been persisted yet (for example, one parsed from an import file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Opaque backend-assigned identifier
    #[serde(default)]
    pub id: String,
    /// Quote text (wire name `quote`)
    #[serde(rename = "quote")]
    pub text: String,
    /// Attributed author
    pub author: String,
    /// Tag names, no empties or duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Username of the admin who created the quote, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Quote {
    /// Whether any tags are attached
    #[must_use]
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    /// First `max_chars` of the text, whitespace-collapsed, for listings
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let collapsed = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= max_chars {
            collapsed
        } else {
            let take_len = max_chars.saturating_sub(3);
            let mut truncated = collapsed.chars().take(take_len).collect::<String>();
            truncated.push_str("...");
            truncated
        }
    }
}

/// Validated input for create, update, and import calls
///
/// Construction through [`QuoteDraft::new`] guarantees non-empty text and
/// author and a clean tag set, so malformed data never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    /// Quote text (wire name `quote`)
    #[serde(rename = "quote")]
    pub text: String,
    /// Attributed author
    pub author: String,
    /// Tag names, trimmed and deduplicated
    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuoteDraft {
    /// Build a draft, trimming text/author and sanitizing tags.
    ///
    /// Fails with [`ApiError::Validation`] when the trimmed text or author
    /// is empty, or when a tag exceeds the backend's length limit.
    pub fn new(
        text: impl Into<String>,
        author: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, ApiError> {
        let text = text.into().trim().to_string();
        let author = author.into().trim().to_string();

        if text.is_empty() {
            return Err(ApiError::Validation("quote text must not be empty".into()));
        }
        if author.is_empty() {
            return Err(ApiError::Validation("author must not be empty".into()));
        }

        let tags = dedupe_tags(tags);
        if let Some(oversized) = tags.iter().find(|tag| tag.chars().count() > MAX_TAG_LEN) {
            return Err(ApiError::Validation(format!(
                "tag '{oversized}' exceeds {MAX_TAG_LEN} characters"
            )));
        }

        Ok(Self { text, author, tags })
    }

    /// Draft carrying the content of an existing quote with replacement tags
    pub fn from_quote(quote: &Quote, tags: Vec<String>) -> Result<Self, ApiError> {
        Self::new(quote.text.clone(), quote.author.clone(), tags)
    }
}

/// Trim tags, drop empties, and deduplicate case-insensitively.
///
/// The first spelling of each tag wins and input order is preserved, so
/// `["Wisdom", "wisdom", "Life"]` becomes `["Wisdom", "Life"]`.
#[must_use]
pub fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    let mut result = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        let folded = trimmed.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        result.push(trimmed.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quote(text: &str) -> Quote {
        Quote {
            id: "q1".to_string(),
            text: text.to_string(),
            author: "Author".to_string(),
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_draft_trims_text_and_author() {
        let draft = QuoteDraft::new("  Be bold  ", " Anonymous ", vec![]).unwrap();
        assert_eq!(draft.text, "Be bold");
        assert_eq!(draft.author, "Anonymous");
    }

    #[test]
    fn test_draft_rejects_empty_text() {
        assert!(QuoteDraft::new("   ", "Author", vec![]).is_err());
    }

    #[test]
    fn test_draft_rejects_empty_author() {
        assert!(QuoteDraft::new("Be bold", " \t ", vec![]).is_err());
    }

    #[test]
    fn test_draft_rejects_oversized_tag() {
        let long_tag = "x".repeat(51);
        assert!(QuoteDraft::new("Be bold", "Author", vec![long_tag]).is_err());
    }

    #[test]
    fn test_dedupe_tags_case_insensitive_first_spelling_wins() {
        let tags = dedupe_tags(vec![
            "Wisdom".to_string(),
            "wisdom".to_string(),
            "Life".to_string(),
            "WISDOM".to_string(),
        ]);
        assert_eq!(tags, vec!["Wisdom".to_string(), "Life".to_string()]);
    }

    #[test]
    fn test_dedupe_tags_drops_empty_entries() {
        let tags = dedupe_tags(vec![
            "  ".to_string(),
            "Motivation".to_string(),
            String::new(),
        ]);
        assert_eq!(tags, vec!["Motivation".to_string()]);
    }

    #[test]
    fn test_preview_truncates_and_collapses_whitespace() {
        let q = quote("The   only way\nto do great work");
        assert_eq!(q.preview(50), "The only way to do great work");
        assert_eq!(q.preview(12), "The only...");
    }

    #[test]
    fn test_quote_wire_names_round_trip() {
        let q = quote("Be bold");
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("quote").is_some());
        assert!(json.get("text").is_none());

        let parsed: Quote = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, q);
    }

    #[test]
    fn test_draft_deserializes_without_tags() {
        let draft: QuoteDraft =
            serde_json::from_str(r#"{"quote": "Be bold", "author": "A"}"#).unwrap();
        assert!(draft.tags.is_empty());
    }
}
