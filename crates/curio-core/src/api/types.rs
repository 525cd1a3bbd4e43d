//! Request parameters and page types for the collection endpoints

use serde::{Deserialize, Serialize};

use crate::models::Quote;

/// Sort key accepted by the list and search endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Quote text (wire value `quote`)
    #[serde(rename = "quote")]
    Text,
    Author,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Wire value for the `sort_by` query parameter
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Text => "quote",
            Self::Author => "author",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction accepted by the list and search endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire value for the `sort_order` query parameter
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Direction for an ascending flag
    #[must_use]
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePage {
    /// Quotes in backend order
    pub quotes: Vec<Quote>,
    /// Continuation token for the next page, if any
    pub next_cursor: Option<String>,
    /// Whether the backend reports further pages
    pub has_more: bool,
    /// Collection-wide count when the backend supplies one
    pub total_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_wire_values() {
        assert_eq!(SortField::Text.as_param(), "quote");
        assert_eq!(SortField::Author.as_param(), "author");
        assert_eq!(SortField::CreatedAt.as_param(), "created_at");
        assert_eq!(SortField::UpdatedAt.as_param(), "updated_at");
    }

    #[test]
    fn test_sort_order_from_ascending() {
        assert_eq!(SortOrder::from_ascending(true), SortOrder::Asc);
        assert_eq!(SortOrder::from_ascending(false), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.as_param(), "desc");
    }
}
