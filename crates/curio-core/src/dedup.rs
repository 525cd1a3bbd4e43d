//! Duplicate detection over already-fetched quotes
//!
//! Pure, synchronous clustering by normalized content key. This operates
//! only on quotes currently loaded into the client; it is not a
//! full-collection server-side scan.

use std::collections::BTreeMap;

use regex::Regex;

use crate::models::Quote;

/// Normalized clustering key: lower-cased, trimmed, inner whitespace
/// collapsed `text|author`.
///
/// # Examples
///
/// ```
/// use curio_core::dedup::normalized_key;
///
/// assert_eq!(normalized_key("Be  bold ", " A"), "be bold|a");
/// ```
#[must_use]
pub fn normalized_key(text: &str, author: &str) -> String {
    let whitespace = Regex::new(r"\s+").expect("Invalid regex");
    let text = whitespace.replace_all(text.trim(), " ").to_lowercase();
    let author = whitespace.replace_all(author.trim(), " ").to_lowercase();
    format!("{text}|{author}")
}

/// Two or more quotes sharing a normalized key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared normalized key
    pub key: String,
    /// Members sorted by creation time ascending (id as tie-break)
    pub quotes: Vec<Quote>,
}

impl DuplicateGroup {
    /// The member kept by the default cleanup policy
    #[must_use]
    pub fn oldest(&self) -> &Quote {
        &self.quotes[0]
    }
}

/// Cluster quotes by normalized key, keeping only groups of size >= 2.
///
/// Output is deterministic: groups sorted by key, members by creation time
/// ascending with id as tie-break.
#[must_use]
pub fn find_duplicates(quotes: &[Quote]) -> Vec<DuplicateGroup> {
    let mut clusters: BTreeMap<String, Vec<Quote>> = BTreeMap::new();
    for quote in quotes {
        let key = normalized_key(&quote.text, &quote.author);
        clusters.entry(key).or_default().push(quote.clone());
    }

    clusters
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(key, mut members)| {
            members.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            DuplicateGroup {
                key,
                quotes: members,
            }
        })
        .collect()
}

/// One quote in a cleanup plan with its deletion mark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupEntry {
    /// Key of the group this entry belongs to
    pub group_key: String,
    /// The quote itself
    pub quote: Quote,
    /// Whether this quote is marked for deletion
    pub selected: bool,
}

/// A user-editable deletion selection over duplicate groups
///
/// The default policy keeps the oldest member of each group and marks the
/// rest for deletion. Individual selections may be overridden before the
/// plan is confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    /// All group members in group order, oldest first within each group
    pub entries: Vec<CleanupEntry>,
}

impl CleanupPlan {
    /// Build the default plan: within each group, everything but the
    /// oldest member is selected for deletion.
    #[must_use]
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        let mut entries = Vec::new();
        for group in groups {
            for (position, quote) in group.quotes.iter().enumerate() {
                entries.push(CleanupEntry {
                    group_key: group.key.clone(),
                    quote: quote.clone(),
                    selected: position > 0,
                });
            }
        }
        Self { entries }
    }

    /// Override the selection for one quote. Returns false when the id is
    /// not part of the plan.
    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        for entry in &mut self.entries {
            if entry.quote.id == id {
                entry.selected = selected;
                return true;
            }
        }
        false
    }

    /// Quotes currently marked for deletion
    #[must_use]
    pub fn selected(&self) -> Vec<&Quote> {
        self.entries
            .iter()
            .filter(|entry| entry.selected)
            .map(|entry| &entry.quote)
            .collect()
    }

    /// Number of quotes marked for deletion
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.selected).count()
    }

    /// Whether nothing is marked for deletion
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_count() == 0
    }
}
