//! In-memory fake of the collection backend shared by unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::api::{QuoteApi, QuotePage, SortField, SortOrder};
use crate::dedup::normalized_key;
use crate::error::ApiError;
use crate::models::{Quote, QuoteDraft, TagCleanup, TagSummary};

/// Failure injected into the next backend call
#[derive(Clone, Copy, Debug)]
pub enum FakeFailure {
    Status(u16),
    Unauthenticated,
    Conflict,
}

impl FakeFailure {
    fn into_error(self) -> ApiError {
        match self {
            Self::Status(status) => ApiError::Api {
                status,
                message: "injected failure".to_string(),
            },
            Self::Unauthenticated => ApiError::Unauthenticated("injected 401".to_string()),
            Self::Conflict => ApiError::Conflict("injected duplicate".to_string()),
        }
    }
}

/// Scripted in-memory [`QuoteApi`] with a call log
pub struct FakeApi {
    quotes: Mutex<Vec<Quote>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<VecDeque<FakeFailure>>,
    suggestions: Mutex<VecDeque<Vec<String>>>,
    next_id: Mutex<usize>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::with_quotes(Vec::new())
    }

    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        let next_id = quotes.len() + 1;
        Self {
            quotes: Mutex::new(quotes),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            suggestions: Mutex::new(VecDeque::new()),
            next_id: Mutex::new(next_id),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn stored(&self) -> Vec<Quote> {
        self.quotes.lock().unwrap().clone()
    }

    /// Queue a failure consumed by the next call of any kind
    pub fn push_failure(&self, failure: FakeFailure) {
        self.failures.lock().unwrap().push_back(failure);
    }

    /// Queue the tag list returned by the next `suggest_tags` call
    pub fn push_suggestion(&self, tags: Vec<String>) {
        self.suggestions.lock().unwrap().push_back(tags);
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(&self) -> Option<ApiError> {
        self.failures
            .lock()
            .unwrap()
            .pop_front()
            .map(FakeFailure::into_error)
    }
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteApi for FakeApi {
    async fn list(
        &self,
        sort: SortField,
        order: SortOrder,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<QuotePage, ApiError> {
        self.log(format!(
            "list sort={} order={} cursor={}",
            sort.as_param(),
            order.as_param(),
            cursor.unwrap_or("-")
        ));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let quotes = self.quotes.lock().unwrap();
        let start: usize = cursor.map_or(0, |c| c.parse().unwrap_or(0));
        let end = (start + limit).min(quotes.len());
        let page: Vec<Quote> = quotes[start.min(quotes.len())..end].to_vec();
        let next_cursor = (end < quotes.len()).then(|| end.to_string());
        Ok(QuotePage {
            quotes: page,
            has_more: next_cursor.is_some(),
            next_cursor,
            total_count: Some(quotes.len() as u64),
        })
    }

    async fn search(
        &self,
        query: &str,
        sort: SortField,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<Quote>, ApiError> {
        self.log(format!(
            "search q={query} sort={} order={}",
            sort.as_param(),
            order.as_param()
        ));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let needle = query.to_lowercase();
        let quotes = self.quotes.lock().unwrap();
        Ok(quotes
            .iter()
            .filter(|q| {
                q.text.to_lowercase().contains(&needle) || q.author.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, ApiError> {
        self.log(format!("create {}", draft.text));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut quotes = self.quotes.lock().unwrap();
        let key = normalized_key(&draft.text, &draft.author);
        if quotes
            .iter()
            .any(|q| normalized_key(&q.text, &q.author) == key)
        {
            return Err(ApiError::Conflict("equivalent quote exists".to_string()));
        }

        let mut next_id = self.next_id.lock().unwrap();
        let created = Quote {
            id: format!("q{}", *next_id),
            text: draft.text.clone(),
            author: draft.author.clone(),
            tags: draft.tags.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: Some("fake-admin".to_string()),
        };
        *next_id += 1;
        quotes.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, draft: &QuoteDraft) -> Result<Quote, ApiError> {
        self.log(format!("update {id}"));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut quotes = self.quotes.lock().unwrap();
        let Some(existing) = quotes.iter_mut().find(|q| q.id == id) else {
            return Err(ApiError::NotFound(id.to_string()));
        };
        existing.text = draft.text.clone();
        existing.author = draft.author.clone();
        existing.tags = draft.tags.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.log(format!("delete {id}"));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut quotes = self.quotes.lock().unwrap();
        let before = quotes.len();
        quotes.retain(|q| q.id != id);
        if quotes.len() == before {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<TagSummary>, ApiError> {
        self.log("list_tags".to_string());
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let quotes = self.quotes.lock().unwrap();
        let mut summaries: Vec<TagSummary> = Vec::new();
        for quote in quotes.iter() {
            for tag in &quote.tags {
                match summaries.iter_mut().find(|s| s.name == *tag) {
                    Some(summary) => summary.quote_count += 1,
                    None => summaries.push(TagSummary {
                        name: tag.clone(),
                        quote_count: 1,
                    }),
                }
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn delete_unused_tags(&self) -> Result<TagCleanup, ApiError> {
        self.log("delete_unused_tags".to_string());
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        Ok(TagCleanup::default())
    }

    async fn suggest_tags(
        &self,
        _text: &str,
        author: &str,
        _existing: &[String],
    ) -> Result<Vec<String>, ApiError> {
        self.log(format!("suggest {author}"));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec!["Wisdom".to_string()]))
    }
}

/// Quote with deterministic timestamps offset by index-like seconds
pub fn quote(id: &str, text: &str, author: &str) -> Quote {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Quote {
        id: id.to_string(),
        text: text.to_string(),
        author: author.to_string(),
        tags: vec![],
        created_at: base,
        updated_at: base,
        created_by: None,
    }
}

/// Quotes named after their texts, ids `1..=n`, spaced one minute apart
pub fn quotes(texts: &[&str]) -> Vec<Quote> {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let stamp = base + Duration::minutes(index as i64);
            Quote {
                id: (index + 1).to_string(),
                text: (*text).to_string(),
                author: "Author".to_string(),
                tags: vec![],
                created_at: stamp,
                updated_at: stamp,
                created_by: None,
            }
        })
        .collect()
}

/// One page with `has_more` following cursor presence
pub fn page(quotes: Vec<Quote>, next_cursor: Option<String>) -> QuotePage {
    QuotePage {
        quotes,
        has_more: next_cursor.is_some(),
        next_cursor,
        total_count: None,
    }
}
