//! HTTP client for the quote collection backend

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{dedupe_tags, Quote, QuoteDraft, TagCleanup, TagSummary, MAX_TAG_LEN};

use super::types::{QuotePage, SortField, SortOrder};

/// Maximum tags accepted from a suggestion response
const MAX_SUGGESTED_TAGS: usize = 5;

/// Supplies the bearer token attached to every backend call.
///
/// Absence of a token is treated as an immediate authentication failure
/// without a network call.
pub trait TokenProvider: Send + Sync {
    /// Current bearer token, or `None` when no session is available
    fn bearer_token(&self) -> Option<String>;
}

/// Typed operations against the quote collection backend.
///
/// Implemented by [`QuoteApiClient`] for the real backend and by in-memory
/// fakes in tests.
#[async_trait]
pub trait QuoteApi: Send + Sync {
    /// Fetch one page of the collection. No `cursor` means the first page.
    async fn list(
        &self,
        sort: SortField,
        order: SortOrder,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<QuotePage, ApiError>;

    /// Free-text search over quote text and author.
    ///
    /// Always a single result set of at most `limit` quotes; search is
    /// never paginated.
    async fn search(
        &self,
        query: &str,
        sort: SortField,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<Quote>, ApiError>;

    /// Persist a new quote. Fails with [`ApiError::Conflict`] when the
    /// backend's duplicate check trips.
    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, ApiError>;

    /// Replace the content of an existing quote
    async fn update(&self, id: &str, draft: &QuoteDraft) -> Result<Quote, ApiError>;

    /// Remove a quote permanently
    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// All tag names with usage counts
    async fn list_tags(&self) -> Result<Vec<TagSummary>, ApiError>;

    /// Remove every tag no quote uses and report what was removed
    async fn delete_unused_tags(&self) -> Result<TagCleanup, ApiError>;

    /// Ask the AI service for 1-5 tags from the existing vocabulary
    async fn suggest_tags(
        &self,
        text: &str,
        author: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
impl<T: QuoteApi + ?Sized> QuoteApi for std::sync::Arc<T> {
    async fn list(
        &self,
        sort: SortField,
        order: SortOrder,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<QuotePage, ApiError> {
        (**self).list(sort, order, limit, cursor).await
    }

    async fn search(
        &self,
        query: &str,
        sort: SortField,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<Quote>, ApiError> {
        (**self).search(query, sort, order, limit).await
    }

    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, ApiError> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &str, draft: &QuoteDraft) -> Result<Quote, ApiError> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id).await
    }

    async fn list_tags(&self) -> Result<Vec<TagSummary>, ApiError> {
        (**self).list_tags().await
    }

    async fn delete_unused_tags(&self) -> Result<TagCleanup, ApiError> {
        (**self).delete_unused_tags().await
    }

    async fn suggest_tags(
        &self,
        text: &str,
        author: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ApiError> {
        (**self).suggest_tags(text, author, existing).await
    }
}

/// reqwest-backed implementation of [`QuoteApi`]
pub struct QuoteApiClient<P> {
    base_url: String,
    client: reqwest::Client,
    tokens: P,
}

impl<P: TokenProvider> QuoteApiClient<P> {
    /// Build a client for the given API base URL.
    ///
    /// The URL must carry an `http://` or `https://` scheme; a trailing
    /// slash is stripped.
    pub fn new(base_url: impl Into<String>, tokens: P) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder().build()?,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .tokens
            .bearer_token()
            .ok_or_else(|| ApiError::Unauthenticated("no bearer token available".to_string()))?;
        Ok(request
            .bearer_auth(token)
            .header("Accept", "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }
}

#[async_trait]
impl<P: TokenProvider> QuoteApi for QuoteApiClient<P> {
    async fn list(
        &self,
        sort: SortField,
        order: SortOrder,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<QuotePage, ApiError> {
        let mut request = self
            .client
            .get(self.url("/admin/quotes"))
            .query(&[
                ("sort_by", sort.as_param()),
                ("sort_order", order.as_param()),
            ])
            .query(&[("limit", limit.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("last_key", cursor)]);
        }

        let response = self.send(self.authorized(request)?).await?;
        let payload: ListResponse = decode(response).await?;
        Ok(payload.into_page())
    }

    async fn search(
        &self,
        query: &str,
        sort: SortField,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<Quote>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::Validation("search query must not be empty".into()));
        }

        let request = self
            .client
            .get(self.url("/admin/quotes"))
            .query(&[
                ("sort_by", sort.as_param()),
                ("sort_order", order.as_param()),
                ("search", query),
            ])
            .query(&[("limit", limit.to_string())]);

        let response = self.send(self.authorized(request)?).await?;
        let payload: ListResponse = decode(response).await?;
        Ok(payload.quotes)
    }

    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, ApiError> {
        let request = self.client.post(self.url("/admin/quotes")).json(draft);
        let response = self.send(self.authorized(request)?).await?;
        let payload: MutationResponse = decode(response).await?;
        Ok(payload.quote)
    }

    async fn update(&self, id: &str, draft: &QuoteDraft) -> Result<Quote, ApiError> {
        let id = normalize_id(id)?;
        let request = self
            .client
            .put(self.url(&format!("/admin/quotes/{id}")))
            .json(draft);
        let response = self.send(self.authorized(request)?).await?;
        let payload: MutationResponse = decode(response).await?;
        Ok(payload.quote)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let id = normalize_id(id)?;
        let request = self.client.delete(self.url(&format!("/admin/quotes/{id}")));
        self.send(self.authorized(request)?).await?;
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<TagSummary>, ApiError> {
        let request = self.client.get(self.url("/admin/tags"));
        let response = self.send(self.authorized(request)?).await?;
        let payload: TagsResponse = decode(response).await?;
        Ok(payload.tags)
    }

    async fn delete_unused_tags(&self) -> Result<TagCleanup, ApiError> {
        let request = self.client.delete(self.url("/admin/tags/unused"));
        let response = self.send(self.authorized(request)?).await?;
        decode(response).await
    }

    async fn suggest_tags(
        &self,
        text: &str,
        author: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ApiError> {
        let payload = serde_json::json!({
            "quote": text,
            "author": author,
            "existingTags": existing,
        });
        let request = self
            .client
            .post(self.url("/admin/generate-tags"))
            .json(&payload);
        let response = self.send(self.authorized(request)?).await?;
        let payload: SuggestResponse = decode(response).await?;
        Ok(sanitize_suggested_tags(payload.tags))
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    quotes: Vec<Quote>,
    #[serde(default)]
    last_key: Option<String>,
    #[serde(default)]
    has_more: Option<bool>,
    #[serde(default)]
    total_count: Option<u64>,
}

impl ListResponse {
    fn into_page(self) -> QuotePage {
        let has_more = self.has_more.unwrap_or(self.last_key.is_some());
        QuotePage {
            quotes: self.quotes,
            next_cursor: self.last_key,
            has_more,
            total_count: self.total_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    quote: Quote,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Vec<TagSummary>,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|error| ApiError::InvalidPayload(error.to_string()))
}

fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    let message = parse_api_error(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthenticated(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return message.trim().to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed.chars().take(180).collect()
    }
}

/// Trim, deduplicate, and cap suggested tags to the backend's limits
fn sanitize_suggested_tags(tags: Vec<String>) -> Vec<String> {
    let mut tags = dedupe_tags(tags);
    tags.retain(|tag| tag.chars().count() <= MAX_TAG_LEN);
    tags.truncate(MAX_SUGGESTED_TAGS);
    tags
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("API base URL must not be empty".into()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Validation(
            "API base URL must include http:// or https://".into(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn normalize_id(id: &str) -> Result<&str, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("quote id must not be empty".into()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_base_url_strips_trailing_slash() {
        let normalized = normalize_base_url("https://api.example.com/").unwrap();
        assert_eq!(normalized, "https://api.example.com");
    }

    #[test]
    fn test_normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url("  ").is_err());
        assert!(normalize_base_url("api.example.com").is_err());
    }

    #[test]
    fn test_error_for_status_maps_taxonomy() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthenticated(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, ""),
            ApiError::Unauthenticated(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::CONFLICT, ""),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ApiError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_parse_api_error_prefers_json_message() {
        let message = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Validation failed", "message": "Quote text is required"}"#,
        );
        assert_eq!(message, "Quote text is required");
    }

    #[test]
    fn test_parse_api_error_falls_back_to_status() {
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, " boom "), "boom");
    }

    #[test]
    fn test_sanitize_suggested_tags_caps_at_five() {
        let tags = sanitize_suggested_tags(vec![
            "One".to_string(),
            "Two".to_string(),
            "one".to_string(),
            "Three".to_string(),
            "Four".to_string(),
            "Five".to_string(),
            "Six".to_string(),
        ]);
        assert_eq!(tags.len(), 5);
        assert_eq!(tags[0], "One");
        assert!(!tags.contains(&"Six".to_string()));
    }

    #[test]
    fn test_sanitize_suggested_tags_drops_oversized() {
        let tags = sanitize_suggested_tags(vec!["y".repeat(60), "Wisdom".to_string()]);
        assert_eq!(tags, vec!["Wisdom".to_string()]);
    }

    #[test]
    fn test_list_response_has_more_follows_cursor_when_absent() {
        let payload: ListResponse =
            serde_json::from_str(r#"{"quotes": [], "last_key": "abc"}"#).unwrap();
        let page = payload.into_page();
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));

        let payload: ListResponse = serde_json::from_str(r#"{"quotes": []}"#).unwrap();
        assert!(!payload.into_page().has_more);
    }
}
