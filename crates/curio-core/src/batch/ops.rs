//! Concrete batch operations over the collection API

use async_trait::async_trait;

use crate::api::QuoteApi;
use crate::error::ApiError;
use crate::models::{Quote, QuoteDraft};

use super::runner::BatchOperation;

/// Bulk import: create one quote per draft.
///
/// Drafts are revalidated before the network call (import files are
/// deserialized, not constructed), so malformed items fail locally.
pub struct ImportOperation<'a, C> {
    api: &'a C,
}

impl<'a, C> ImportOperation<'a, C> {
    pub const fn new(api: &'a C) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<'a, C: QuoteApi> BatchOperation<QuoteDraft> for ImportOperation<'a, C> {
    async fn apply(&mut self, item: &QuoteDraft) -> Result<String, ApiError> {
        let draft = QuoteDraft::new(item.text.clone(), item.author.clone(), item.tags.clone())?;
        let quote = self.api.create(&draft).await?;
        Ok(format!("created {}", quote.id))
    }
}

/// AI tag fill: suggest tags from the existing vocabulary for an untagged
/// quote and write them back
pub struct TagFillOperation<'a, C> {
    api: &'a C,
    vocabulary: Vec<String>,
}

impl<'a, C> TagFillOperation<'a, C> {
    pub const fn new(api: &'a C, vocabulary: Vec<String>) -> Self {
        Self { api, vocabulary }
    }
}

#[async_trait]
impl<'a, C: QuoteApi> BatchOperation<Quote> for TagFillOperation<'a, C> {
    async fn apply(&mut self, quote: &Quote) -> Result<String, ApiError> {
        let tags = self
            .api
            .suggest_tags(&quote.text, &quote.author, &self.vocabulary)
            .await?;
        if tags.is_empty() {
            return Err(ApiError::InvalidPayload(
                "suggestion returned no tags".into(),
            ));
        }
        let draft = QuoteDraft::from_quote(quote, tags.clone())?;
        self.api.update(&quote.id, &draft).await?;
        Ok(format!("tagged with {}", tags.join(", ")))
    }
}

/// Deletion of a user-confirmed cleanup selection
pub struct DeleteOperation<'a, C> {
    api: &'a C,
}

impl<'a, C> DeleteOperation<'a, C> {
    pub const fn new(api: &'a C) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<'a, C: QuoteApi> BatchOperation<Quote> for DeleteOperation<'a, C> {
    async fn apply(&mut self, quote: &Quote) -> Result<String, ApiError> {
        self.api.delete(&quote.id).await?;
        Ok(format!("deleted {}", quote.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchConfig, BatchRunner, BatchStatus, ItemOutcome};
    use crate::test_util::{quote, FakeApi};
    use pretty_assertions::assert_eq;

    fn draft(text: &str, author: &str) -> QuoteDraft {
        QuoteDraft {
            text: text.to_string(),
            author: author.to_string(),
            tags: vec![],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_import_records_validation_soft_duplicate_and_success() {
        let api = FakeApi::with_quotes(vec![quote("1", "Be bold", "A")]);
        let drafts = vec![
            draft("Fresh quote", "B"),
            draft("be bold", "a"),
            draft("No author here", "  "),
        ];

        let mut runner = BatchRunner::new(drafts, BatchConfig::crud());
        let mut op = ImportOperation::new(&api);
        let status = runner.run_to_completion(&mut op).await;
        assert_eq!(status, BatchStatus::Completed);

        let report = runner.into_report();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.soft_duplicates(), 1);
        assert!(matches!(
            report.records[1].outcome,
            ItemOutcome::SoftDuplicate(_)
        ));

        // The malformed draft never reached the network.
        let creates: Vec<String> = api
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("create"))
            .collect();
        assert_eq!(creates.len(), 2);
        assert_eq!(api.stored().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_import_twelve_items_pauses_after_five_and_ten() {
        let api = FakeApi::new();
        let drafts: Vec<QuoteDraft> = (1..=12)
            .map(|n| draft(&format!("Quote number {n}"), "Importer"))
            .collect();

        let mut runner = BatchRunner::new(drafts, BatchConfig::crud().with_confirmation());
        let mut op = ImportOperation::new(&api);

        assert_eq!(
            runner.run_chunk(&mut op).await,
            BatchStatus::PausedForConfirmation
        );
        let progress = runner.progress();
        assert_eq!((progress.processed, progress.succeeded), (5, 5));

        runner.resume();
        assert_eq!(
            runner.run_chunk(&mut op).await,
            BatchStatus::PausedForConfirmation
        );
        let progress = runner.progress();
        assert_eq!((progress.processed, progress.succeeded), (10, 10));

        runner.resume();
        assert_eq!(runner.run_chunk(&mut op).await, BatchStatus::Completed);
        assert_eq!(runner.progress().processed, 12);
        assert_eq!(api.stored().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tag_fill_updates_with_suggested_tags() {
        let api = FakeApi::with_quotes(vec![quote("1", "Be bold", "A")]);
        api.push_suggestion(vec!["Courage".to_string(), "Action".to_string()]);

        let untagged = api.stored();
        let mut runner = BatchRunner::new(untagged, BatchConfig::ai_backed());
        let mut op = TagFillOperation::new(&api, vec!["Courage".to_string(), "Action".to_string()]);
        runner.run_to_completion(&mut op).await;

        let report = runner.into_report();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(
            api.stored()[0].tags,
            vec!["Courage".to_string(), "Action".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tag_fill_counts_empty_suggestions_as_failure() {
        let api = FakeApi::with_quotes(vec![quote("1", "Be bold", "A")]);
        api.push_suggestion(vec![]);

        let untagged = api.stored();
        let mut runner = BatchRunner::new(untagged, BatchConfig::ai_backed());
        let mut op = TagFillOperation::new(&api, vec![]);
        runner.run_to_completion(&mut op).await;

        let report = runner.into_report();
        assert_eq!(report.failed(), 1);
        // No update happened.
        assert!(api.stored()[0].tags.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_operation_removes_selected_quotes() {
        let api = FakeApi::with_quotes(vec![
            quote("1", "Be bold", "A"),
            quote("2", "be bold", "a"),
        ]);
        let doomed = vec![api.stored()[1].clone(), quote("missing", "gone", "X")];

        let mut runner = BatchRunner::new(doomed, BatchConfig::crud());
        let mut op = DeleteOperation::new(&api);
        runner.run_to_completion(&mut op).await;

        let report = runner.into_report();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(api.stored().len(), 1);
        assert_eq!(api.stored()[0].id, "1");
    }
}
