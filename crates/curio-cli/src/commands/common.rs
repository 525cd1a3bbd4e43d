use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use curio_core::api::{QuoteApi, QuoteApiClient};
use curio_core::batch::{
    BatchOperation, BatchProgress, BatchReport, BatchRunner, BatchStatus, ItemOutcome,
};
use curio_core::models::Quote;
use curio_core::view::{Applied, CollectionView, ViewState};
use serde::Serialize;

use crate::auth::CliTokenProvider;
use crate::config_profiles::{is_http_url, CliProfilesConfig};
use crate::error::CliError;

/// Page size used when walking the whole collection
const WALK_PAGE_SIZE: usize = 500;

/// Outcomes shown at each confirmation gate
const RECENT_SAMPLE: usize = 5;

pub type ApiClient = QuoteApiClient<CliTokenProvider>;

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub id: String,
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub relative_time: String,
}

/// Build the API client for the resolved profile
pub fn build_client(profile_flag: Option<&str>) -> Result<ApiClient, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_flag);
    let Some(base_url) = config.resolve_api_base_url(&profile_name) else {
        return Err(CliError::ApiNotConfigured);
    };
    if !is_http_url(&base_url) {
        return Err(CliError::Config(format!(
            "API base URL must include http:// or https://, got: {base_url}"
        )));
    }

    tracing::debug!("using profile '{profile_name}' against {base_url}");
    let tokens = CliTokenProvider::new(profile_name);
    Ok(QuoteApiClient::new(base_url, tokens)?)
}

/// Turn a view transition outcome into a CLI result
pub fn check_applied(applied: Applied, state: &ViewState) -> Result<(), CliError> {
    match applied {
        Applied::Unauthenticated => Err(CliError::SessionExpired),
        Applied::Failed => Err(CliError::Remote(
            state
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        )),
        Applied::Updated | Applied::Stale | Applied::Skipped => Ok(()),
    }
}

/// Fetch the whole collection by following the browse cursor
pub async fn fetch_all_quotes<C: QuoteApi>(client: C) -> Result<Vec<Quote>, CliError> {
    let mut view = CollectionView::new(client, WALK_PAGE_SIZE);
    let applied = view.browse_first_page().await;
    check_applied(applied, view.state())?;

    while view.state().has_more {
        let applied = view.load_more().await;
        check_applied(applied, view.state())?;
        if applied == Applied::Skipped {
            break;
        }
    }

    Ok(view.state().quotes.clone())
}

/// Resolve a quote by exact id or unique id prefix
pub fn resolve_quote(quotes: &[Quote], query: &str) -> Result<Quote, CliError> {
    let query = normalize_quote_identifier(query)?;

    if let Some(exact) = quotes.iter().find(|quote| quote.id == query) {
        return Ok(exact.clone());
    }

    let matching: Vec<&Quote> = quotes
        .iter()
        .filter(|quote| quote.id.starts_with(&query))
        .collect();

    match matching.len() {
        0 => Err(CliError::QuoteNotFound(query)),
        1 => Ok(matching[0].clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|quote| quote.id.chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousQuoteId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let now = Utc::now();
    quotes
        .iter()
        .map(|quote| {
            let short_id = quote.id.chars().take(8).collect::<String>();
            let preview = quote.preview(48);
            let relative_time = format_relative_time(quote.updated_at, now);
            let tags = render_tags(quote);

            if tags.is_empty() {
                format!(
                    "{short_id:<8}  {preview:<48}  {:<20}  {relative_time}",
                    quote.author
                )
            } else {
                format!(
                    "{short_id:<8}  {preview:<48}  {:<20}  {relative_time:<10}  {tags}",
                    quote.author
                )
            }
        })
        .collect()
}

pub fn quote_to_list_item(quote: &Quote) -> QuoteListItem {
    QuoteListItem {
        id: quote.id.clone(),
        text: quote.text.clone(),
        author: quote.author.clone(),
        tags: quote.tags.clone(),
        created_at: quote.created_at,
        updated_at: quote.updated_at,
        relative_time: format_relative_time(quote.updated_at, Utc::now()),
    }
}

pub fn render_tags(quote: &Quote) -> String {
    if quote.tags.is_empty() {
        String::new()
    } else {
        format!("[{}]", quote.tags.join(", "))
    }
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(then).num_milliseconds().max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_quote_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyQuoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Split a comma-separated tag argument into clean tag names
pub fn parse_tags_arg(tags: Option<&str>) -> Vec<String> {
    tags.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Ask a yes/no question on stdin, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

pub fn outcome_label(outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::Succeeded(note) => format!("ok: {note}"),
        ItemOutcome::SoftDuplicate(_) => "skipped: equivalent quote already exists".to_string(),
        ItemOutcome::Failed(reason) => format!("failed: {reason}"),
    }
}

pub fn print_progress(label: &str, progress: &BatchProgress) {
    println!(
        "{label}: {}/{} processed, {} succeeded, {} failed ({} duplicates)",
        progress.processed,
        progress.total,
        progress.succeeded,
        progress.failed,
        progress.soft_duplicates
    );
}

/// Drive a runner through its confirmation gates, prompting between
/// chunks. A declined prompt aborts; unprocessed items are never started.
pub async fn drive_batch<T, O, D>(
    runner: &mut BatchRunner<T>,
    op: &mut O,
    describe: D,
    label: &str,
) -> Result<(), CliError>
where
    T: Clone + Send + Sync,
    O: BatchOperation<T>,
    D: Fn(&T) -> String,
{
    loop {
        match runner.run_chunk(op).await {
            BatchStatus::PausedForConfirmation => {
                print_progress(label, &runner.progress());
                for record in runner.recent_records(RECENT_SAMPLE) {
                    println!(
                        "  [{:>3}] {}  {}",
                        record.index + 1,
                        describe(&record.item),
                        outcome_label(&record.outcome)
                    );
                }
                if confirm("Continue with the next batch?")? {
                    runner.resume();
                } else {
                    runner.abort();
                    println!("Stopped; remaining items were not started.");
                }
            }
            BatchStatus::Completed | BatchStatus::Aborted => return Ok(()),
            BatchStatus::Running => {}
        }
    }
}

/// Print the final accounting for a batch run, failures in full detail
pub fn print_report<T, D>(report: &BatchReport<T>, describe: D, label: &str)
where
    T: Clone,
    D: Fn(&T) -> String,
{
    println!(
        "{label} finished: {} succeeded, {} failed ({} duplicates) of {} items",
        report.succeeded(),
        report.failed(),
        report.soft_duplicates(),
        report.total
    );
    let failures = report.failures(true);
    if !failures.is_empty() {
        println!("Failures:");
        for record in failures {
            println!(
                "  [{:>3}] {}  {}",
                record.index + 1,
                describe(&record.item),
                outcome_label(&record.outcome)
            );
        }
    }
}
