use chrono::{Duration, TimeZone, Utc};
use curio_core::api::{SortField, SortOrder};
use curio_core::models::Quote;
use curio_core::view::{Applied, ViewState};
use pretty_assertions::assert_eq;

use crate::cli::{OrderArg, SortArg};
use crate::commands::common::{
    format_relative_time, normalize_quote_identifier, normalize_search_query, parse_tags_arg,
    resolve_quote,
};
use crate::error::CliError;

fn quote(id: &str, text: &str) -> Quote {
    let stamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Quote {
        id: id.to_string(),
        text: text.to_string(),
        author: "Author".to_string(),
        tags: vec![],
        created_at: stamp,
        updated_at: stamp,
        created_by: None,
    }
}

#[test]
fn parse_tags_arg_splits_and_trims() {
    assert_eq!(
        parse_tags_arg(Some(" Wisdom , Life ,, ")),
        vec!["Wisdom".to_string(), "Life".to_string()]
    );
    assert!(parse_tags_arg(None).is_empty());
}

#[test]
fn normalize_search_query_rejects_empty() {
    assert!(normalize_search_query("  \t ").is_err());
    assert_eq!(normalize_search_query(" stoic ").unwrap(), "stoic");
}

#[test]
fn normalize_quote_identifier_rejects_empty() {
    assert!(normalize_quote_identifier("").is_err());
    assert_eq!(normalize_quote_identifier(" abc ").unwrap(), "abc");
}

#[test]
fn resolve_quote_matches_exact_id() {
    let quotes = vec![quote("abc-123", "One"), quote("abd-456", "Two")];
    assert_eq!(resolve_quote(&quotes, "abc-123").unwrap().text, "One");
}

#[test]
fn resolve_quote_matches_unique_prefix() {
    let quotes = vec![quote("abc-123", "One"), quote("xyz-456", "Two")];
    assert_eq!(resolve_quote(&quotes, "ab").unwrap().text, "One");
}

#[test]
fn resolve_quote_rejects_ambiguous_prefix() {
    let quotes = vec![quote("abc-123", "One"), quote("abd-456", "Two")];
    assert!(matches!(
        resolve_quote(&quotes, "ab"),
        Err(CliError::AmbiguousQuoteId(_))
    ));
}

#[test]
fn resolve_quote_reports_missing_id() {
    let quotes = vec![quote("abc-123", "One")];
    assert!(matches!(
        resolve_quote(&quotes, "zzz"),
        Err(CliError::QuoteNotFound(_))
    ));
}

#[test]
fn format_relative_time_units() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    assert_eq!(format_relative_time(now - Duration::seconds(30), now), "just now");
    assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5m ago");
    assert_eq!(format_relative_time(now - Duration::hours(3), now), "3h ago");
    assert_eq!(format_relative_time(now - Duration::days(2), now), "2d ago");
    assert_eq!(format_relative_time(now - Duration::weeks(2), now), "2w ago");
    assert_eq!(format_relative_time(now - Duration::days(400), now), "1y ago");
}

#[test]
fn sort_and_order_args_map_to_wire_values() {
    assert_eq!(SortArg::Text.to_field(), SortField::Text);
    assert_eq!(SortArg::Author.to_field(), SortField::Author);
    assert_eq!(SortArg::Created.to_field(), SortField::CreatedAt);
    assert_eq!(SortArg::Updated.to_field(), SortField::UpdatedAt);
    assert_eq!(OrderArg::Asc.to_order(), SortOrder::Asc);
    assert!(OrderArg::Asc.is_ascending());
    assert!(!OrderArg::Desc.is_ascending());
}

#[test]
fn check_applied_maps_view_outcomes() {
    use crate::commands::common::check_applied;

    let state = ViewState::new();
    assert!(check_applied(Applied::Updated, &state).is_ok());
    assert!(check_applied(Applied::Stale, &state).is_ok());
    assert!(matches!(
        check_applied(Applied::Unauthenticated, &state),
        Err(CliError::SessionExpired)
    ));

    let mut errored = ViewState::new();
    errored.error = Some("HTTP 502".to_string());
    assert!(matches!(
        check_applied(Applied::Failed, &errored),
        Err(CliError::Remote(message)) if message == "HTTP 502"
    ));
}
