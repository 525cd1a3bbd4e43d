use std::sync::Arc;

use curio_core::batch::{BatchConfig, BatchRunner, DeleteOperation};
use curio_core::dedup::{find_duplicates, CleanupPlan, DuplicateGroup};
use curio_core::models::Quote;
use serde::Serialize;

use crate::commands::common::{
    confirm, drive_batch, fetch_all_quotes, print_report, quote_to_list_item, ApiClient,
    QuoteListItem,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct DuplicateGroupItem {
    key: String,
    quotes: Vec<QuoteListItem>,
}

pub async fn run_dedup_scan(client: ApiClient, as_json: bool) -> Result<(), CliError> {
    let quotes = fetch_all_quotes(client).await?;
    let groups = find_duplicates(&quotes);

    if as_json {
        let items: Vec<DuplicateGroupItem> = groups
            .iter()
            .map(|group| DuplicateGroupItem {
                key: group.key.clone(),
                quotes: group.quotes.iter().map(quote_to_list_item).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No duplicates found among {} quotes.", quotes.len());
        return Ok(());
    }

    println!("{} duplicate clusters:", groups.len());
    for group in &groups {
        print_group(group);
    }
    println!("Run `curio dedup clean` to delete the newer copies.");
    Ok(())
}

pub async fn run_dedup_clean(
    client: ApiClient,
    keep_newest: bool,
    assume_yes: bool,
) -> Result<(), CliError> {
    let client = Arc::new(client);
    let quotes = fetch_all_quotes(Arc::clone(&client)).await?;
    let groups = find_duplicates(&quotes);

    if groups.is_empty() {
        println!("No duplicates found among {} quotes.", quotes.len());
        return Ok(());
    }

    let plan = build_plan(&groups, keep_newest);
    let doomed: Vec<Quote> = plan.selected().into_iter().cloned().collect();

    println!(
        "{} clusters; {} quotes marked for deletion:",
        groups.len(),
        doomed.len()
    );
    for entry in &plan.entries {
        let marker = if entry.selected { "delete" } else { "keep  " };
        println!(
            "  {marker}  {}  \"{}\" - {}",
            entry.quote.id.chars().take(8).collect::<String>(),
            entry.quote.preview(44),
            entry.quote.author
        );
    }

    if !assume_yes {
        let prompt = format!("Delete these {} quotes?", doomed.len());
        if !confirm(&prompt)? {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    let mut runner = BatchRunner::new(doomed, BatchConfig::crud());
    let mut op = DeleteOperation::new(&client);
    drive_batch(&mut runner, &mut op, describe_quote, "Cleanup").await?;

    let report = runner.into_report();
    print_report(&report, describe_quote, "Cleanup");
    Ok(())
}

/// Default plan keeps the oldest member; `keep_newest` inverts that
fn build_plan(groups: &[DuplicateGroup], keep_newest: bool) -> CleanupPlan {
    let mut plan = CleanupPlan::from_groups(groups);
    if keep_newest {
        for group in groups {
            for (position, quote) in group.quotes.iter().enumerate() {
                let keep = position == group.quotes.len() - 1;
                plan.set_selected(&quote.id, !keep);
            }
        }
    }
    plan
}

fn print_group(group: &DuplicateGroup) {
    let first = group.oldest();
    println!(
        "  {} copies: \"{}\" - {}",
        group.quotes.len(),
        first.preview(44),
        first.author
    );
    for quote in &group.quotes {
        println!(
            "    {}  created {}",
            quote.id.chars().take(8).collect::<String>(),
            quote.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}

fn describe_quote(quote: &Quote) -> String {
    format!("\"{}\" - {}", quote.preview(40), quote.author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn quote(id: &str, text: &str, created_secs: i64) -> Quote {
        let created_at = Utc.timestamp_opt(created_secs, 0).unwrap();
        Quote {
            id: id.to_string(),
            text: text.to_string(),
            author: "A".to_string(),
            tags: vec![],
            created_at,
            updated_at: created_at,
            created_by: None,
        }
    }

    #[test]
    fn build_plan_defaults_to_keeping_oldest() {
        let groups = find_duplicates(&[
            quote("1", "Be bold", 0),
            quote("2", "be bold", 10),
        ]);
        let plan = build_plan(&groups, false);
        let selected: Vec<&str> = plan.selected().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(selected, vec!["2"]);
    }

    #[test]
    fn build_plan_keep_newest_inverts_selection() {
        let groups = find_duplicates(&[
            quote("1", "Be bold", 0),
            quote("2", "be bold", 10),
            quote("3", "be bold ", 20),
        ]);
        let plan = build_plan(&groups, true);
        let selected: Vec<&str> = plan.selected().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(selected, vec!["1", "2"]);
    }
}
