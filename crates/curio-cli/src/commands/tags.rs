use std::sync::Arc;

use curio_core::api::QuoteApi;
use curio_core::batch::{BatchConfig, BatchRunner, TagFillOperation};
use curio_core::models::Quote;

use crate::commands::common::{
    confirm, drive_batch, fetch_all_quotes, print_report, ApiClient,
};
use crate::error::CliError;

pub async fn run_tags_list(client: ApiClient, as_json: bool) -> Result<(), CliError> {
    let tags = client.list_tags().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else if tags.is_empty() {
        println!("No tags defined.");
    } else {
        for tag in &tags {
            println!("{:<30}  {} quotes", tag.name, tag.quote_count);
        }
    }

    Ok(())
}

pub async fn run_tags_cleanup(client: ApiClient, assume_yes: bool) -> Result<(), CliError> {
    if !assume_yes && !confirm("Remove every tag no quote uses?")? {
        println!("Nothing removed.");
        return Ok(());
    }

    let cleanup = client.delete_unused_tags().await?;
    if cleanup.removed.is_empty() {
        println!("No unused tags found.");
    } else {
        println!(
            "Removed {} unused tags: {}",
            cleanup.removed_count(),
            cleanup.removed.join(", ")
        );
        println!("{} tags remain in use.", cleanup.remaining_count());
    }

    Ok(())
}

pub async fn run_tags_fill(
    client: ApiClient,
    limit: usize,
    batch_size: usize,
    assume_yes: bool,
) -> Result<(), CliError> {
    let client = Arc::new(client);

    let vocabulary: Vec<String> = client
        .list_tags()
        .await?
        .into_iter()
        .map(|tag| tag.name)
        .collect();

    let untagged: Vec<Quote> = fetch_all_quotes(Arc::clone(&client))
        .await?
        .into_iter()
        .filter(|quote| !quote.has_tags())
        .take(limit)
        .collect();

    if untagged.is_empty() {
        println!("Every quote already has tags.");
        return Ok(());
    }

    println!(
        "Generating tags for {} untagged quotes ({} tags in the vocabulary)",
        untagged.len(),
        vocabulary.len()
    );

    let mut config = BatchConfig::ai_backed();
    config.batch_size = batch_size.max(1);
    config.pause_between_batches = !assume_yes;

    let mut runner = BatchRunner::new(untagged, config);
    let mut op = TagFillOperation::new(&client, vocabulary);
    drive_batch(&mut runner, &mut op, describe_quote, "Tag fill").await?;

    let report = runner.into_report();
    print_report(&report, describe_quote, "Tag fill");
    Ok(())
}

fn describe_quote(quote: &Quote) -> String {
    format!("\"{}\" - {}", quote.preview(40), quote.author)
}
