use std::sync::Arc;

use curio_core::api::QuoteApi;
use curio_core::models::QuoteDraft;

use crate::commands::common::{fetch_all_quotes, parse_tags_arg, resolve_quote, ApiClient};
use crate::error::CliError;

pub async fn run_edit(
    client: ApiClient,
    id: &str,
    text: Option<&str>,
    author: Option<&str>,
    tags: Option<&str>,
) -> Result<(), CliError> {
    if text.is_none() && author.is_none() && tags.is_none() {
        return Err(CliError::Config(
            "nothing to change; pass --text, --author, or --tags".to_string(),
        ));
    }

    let client = Arc::new(client);
    let quotes = fetch_all_quotes(Arc::clone(&client)).await?;
    let current = resolve_quote(&quotes, id)?;

    let new_text = text.unwrap_or(&current.text);
    let new_author = author.unwrap_or(&current.author);
    let new_tags = tags.map_or_else(|| current.tags.clone(), |raw| parse_tags_arg(Some(raw)));

    let draft = QuoteDraft::new(new_text, new_author, new_tags)?;
    let updated = client.update(&current.id, &draft).await?;

    println!("Updated {}", updated.id);
    Ok(())
}
