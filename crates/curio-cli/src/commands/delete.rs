use std::sync::Arc;

use curio_core::api::QuoteApi;

use crate::commands::common::{confirm, fetch_all_quotes, resolve_quote, ApiClient};
use crate::error::CliError;

pub async fn run_delete(client: ApiClient, id: &str, assume_yes: bool) -> Result<(), CliError> {
    let client = Arc::new(client);
    let quotes = fetch_all_quotes(Arc::clone(&client)).await?;
    let quote = resolve_quote(&quotes, id)?;

    if !assume_yes {
        let preview = quote.preview(60);
        let prompt = format!("Delete \"{preview}\" - {}?", quote.author);
        if !confirm(&prompt)? {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    client.delete(&quote.id).await?;
    println!("Deleted {}", quote.id);
    Ok(())
}
