use curio_core::api::QuoteApi;
use curio_core::models::QuoteDraft;
use curio_core::ApiError;

use crate::commands::common::{parse_tags_arg, ApiClient};
use crate::error::CliError;

pub async fn run_add(
    client: ApiClient,
    text: &str,
    author: &str,
    tags: Option<&str>,
) -> Result<(), CliError> {
    let draft = QuoteDraft::new(text, author, parse_tags_arg(tags))?;

    match client.create(&draft).await {
        Ok(quote) => {
            println!("{}", quote.id);
            Ok(())
        }
        Err(ApiError::Conflict(_)) => {
            println!("An equivalent quote already exists; nothing created.");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
