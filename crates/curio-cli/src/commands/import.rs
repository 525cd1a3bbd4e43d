use std::path::Path;
use std::time::Duration;

use curio_core::batch::{BatchConfig, BatchRunner, ImportOperation};
use curio_core::models::QuoteDraft;

use crate::commands::common::{drive_batch, print_report, ApiClient};
use crate::error::CliError;

pub async fn run_import(
    client: ApiClient,
    file: &Path,
    batch_size: usize,
    delay_ms: u64,
    assume_yes: bool,
    retry_file: Option<&Path>,
    include_duplicates: bool,
) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(file)?;
    let drafts: Vec<QuoteDraft> = serde_json::from_str(&raw)?;
    if drafts.is_empty() {
        return Err(CliError::EmptyImportFile(file.display().to_string()));
    }

    println!("Importing {} quotes from {}", drafts.len(), file.display());

    let config = BatchConfig {
        batch_size: batch_size.max(1),
        inter_item_delay: Duration::from_millis(delay_ms),
        pause_between_batches: !assume_yes,
    };

    let mut runner = BatchRunner::new(drafts, config);
    let mut op = ImportOperation::new(&client);
    drive_batch(&mut runner, &mut op, describe_draft, "Import").await?;

    let report = runner.into_report();
    print_report(&report, describe_draft, "Import");

    if let Some(path) = retry_file {
        let failed = report.failed_items(include_duplicates);
        if failed.is_empty() {
            println!("No failed items to write.");
        } else {
            std::fs::write(path, serde_json::to_string_pretty(&failed)?)?;
            println!(
                "Wrote {} failed items to {}; edit and re-run `curio import` to retry.",
                failed.len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn describe_draft(draft: &QuoteDraft) -> String {
    let preview: String = draft.text.chars().take(40).collect();
    format!("\"{preview}\" - {}", draft.author)
}
