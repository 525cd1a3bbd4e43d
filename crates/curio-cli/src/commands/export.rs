use std::path::Path;

use curio_core::models::Quote;

use crate::cli::ExportFormat;
use crate::commands::common::{fetch_all_quotes, ApiClient};
use crate::error::CliError;

pub async fn run_export(
    client: ApiClient,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let quotes = fetch_all_quotes(client).await?;
    let rendered = match format {
        ExportFormat::Json => render_json_export(&quotes)?,
        ExportFormat::Csv => render_csv_export(&quotes),
    };

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

fn render_json_export(quotes: &[Quote]) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

fn render_csv_export(quotes: &[Quote]) -> String {
    let mut lines = vec!["id,quote,author,tags,created_at,updated_at".to_string()];
    for quote in quotes {
        lines.push(
            [
                csv_field(&quote.id),
                csv_field(&quote.text),
                csv_field(&quote.author),
                csv_field(&quote.tags.join("; ")),
                csv_field(&quote.created_at.to_rfc3339()),
                csv_field(&quote.updated_at.to_rfc3339()),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}

/// Quote a CSV field when it carries separators, doubling inner quotes
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
