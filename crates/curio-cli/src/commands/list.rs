use curio_core::api::{SortField, SortOrder};
use curio_core::view::{Applied, CollectionView};

use crate::commands::common::{
    check_applied, format_quote_lines, quote_to_list_item, ApiClient, QuoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    client: ApiClient,
    limit: usize,
    sort: SortField,
    order: SortOrder,
    all: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let mut view = CollectionView::new(client, limit);
    view.set_sort(sort, order == SortOrder::Asc);

    let applied = view.browse_first_page().await;
    check_applied(applied, view.state())?;

    if all {
        while view.state().has_more {
            let applied = view.load_more().await;
            check_applied(applied, view.state())?;
            if applied == Applied::Skipped {
                break;
            }
        }
    }

    let state = view.state();
    if as_json {
        let items = state
            .quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_quote_lines(&state.quotes) {
            println!("{line}");
        }
        if state.has_more {
            if let Some(total) = state.total_count {
                println!(
                    "({} of {} shown; use --all or a larger --limit)",
                    state.quotes.len(),
                    total
                );
            } else {
                println!("({} shown; more available)", state.quotes.len());
            }
        }
    }

    Ok(())
}
