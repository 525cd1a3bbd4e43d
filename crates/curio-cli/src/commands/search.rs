use curio_core::api::{SortField, SortOrder};
use curio_core::view::CollectionView;

use crate::commands::common::{
    check_applied, format_quote_lines, normalize_search_query, quote_to_list_item, ApiClient,
    QuoteListItem,
};
use crate::error::CliError;

pub async fn run_search(
    client: ApiClient,
    query: &str,
    limit: usize,
    sort: SortField,
    order: SortOrder,
    as_json: bool,
) -> Result<(), CliError> {
    let query = normalize_search_query(query)?;

    let mut view = CollectionView::new(client, limit);
    view.set_sort(sort, order == SortOrder::Asc);

    let applied = view.submit_query(&query).await;
    check_applied(applied, view.state())?;

    let state = view.state();
    if as_json {
        let items = state
            .quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if state.quotes.is_empty() {
        println!("No quotes match '{query}'");
    } else {
        for line in format_quote_lines(&state.quotes) {
            println!("{line}");
        }
        if state.quotes.len() == limit {
            println!("(search returns at most {limit} results; refine the query to see the rest)");
        }
    }

    Ok(())
}
