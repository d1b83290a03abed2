use super::context::AppContext;
use super::progress::Spinner;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use popcorn_core::SearchState;
use serde_json::json;

pub async fn run_search(query: String, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load(true)?;
    let min_len = ctx.config.search.min_query_len;

    ctx.app.set_query(query.clone());
    let spinner = Spinner::start(format!("Searching for \"{}\"...", query.trim()));
    let state = ctx.app.search_settled().await;
    spinner.finish();

    match state {
        SearchState::Idle | SearchState::Loading => {
            output.warn(format!("Type at least {} characters to search", min_len));
        }
        SearchState::Failed(message) => {
            output.error(&message);
            return Err(color_eyre::eyre::eyre!(message));
        }
        SearchState::Ok(results) => {
            output.json(&json!({
                "query": query,
                "count": results.len(),
                "results": results,
            }));
            if output.is_human() && !output.is_quiet() {
                output.info(format!("Found {} results", results.len()));
                println!("{}", render::results_table(&results));
            }
        }
    }

    Ok(())
}
