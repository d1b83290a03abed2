use super::context::AppContext;
use super::detail::{load_detail, print_detail};
use super::progress::{is_interactive, Spinner};
use super::prompts;
use super::watched::print_summary;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use popcorn_core::{AddOutcome, Key, PopcornApp, SearchState, SharedTitle};
use popcorn_models::SearchResult;
use tracing::info;

const QUIT: &str = "/quit";
const NEW_SEARCH: &str = "↩ New search";

/// What the results list hands back to the search prompt
enum ListExit {
    /// Search again with the query cleared
    NewSearch,
    /// Back to the search prompt, query kept
    Back,
}

pub async fn run_browse(output: &Output) -> Result<()> {
    if !is_interactive() {
        return Err(color_eyre::eyre::eyre!("browse needs an interactive terminal"));
    }

    let mut ctx = AppContext::load(true)?;
    let min_len = ctx.config.search.min_query_len;
    info!(operation = "browse", "Interactive session started");

    print_summary(&ctx.app, output);

    loop {
        print!("{}", render::title_banner(&ctx.title.current()));
        let current = ctx.app.query();
        let default = (!current.is_empty()).then_some(current.as_str());
        let query = prompts::prompt_string(&format!("Search movies ({} to exit)", QUIT), default)?;
        if query.trim() == QUIT {
            break;
        }

        ctx.app.set_query(query.clone());
        let spinner = Spinner::start(format!("Searching for \"{}\"...", query.trim()));
        let state = ctx.app.search_settled().await;
        spinner.finish();

        let results = match state {
            SearchState::Ok(results) => results,
            SearchState::Failed(message) => {
                output.error(message);
                continue;
            }
            SearchState::Idle | SearchState::Loading => {
                output.warn(format!("Type at least {} characters to search", min_len));
                continue;
            }
        };

        output.info(format!("Found {} results", results.len()));
        match browse_results(&mut ctx, &results, output).await? {
            ListExit::NewSearch => {
                // Enter on a blurred search box focuses it and clears the query
                ctx.app.handle_key(Key::Enter);
            }
            ListExit::Back => ctx.app.focus_search(),
        }
    }

    info!(operation = "browse", "Interactive session ended");
    Ok(())
}

async fn browse_results(ctx: &mut AppContext, results: &[SearchResult], output: &Output) -> Result<ListExit> {
    ctx.app.blur_search();

    let mut items: Vec<String> = results
        .iter()
        .map(|r| format!("{} ({})", r.title, r.year))
        .collect();
    items.push(NEW_SEARCH.to_string());

    loop {
        print!("{}", render::title_banner(&ctx.title.current()));
        let picked = prompts::select_opt("Pick a movie (Esc closes the open movie)", &items)?;

        let index = match picked {
            None => {
                if ctx.app.selected_id().is_some() {
                    ctx.app.handle_key(Key::Escape);
                    continue;
                }
                return Ok(ListExit::Back);
            }
            Some(i) if i == results.len() => return Ok(ListExit::NewSearch),
            Some(i) => i,
        };

        let id = results[index].id.clone();
        if ctx.app.selected_id().as_deref() == Some(id.as_str()) {
            // Picking the open movie again closes it
            ctx.app.select(&id);
            continue;
        }

        if let Some(exit) = show_and_rate(&mut ctx.app, &id, &ctx.title, output).await? {
            return Ok(exit);
        }
    }
}

/// Open `id`, print it and offer a rating. An empty rating leaves the list.
async fn show_and_rate(
    app: &mut PopcornApp,
    id: &str,
    title: &SharedTitle,
    output: &Output,
) -> Result<Option<ListExit>> {
    let detail = match load_detail(app, id).await {
        Ok(detail) => detail,
        Err(e) => {
            output.error(e.to_string());
            return Ok(None);
        }
    };

    print!("{}", render::title_banner(&title.current()));
    let rated = app.rating_for(id);
    print_detail(&detail, rated, output);
    if rated.is_some() {
        return Ok(None);
    }

    let Some(rating) = prompts::prompt_rating("Your rating, 1-10 (empty for a new search)")? else {
        return Ok(Some(ListExit::NewSearch));
    };

    match app.add_watched(rating)? {
        AddOutcome::Added(record) => {
            output.success(format!("Added {} to your watched list", record.title));
            print_summary(app, output);
        }
        AddOutcome::AlreadyWatched(previous) => {
            output.warn(format!("You already rated this movie {} ⭐", previous));
        }
    }
    Ok(None)
}
