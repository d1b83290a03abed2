use super::context::AppContext;
use super::detail::{load_detail, print_detail};
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use popcorn_core::{AddOutcome, PopcornApp};
use serde_json::json;

pub async fn run_add(id: String, rating: u8, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load(true)?;

    let detail = match load_detail(&mut ctx.app, &id).await {
        Ok(detail) => detail,
        Err(e) => {
            output.error(e.to_string());
            return Err(e);
        }
    };
    print_detail(&detail, None, output);

    match ctx.app.add_watched(rating) {
        Ok(AddOutcome::Added(record)) => {
            output.success(format!("Added {} ({}) with your rating {}", record.title, record.year, record.user_rating));
            output.json(&json!({ "added": record }));
        }
        Ok(AddOutcome::AlreadyWatched(previous)) => {
            output.warn(format!("You already rated this movie {} ⭐", previous));
        }
        Err(e) => {
            output.error(e.to_string());
            return Err(e.into());
        }
    }

    print_summary(&ctx.app, output);
    Ok(())
}

pub fn run_remove(id: String, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load(false)?;

    if ctx.app.remove_watched(&id)? {
        output.success(format!("Removed {} from your watched list", id));
    } else {
        output.warn(format!("{} is not on your watched list", id));
    }

    print_summary(&ctx.app, output);
    Ok(())
}

pub fn run_list(output: &Output) -> Result<()> {
    let ctx = AppContext::load(false)?;
    let records = ctx.app.watched();

    output.json(&json!({
        "watched": records,
        "stats": ctx.app.stats(),
    }));

    if !output.is_human() || output.is_quiet() {
        return Ok(());
    }

    if records.is_empty() {
        output.info("Your watched list is empty. Rate a movie with `popcorn add <id> --rating N`.");
        return Ok(());
    }

    println!("{}", render::watched_table(records));
    print_summary(&ctx.app, output);
    Ok(())
}

pub fn print_summary(app: &PopcornApp, output: &Output) {
    if output.is_human() {
        output.info(render::stats_line(&app.stats()));
    }
}
