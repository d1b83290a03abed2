use super::context::AppContext;
use super::progress::Spinner;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use popcorn_core::{DetailState, PopcornApp};
use popcorn_models::MovieDetail;
use serde_json::json;

/// Open `id` in the app and wait for the load to finish.
pub async fn load_detail(app: &mut PopcornApp, id: &str) -> Result<MovieDetail> {
    app.select(id);
    let spinner = Spinner::start(format!("Loading {}...", id));
    let state = app.detail_settled().await;
    spinner.finish();

    match state {
        DetailState::Ok(detail) => Ok(detail),
        DetailState::Failed(message) => Err(color_eyre::eyre::eyre!(message)),
        DetailState::Empty | DetailState::Loading => Err(color_eyre::eyre::eyre!("No movie selected")),
    }
}

/// Human rendering of an open detail, including the existing rating if any
pub fn print_detail(detail: &MovieDetail, rated: Option<u8>, output: &Output) {
    if !output.is_human() || output.is_quiet() {
        return;
    }
    println!("{}", render::detail_table(detail));
    if let Some(rating) = rated {
        output.info(format!("You already rated this movie {} ⭐", rating));
    }
}

pub async fn run_show(id: String, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load(true)?;

    let detail = match load_detail(&mut ctx.app, &id).await {
        Ok(detail) => detail,
        Err(e) => {
            output.error(e.to_string());
            return Err(e);
        }
    };

    let rated = ctx.app.rating_for(&id);
    if output.is_human() && !output.is_quiet() {
        print!("{}", render::title_banner(&ctx.title.current()));
    }
    print_detail(&detail, rated, output);
    output.json(&json!({
        "detail": detail,
        "user_rating": rated,
    }));

    Ok(())
}
