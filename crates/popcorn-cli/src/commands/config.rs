use super::progress::is_interactive;
use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, PathManager, API_KEY_ENV};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(output),
        ConfigCommands::SetKey { key } => set_key(key, output),
        ConfigCommands::Init { force } => init_config(force, output),
    }
}

fn show_config(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Defaults are in effect. Run 'popcorn config init' to write them out.");
    }

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    output.json(&json!({
        "config_file": config_file.display().to_string(),
        "store_dir": path_manager.store_dir().display().to_string(),
        "omdb": {
            "api_key": config.omdb.masked_api_key(),
            "base_url": config.omdb.base_url,
            "timeout_secs": config.omdb.timeout_secs,
        },
        "search": config.search,
        "display": config.display,
        "storage": config.storage,
    }));

    if !output.is_human() || output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());
    println!();

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    let key_display = if config.omdb.has_api_key() {
        format!("{} {}", "✓".green(), config.omdb.masked_api_key())
    } else {
        format!("{} not set", "✗".red())
    };
    let rows = [
        ("Config File", config_file.display().to_string()),
        ("Store", path_manager.store_dir().display().to_string()),
        ("OMDb API Key", key_display),
        ("OMDb URL", config.omdb.base_url.clone()),
        ("Request Timeout", format!("{} seconds", config.omdb.timeout_secs)),
        ("Min Query Length", config.search.min_query_len.to_string()),
        ("Debounce", format!("{} ms", config.search.debounce_ms)),
        ("Default Title", config.display.default_title.clone()),
        ("Watched List Key", config.storage.watched_key.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    if std::env::var(API_KEY_ENV).is_ok() {
        output.info(format!("API key is taken from {}", API_KEY_ENV));
    }
    Ok(())
}

fn set_key(key: String, output: &Output) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key cannot be empty"));
    }

    let config_file = PathManager::default().config_file();
    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };

    config.omdb.api_key = key;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;

    output.success(format!("OMDb API key saved to {}", config_file.display()));
    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let config_file = PathManager::default().config_file();

    if config_file.exists() && !force {
        let overwrite = is_interactive()
            && prompts::prompt_yes_no(
                &format!("{} already exists. Overwrite with defaults?", config_file.display()),
                Some(false),
            )?;
        if !overwrite {
            output.warn("Keeping existing configuration (use --force to overwrite)");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}
