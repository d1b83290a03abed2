use color_eyre::Result;
use dialoguer::{Confirm, Input, Select};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Prompt for a 1-10 rating. An empty answer returns `None`.
pub fn prompt_rating(prompt: &str) -> Result<Option<u8>> {
    loop {
        let input = prompt_string(prompt, None)?;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        match parse_rating(trimmed) {
            Some(rating) => return Ok(Some(rating)),
            None => eprintln!("Invalid rating. Please enter a whole number from 1 to 10."),
        }
    }
}

/// Pick one item; Esc or `q` returns `None`.
pub fn select_opt(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read selection: {}", e))
}

fn parse_rating(input: &str) -> Option<u8> {
    input.parse::<u8>().ok().filter(|r| (1..=10).contains(r))
}
