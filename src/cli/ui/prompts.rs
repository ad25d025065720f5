use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password, Select};

const REQUIRED: &str = "Answer is required.";

/// Arrow-key Yes/No selection
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = ["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

/// Last line of defence before writing into a protected environment.
///
/// Defaults to the safe answer.
pub fn prompt_protected_confirmation(environment: &str) -> Result<bool> {
    let items = ["NO! This was a mistake.", "YES - I know what I am doing."];
    let prompt = format!(
        "YOU ARE ABOUT TO DUPLICATE CONTENT TO [{}] ENVIRONMENT. ARE YOU SURE YOU WANT TO CONTINUE?",
        environment.to_uppercase()
    );

    let selection = Select::new()
        .with_prompt(prompt.red().bold().to_string())
        .items(&items)
        .default(0)
        .interact()?;

    Ok(selection == 1)
}

/// Non-empty text input
pub fn prompt_required(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|value: &String| -> Result<(), &str> {
            if value.trim().is_empty() { Err(REQUIRED) } else { Ok(()) }
        });

    if let Some(default) = default.filter(|value| !value.is_empty()) {
        input = input.default(default.to_string());
    }

    Ok(input.interact_text()?.trim().to_string())
}

/// Text input that may be left blank
pub fn prompt_optional(prompt: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn prompt_secret(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Pick one of `choices`, preselecting `default` when it is among them
pub fn prompt_choice(prompt: &str, choices: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|default| choices.iter().position(|choice| choice == default))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(choices)
        .default(default_index)
        .interact()?;

    Ok(choices[selection].clone())
}
