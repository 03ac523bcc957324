//! Interactive prompts and the input parsing behind them
//!
//! Parsing lives in plain functions so the rules (blank means "skip",
//! ids are positive, dates are `YYYY-MM-DD`) are testable without a TTY.

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use inquire::{validator::Validation, Confirm, InquireError, Text};

pub type PromptResult<T> = Result<T, InquireError>;

const SKIP_HELP: &str = "Leave blank to skip";

/// Trimmed input, `None` when blank
pub fn blank_to_none(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Blank is `Ok(None)`; anything else must parse.
pub fn parse_optional<T>(input: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    match blank_to_none(input) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("'{}' is not valid: {}", value, e)),
    }
}

/// Positive record id
pub fn parse_id(input: &str) -> Result<i32, String> {
    match input.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("'{}' is not a valid id", input.trim())),
    }
}

/// Optional positive record id
pub fn parse_optional_id(input: &str) -> Result<Option<i32>, String> {
    match blank_to_none(input) {
        None => Ok(None),
        Some(value) => parse_id(&value).map(Some),
    }
}

/// Optional `YYYY-MM-DD` date
pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, String> {
    match blank_to_none(input) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("'{}' is not a date (expected YYYY-MM-DD)", value)),
    }
}

fn to_validation<T>(parsed: Result<T, String>) -> Validation {
    match parsed {
        Ok(_) => Validation::Valid,
        Err(message) => Validation::Invalid(message.into()),
    }
}

/// Non-blank text, trimmed
pub fn required_text(message: &str) -> PromptResult<String> {
    let value = Text::new(message)
        .with_validator(|input: &str| {
            Ok(if input.trim().is_empty() {
                Validation::Invalid("This field is required".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()?;
    Ok(value.trim().to_string())
}

pub fn optional_text(message: &str) -> PromptResult<Option<String>> {
    let value = Text::new(message).with_help_message(SKIP_HELP).prompt()?;
    Ok(blank_to_none(&value))
}

/// Optional parsed value; invalid input is re-prompted.
pub fn optional_value<T>(message: &str, help: &str) -> PromptResult<Option<T>>
where
    T: FromStr + 'static,
    T::Err: Display,
{
    let value = Text::new(message)
        .with_help_message(help)
        .with_validator(|input: &str| Ok(to_validation(parse_optional::<T>(input))))
        .prompt()?;
    Ok(parse_optional::<T>(&value).ok().flatten())
}

pub fn required_id(message: &str) -> PromptResult<i32> {
    let value = Text::new(message)
        .with_validator(|input: &str| Ok(to_validation(parse_id(input))))
        .prompt()?;
    // Validated above; the prompt only returns parseable input.
    parse_id(&value).map_err(|e| InquireError::Custom(e.into()))
}

pub fn optional_id(message: &str) -> PromptResult<Option<i32>> {
    let value = Text::new(message)
        .with_help_message(SKIP_HELP)
        .with_validator(|input: &str| Ok(to_validation(parse_optional_id(input))))
        .prompt()?;
    Ok(parse_optional_id(&value).ok().flatten())
}

pub fn optional_date(message: &str) -> PromptResult<Option<NaiveDate>> {
    let value = Text::new(message)
        .with_help_message("YYYY-MM-DD, leave blank to skip")
        .with_validator(|input: &str| Ok(to_validation(parse_optional_date(input))))
        .prompt()?;
    Ok(parse_optional_date(&value).ok().flatten())
}

pub fn confirm(message: &str) -> PromptResult<bool> {
    Confirm::new(message).with_default(false).prompt()
}

/// Free-form line, e.g. a menu selection
pub fn line(message: &str) -> PromptResult<String> {
    Ok(Text::new(message).prompt()?.trim().to_string())
}

pub fn pause() -> PromptResult<()> {
    Text::new("Press Enter to continue...").prompt().map(|_| ())
}
