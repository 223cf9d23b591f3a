use crate::utils::line_editor::{prompt_masked_line, MaskMode};
use std::fmt;
use std::io::{self, BufRead, Write};

const MASKED_KEY_PROMPT: &str = "Gemini API key (F2 reveals the last 4 chars): ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationChoice {
    Yes,
    No,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct UiError {
    message: String,
}

impl UiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UiError {}

fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, UiError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|err| UiError::new(err.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|err| UiError::new(err.to_string()))?;
    Ok(line)
}

fn print_auth_banner() {
    println!("🔐 Sarangbang Authentication");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Create a key at https://aistudio.google.com/app/apikey");
    println!();
}

fn validate_api_key(raw: &str) -> Result<String, UiError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(UiError::new("API key cannot be empty"));
    }
    Ok(key.to_string())
}

/// Read the key from the terminal without echoing it.
pub fn prompt_masked_api_key() -> Result<String, UiError> {
    print_auth_banner();
    let mask = MaskMode::RevealTail { tail_chars: 4 };
    let raw =
        prompt_masked_line(MASKED_KEY_PROMPT, &mask).map_err(|err| UiError::new(err.to_string()))?;
    validate_api_key(&raw)
}

/// Read the key as a plain line from `input`.
pub fn prompt_api_key<R: BufRead>(input: &mut R) -> Result<String, UiError> {
    print_auth_banner();
    let raw = prompt_line(input, "Gemini API key: ")?;
    validate_api_key(&raw)
}

pub fn prompt_confirmation<R: BufRead>(
    input: &mut R,
    question: &str,
) -> Result<ConfirmationChoice, UiError> {
    let answer = prompt_line(input, &format!("{question} (y/N): "))?;
    parse_confirmation(&answer)
}

pub fn parse_confirmation(input: &str) -> Result<ConfirmationChoice, UiError> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Ok(ConfirmationChoice::No);
    }
    match trimmed.as_str() {
        "y" | "yes" => Ok(ConfirmationChoice::Yes),
        "n" | "no" => Ok(ConfirmationChoice::No),
        "c" | "cancel" => Ok(ConfirmationChoice::Cancel),
        _ => Err(UiError::new("Invalid confirmation response")),
    }
}
