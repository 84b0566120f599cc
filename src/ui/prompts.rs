//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown when stdin is a terminal. Otherwise the caller
//! must have received the value another way (a flag) or fail with a clear
//! error. Secret prompts never echo.

use std::io::{self, IsTerminal, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Whether prompts can be shown.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompt for a secret without echoing it.
///
/// An empty answer is returned as-is; callers decide what it means.
pub fn secret(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    rpassword::prompt_password(message).map_err(|e| PromptError::IoError(e.to_string()))
}

/// Prompt for a line of text.
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    print!("{}", message);
    io::stdout()
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
