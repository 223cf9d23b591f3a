//! Slash-command parsing for the chat REPL.
//!
//! Parsing is pure: each handler turns an invocation into a [`CommandResult`]
//! and the REPL carries out the effect.

mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::persona::PersonaId;
use chrono::Local;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    ProcessAsMessage(String),
    Help(String),
    SelectPersona(PersonaId),
    ListPersonas,
    Export(PathBuf),
    SetLogFile(String),
    ToggleLog,
    Quit,
    /// Bad arguments; the string is shown to the user as-is.
    Invalid(String),
}

/// Interpret one line of REPL input. Typing the exit phrase on its own line
/// quits just like `/quit`.
pub fn process_input(input: &str, exit_phrase: &str) -> CommandResult {
    let trimmed = input.trim();

    if !exit_phrase.is_empty() && trimmed == exit_phrase {
        return CommandResult::Quit;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => (command.handler)(CommandInvocation {
            input: trimmed,
            args,
        }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub fn help_text() -> String {
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<22} {}\n", command.usage, command.help));
    }
    help
}

pub(super) fn handle_help(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Help(help_text())
}

pub(super) fn handle_persona(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Invalid("Usage: /persona <id>".to_string());
    }
    match invocation.args.parse::<PersonaId>() {
        Ok(id) => CommandResult::SelectPersona(id),
        Err(err) => CommandResult::Invalid(err.to_string()),
    }
}

pub(super) fn handle_personas(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ListPersonas
}

pub(super) fn handle_export(invocation: CommandInvocation<'_>) -> CommandResult {
    let path = if invocation.args.is_empty() {
        let timestamp = Local::now().format("%Y-%m-%d");
        PathBuf::from(format!("sarangbang-{timestamp}.html"))
    } else {
        PathBuf::from(invocation.args)
    };
    CommandResult::Export(path)
}

pub(super) fn handle_log(invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();
    match parts.len() {
        1 => CommandResult::ToggleLog,
        2 => CommandResult::SetLogFile(parts[1].to_string()),
        _ => CommandResult::Invalid("Usage: /log [filename]".to_string()),
    }
}

pub(super) fn handle_quit(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            process_input("오늘 기분이 안 좋아", "그만"),
            CommandResult::ProcessAsMessage("오늘 기분이 안 좋아".to_string())
        );
    }

    #[test]
    fn exit_phrase_quits() {
        assert_eq!(process_input("  그만 ", "그만"), CommandResult::Quit);
        assert_eq!(process_input("/quit", "그만"), CommandResult::Quit);
        assert!(matches!(
            process_input("그만해", "그만"),
            CommandResult::ProcessAsMessage(_)
        ));
    }

    #[test]
    fn persona_command_parses_ids() {
        assert_eq!(
            process_input("/persona family-father", "그만"),
            CommandResult::SelectPersona(PersonaId::FamilyFather)
        );
        assert_eq!(
            process_input("/PERSONA Primary", "그만"),
            CommandResult::SelectPersona(PersonaId::Primary)
        );
        match process_input("/persona grandma", "그만") {
            CommandResult::Invalid(message) => assert!(message.contains("grandma")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            process_input("/persona", "그만"),
            CommandResult::Invalid(_)
        ));
    }

    #[test]
    fn export_uses_given_or_dated_path() {
        assert_eq!(
            process_input("/export out/chat.html", "그만"),
            CommandResult::Export(PathBuf::from("out/chat.html"))
        );
        match process_input("/export", "그만") {
            CommandResult::Export(path) => {
                let name = path.to_string_lossy().into_owned();
                assert!(name.starts_with("sarangbang-") && name.ends_with(".html"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn log_command_forms() {
        assert_eq!(process_input("/log", ""), CommandResult::ToggleLog);
        assert_eq!(
            process_input("/log chat.txt", ""),
            CommandResult::SetLogFile("chat.txt".to_string())
        );
        assert!(matches!(process_input("/log a b", ""), CommandResult::Invalid(_)));
    }

    #[test]
    fn unknown_commands_are_sent_as_text() {
        assert_eq!(
            process_input("/shrug", "그만"),
            CommandResult::ProcessAsMessage("/shrug".to_string())
        );
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for command in all_commands() {
            assert!(help.contains(command.usage));
        }
    }
}
