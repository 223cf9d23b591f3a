use super::CommandResult;

pub type CommandHandler = fn(CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "persona",
        usage: "/persona <id>",
        help: "Switch persona. Starts a fresh conversation.",
        handler: super::handle_persona,
    },
    Command {
        name: "personas",
        usage: "/personas",
        help: "List the available personas.",
        handler: super::handle_personas,
    },
    Command {
        name: "export",
        usage: "/export [file.html]",
        help: "Export the conversation as an HTML page.",
        handler: super::handle_export,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Toggle logging or set the log file path.",
        handler: super::handle_log,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Say goodbye and leave.",
        handler: super::handle_quit,
    },
];
