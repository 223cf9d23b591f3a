//! Interactive chat room on stdin/stdout.

use std::error::Error;
use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::persona_list::list_personas;
use crate::cli::Services;
use crate::commands::{process_input, CommandResult};
use crate::core::message::{Role, Turn};
use crate::core::persona::PersonaId;
use crate::core::session::{SelectOutcome, SessionError, SessionManager};
use crate::ui::bubbles::{render_bubble, terminal_width};
use crate::ui::html::export_html;
use crate::utils::logging::LoggingState;

pub const USER_DISPLAY_NAME: &str = "나";

struct ChatRoom {
    manager: SessionManager,
    logging: LoggingState,
}

impl ChatRoom {
    fn persona_name(&self) -> &str {
        self.manager
            .active_persona()
            .map(|persona| persona.display_name.as_str())
            .unwrap_or_default()
    }

    fn speaker(&self, turn: &Turn) -> &str {
        match turn.role {
            Role::User => USER_DISPLAY_NAME,
            Role::Assistant => self.persona_name(),
        }
    }

    fn show(&self, turn: &Turn) {
        println!("{}", render_bubble(turn, self.speaker(turn), terminal_width()));
        println!();
        if let Err(err) = self
            .logging
            .log_turn(turn, USER_DISPLAY_NAME, self.persona_name())
        {
            eprintln!("⚠️  Log error: {err}");
        }
    }

    /// Show the last `count` transcript turns.
    fn show_recent(&self, count: usize) {
        let turns = self.manager.transcript().turns();
        for turn in &turns[turns.len().saturating_sub(count)..] {
            self.show(turn);
        }
    }

    async fn select(&mut self, id: PersonaId) -> Result<(), SessionError> {
        match self.manager.select(id).await? {
            SelectOutcome::Unchanged => {
                println!("💬 Already talking to {}.", self.persona_name());
                return Ok(());
            }
            SelectOutcome::Replaced { previous } => {
                println!(
                    "🔄 {} → {}: starting a new conversation",
                    self.manager.personas().get_persona(previous).display_name,
                    self.persona_name()
                );
            }
            SelectOutcome::Created => {}
        }

        if let Some(model) = self.manager.session().map(|session| session.model()) {
            println!("📡 Model: {}", model.short_name());
        }
        println!();
        if let Err(err) = self
            .logging
            .log_message(&format!("## {}", self.persona_name()))
        {
            eprintln!("⚠️  Log error: {err}");
        }
        self.show_recent(1);
        Ok(())
    }

    async fn send(&mut self, text: &str) -> Result<(), SessionError> {
        match self.manager.send(text).await {
            Ok(_) => {
                self.show_recent(2);
                Ok(())
            }
            Err(SessionError::EmptyMessage) => Ok(()),
            Err(err) if err.is_recoverable() => {
                // The attempted message stays visible
                self.show_recent(1);
                eprintln!("❌ {err}");
                eprintln!("   Send the message again to retry.");
                println!();
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn export(&self, path: &std::path::Path, background: Option<&std::path::Path>) {
        let Some(persona) = self.manager.active_persona() else {
            eprintln!("❌ Nothing to export yet");
            return;
        };
        match export_html(
            path,
            self.manager.transcript(),
            persona,
            USER_DISPLAY_NAME,
            background,
        ) {
            Ok(()) => println!("✅ Conversation exported to: {}", path.display()),
            Err(err) => eprintln!("❌ Export failed: {err}"),
        }
    }

    fn farewell(&self) {
        let Some(persona) = self.manager.active_persona() else {
            return;
        };
        let turn = Turn {
            role: Role::Assistant,
            content: persona.farewell.clone(),
            seq: 0,
        };
        self.show(&turn);
    }
}

pub async fn run_chat(
    services: Services,
    persona: PersonaId,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let Services {
        config,
        provider,
        resolver,
        personas,
    } = services;

    let logging = match LoggingState::new(log_file) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            std::process::exit(1);
        }
    };

    let mut room = ChatRoom {
        manager: SessionManager::new(resolver, provider, personas),
        logging,
    };

    println!("🏠 Sarangbang");
    println!("💡 Type /help for commands, '{}' to leave", config.exit_phrase());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if let Err(err) = room.select(persona).await {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match process_input(&line, config.exit_phrase()) {
            CommandResult::ProcessAsMessage(text) => {
                if let Err(err) = room.send(&text).await {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
            CommandResult::SelectPersona(id) => {
                if let Err(err) = room.select(id).await {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
            CommandResult::ListPersonas => {
                list_personas(room.manager.personas(), room.manager.active_persona().map(|p| p.id));
            }
            CommandResult::Export(path) => {
                room.export(&path, config.background_image.as_deref());
            }
            CommandResult::SetLogFile(path) => match room.logging.set_log_file(path) {
                Ok(message) => println!("📝 {message}"),
                Err(e) => eprintln!("❌ Logfile error: {e}"),
            },
            CommandResult::ToggleLog => match room.logging.toggle_logging("Logging paused") {
                Ok(message) => println!("📝 {message}"),
                Err(e) => eprintln!("❌ Log error: {e}"),
            },
            CommandResult::Help(text) => {
                println!("{text}");
                println!("📝 Logging: {}", room.logging.get_status_string());
            }
            CommandResult::Invalid(message) => eprintln!("❌ {message}"),
            CommandResult::Quit => {
                room.farewell();
                break;
            }
        }
    }

    Ok(())
}
