//! One-shot "say" command

use std::error::Error;

use crate::cli::Services;
use crate::core::persona::PersonaId;
use crate::core::session::{SessionError, SessionManager};

/// Open a session with `persona`, send one message and return the reply.
pub async fn say_once(
    services: Services,
    persona: PersonaId,
    prompt: &str,
) -> Result<String, SessionError> {
    let Services {
        provider,
        resolver,
        personas,
        ..
    } = services;
    let mut manager = SessionManager::new(resolver, provider, personas);
    manager.select(persona).await?;
    manager.send(prompt).await
}

pub async fn run_say(
    services: Services,
    persona: PersonaId,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: sarangbang say <message>");
        std::process::exit(1);
    }

    match say_once(services, persona, &prompt).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}
