//! Persona listing functionality

use crate::core::persona::{PersonaId, PersonaRegistry};

pub fn list_personas(registry: &PersonaRegistry, selected: Option<PersonaId>) {
    println!("👪 Available Personas");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    for persona in registry.list_personas() {
        let marker = if Some(persona.id) == selected { "▶" } else { " " };
        println!("{marker} {:<16} {}", persona.id.as_str(), persona.display_name);
        println!("    {}", persona.greeting);
    }

    println!();
    println!("Switch with: /persona <id>  or  sarangbang -P <id>");
}
