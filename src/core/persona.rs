//! Persona registry: the fixed set of conversational counterparts.

use crate::core::config::{Config, PersonaOverride};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const NAME_PLACEHOLDER: &str = "{{name}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonaId {
    Primary,
    FamilyFather,
    FamilyMother,
    FamilySibling,
}

impl PersonaId {
    pub const ALL: [PersonaId; 4] = [
        PersonaId::Primary,
        PersonaId::FamilyFather,
        PersonaId::FamilyMother,
        PersonaId::FamilySibling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonaId::Primary => "primary",
            PersonaId::FamilyFather => "family-father",
            PersonaId::FamilyMother => "family-mother",
            PersonaId::FamilySibling => "family-sibling",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPersona(pub String);

impl fmt::Display for UnknownPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available: Vec<&str> = PersonaId::ALL.iter().map(|id| id.as_str()).collect();
        write!(
            f,
            "Persona '{}' not found. Available personas: {}",
            self.0,
            available.join(", ")
        )
    }
}

impl std::error::Error for UnknownPersona {}

impl FromStr for PersonaId {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PersonaId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPersona(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub id: PersonaId,
    pub display_name: String,
    pub system_prompt: String,
    pub greeting: String,
    pub farewell: String,
}

#[derive(Deserialize)]
struct BuiltinPersona {
    id: String,
    display_name: String,
    system_prompt: String,
    greeting: String,
    farewell: String,
}

#[derive(Deserialize)]
struct BuiltinPersonasConfig {
    personas: Vec<BuiltinPersona>,
}

fn load_builtin_personas() -> Vec<BuiltinPersona> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_personas.toml");

    let config: BuiltinPersonasConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_personas.toml");

    config.personas
}

fn substitute_name(text: &str, display_name: &str) -> String {
    text.trim().replace(NAME_PLACEHOLDER, display_name)
}

fn build_persona(
    id: PersonaId,
    builtin: &BuiltinPersona,
    overrides: Option<&PersonaOverride>,
) -> Persona {
    let pick = |field: Option<&String>, fallback: &str| -> String {
        field
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    let display_name = pick(
        overrides.and_then(|o| o.display_name.as_ref()),
        &builtin.display_name,
    );
    let system_prompt = pick(
        overrides.and_then(|o| o.system_prompt.as_ref()),
        &builtin.system_prompt,
    );
    let greeting = pick(overrides.and_then(|o| o.greeting.as_ref()), &builtin.greeting);
    let farewell = pick(overrides.and_then(|o| o.farewell.as_ref()), &builtin.farewell);

    Persona {
        id,
        system_prompt: substitute_name(&system_prompt, &display_name),
        greeting: substitute_name(&greeting, &display_name),
        farewell: substitute_name(&farewell, &display_name),
        display_name,
    }
}

/// Maps every [`PersonaId`] to exactly one immutable [`Persona`].
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    pub fn builtin() -> Self {
        Self::with_overrides(&Config::default())
    }

    /// Built-in personas with any `[personas.<id>]` overrides from config applied.
    pub fn with_overrides(config: &Config) -> Self {
        for key in config.personas.keys() {
            if key.parse::<PersonaId>().is_err() {
                warn!(persona = %key, "ignoring override for unknown persona");
            }
        }

        let builtins = load_builtin_personas();
        let personas = PersonaId::ALL
            .into_iter()
            .map(|id| {
                let builtin = builtins
                    .iter()
                    .find(|p| p.id == id.as_str())
                    .expect("builtin_personas.toml defines every persona id");
                build_persona(id, builtin, config.persona_override(id.as_str()))
            })
            .collect();

        Self { personas }
    }

    pub fn get_persona(&self, id: PersonaId) -> &Persona {
        &self.personas[id.index()]
    }

    pub fn list_personas(&self) -> &[Persona] {
        &self.personas
    }
}
