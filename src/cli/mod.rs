//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod model_list;
pub mod persona_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::auth::AuthManager;
use crate::cli::chat::run_chat;
use crate::cli::model_list::list_models;
use crate::cli::persona_list::list_personas;
use crate::cli::say::run_say;
use crate::cli::settings::run_setting;
use crate::core::config::{path_display, Config, ConfigError};
use crate::core::credentials::{resolve_api_key, SystemCredentialSource};
use crate::core::persona::{PersonaId, PersonaRegistry, UnknownPersona};
use crate::core::provider::{ChatProvider, GeminiProvider};
use crate::core::resolver::ModelResolver;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    " (",
    env!("VERGEN_GIT_BRANCH"),
    ")\nbuilt: ",
    env!("VERGEN_BUILD_DATE"),
    "\nrustc: ",
    env!("VERGEN_RUSTC_SEMVER"),
);

#[derive(Parser)]
#[command(name = "sarangbang")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal family chat room backed by Gemini")]
#[command(
    long_about = "Sarangbang is a line-oriented chat room where you talk with one of a few \
fixed personas: a partner or members of a family. Replies come from a hosted Gemini model; \
the model is picked automatically from the ones your key can use.\n\n\
Authentication:\n\
  Use 'sarangbang auth' to store your Gemini API key in the system keyring.\n\n\
Environment Variables:\n\
  SARANGBANG_API_KEY  Your Gemini API key (GEMINI_API_KEY is also accepted)\n\
  RUST_LOG            Diagnostic log filter (default: warn)\n\n\
Commands inside a chat:\n\
  /persona <id>       Switch persona (starts a fresh conversation)\n\
  /personas           List personas\n\
  /export [file]      Save the conversation as an HTML page\n\
  /log [filename]     Enable or toggle the transcript log\n\
  /help               Show commands\n\
  /quit               Say goodbye (typing the exit phrase works too)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Persona to talk to (primary, family-father, family-mother, family-sibling)
    #[arg(short = 'P', long, global = true, value_name = "PERSONA")]
    pub persona: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat room (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List models the key can generate with and show which one is picked
    Models,
    /// List personas
    Personas,
    /// Print the effective configuration
    Config,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored API key
    Deauth,
}

/// Long-lived collaborators shared by every command that talks to the model.
pub struct Services {
    pub config: Config,
    pub provider: Arc<dyn ChatProvider>,
    pub resolver: Arc<ModelResolver>,
    pub personas: Arc<PersonaRegistry>,
}

impl Services {
    pub fn new(config: Config, provider: Arc<dyn ChatProvider>) -> Self {
        let resolver = Arc::new(ModelResolver::from_config(provider.clone(), &config));
        let personas = Arc::new(PersonaRegistry::with_overrides(&config));
        Self {
            config,
            provider,
            resolver,
            personas,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            if let Err(e) = AuthManager::new().interactive_auth() {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            if let Err(e) = AuthManager::new().interactive_deauth() {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config => {
            let config = load_config_or_exit(args.config.as_deref());
            match args.config.clone().or_else(Config::get_config_path) {
                Some(path) => println!("Config file: {}", path_display(path)),
                None => println!("Config file: (no config directory available)"),
            }
            config.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            let value = value.join(" ");
            run_setting(args.config.as_deref(), &key, Some(value.as_str()))
        }
        Commands::Unset { key } => run_setting(args.config.as_deref(), &key, None),
        Commands::Personas => {
            let config = load_config_or_exit(args.config.as_deref());
            let selected = persona_or_exit(args.persona.as_deref(), &config);
            list_personas(&PersonaRegistry::with_overrides(&config), Some(selected));
            Ok(())
        }
        Commands::Models => {
            let services = connect_or_exit(args.config.as_deref())?;
            list_models(&services).await
        }
        Commands::Say { prompt } => {
            let services = connect_or_exit(args.config.as_deref())?;
            let persona = persona_or_exit(args.persona.as_deref(), &services.config);
            run_say(services, persona, prompt).await
        }
        Commands::Chat => {
            let services = connect_or_exit(args.config.as_deref())?;
            let persona = persona_or_exit(args.persona.as_deref(), &services.config);
            run_chat(services, persona, args.log).await
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn exit_with_config_error(err: &ConfigError) -> ! {
    eprintln!("{err}");
    let fixes = err.quick_fixes();
    if !fixes.is_empty() {
        eprintln!();
        eprintln!("💡 Quick fixes:");
        for fix in fixes {
            eprintln!("  • {fix}");
        }
    }
    std::process::exit(err.exit_code());
}

fn load_config_or_exit(path: Option<&Path>) -> Config {
    load_config(path).unwrap_or_else(|err| exit_with_config_error(&err))
}

/// Load config, resolve the API key and build the Gemini client.
fn connect_or_exit(path: Option<&Path>) -> Result<Services, Box<dyn Error>> {
    let config = load_config_or_exit(path);
    let api_key = resolve_api_key(&SystemCredentialSource, &config)
        .unwrap_or_else(|err| exit_with_config_error(&err));

    let provider = GeminiProvider::from_config(&config, api_key)?;
    Ok(Services::new(config, Arc::new(provider)))
}

/// `--persona` wins over `default_persona` from config; primary otherwise.
pub fn initial_persona(flag: Option<&str>, config: &Config) -> Result<PersonaId, UnknownPersona> {
    match flag.or(config.default_persona.as_deref()) {
        Some(name) => name.parse(),
        None => Ok(PersonaId::Primary),
    }
}

fn persona_or_exit(flag: Option<&str>, config: &Config) -> PersonaId {
    initial_persona(flag, config).unwrap_or_else(|err| {
        eprintln!("❌ {err}");
        std::process::exit(1);
    })
}
