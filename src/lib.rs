//! Sarangbang is a terminal chat room for talking with a small cast of
//! personas through a hosted Gemini model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns credentials, configuration, model resolution, the persona
//!   registry, and the per-user conversation session state machine.
//! - [`api`] defines the Gemini REST payloads and the HTTP calls that carry them.
//! - [`ui`] renders chat bubbles for the terminal and exports transcripts as HTML.
//! - [`commands`] parses the slash commands understood by the chat REPL.
//! - [`auth`] stores and removes the API key in the system keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
