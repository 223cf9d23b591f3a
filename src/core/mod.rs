pub mod config;
pub mod credentials;
pub mod keyring;
pub mod message;
pub mod persona;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod transcript;
