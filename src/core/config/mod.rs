pub mod data;
pub mod defaults;
pub mod error;
pub mod io;
pub mod printing;

pub use data::{path_display, Config, PersonaOverride};
pub use error::ConfigError;

#[cfg(test)]
mod tests;
