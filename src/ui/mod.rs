//! Presentation for a plain terminal and for exported transcripts.
//!
//! - [`bubbles`]: width-aware chat bubbles printed by the REPL.
//! - [`html`]: a standalone light-mode HTML page of the transcript.

pub mod bubbles;
pub mod html;
