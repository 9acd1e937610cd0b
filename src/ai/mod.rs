//! Email generation via the Gemini API.
//!
//! Prompt construction, the HTTP client, response extraction, and the actor
//! that owns the observable busy/error state.

mod actor;
mod client;
mod error;
mod extract;
mod prompts;
#[cfg(test)]
pub(crate) mod testutil;

pub use actor::{GenerationCommand, GenerationEvent, GenerationHandle, spawn_generation_actor};
pub use client::GeminiClient;
pub use error::{GenerateError, NetworkErrorKind};
pub use extract::extract_generated_text;
pub use prompts::{build_system_instruction, build_user_prompt};
