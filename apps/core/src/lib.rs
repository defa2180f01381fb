//! StudyBuddy core.
//!
//! Turns chat-completion output into what the student sees: bulleted chat
//! replies with follow-up suggestions, and rendered exam guides. Storage and
//! the completion service are injected by the caller.

pub mod actors;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, GenerationError};

#[cfg(test)]
mod tests;
