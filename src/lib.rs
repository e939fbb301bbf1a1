//! Financial Assistant
//!
//! A small question-answering backend for investing in India:
//! - Loads an immutable catalog of investment products at startup
//! - Filters products by risk level and investment ceiling
//! - Asks Gemini for advice with the full catalog embedded in the prompt
//! - Supports single-shot asks and in-memory multi-turn chat sessions
//!
//! Transports (HTTP in `api`, terminal chat in `terminal`) share one
//! `AdvisorGateway` and map its typed errors to user-facing messages.

pub mod advisor;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gemini;
pub mod memory;
pub mod models;
pub mod prompts;
pub mod terminal;

pub use error::{AssistantError, Result};

// Re-export common types
pub use advisor::AdvisorGateway;
pub use catalog::Catalog;
pub use models::*;
