//! Conversation memory
//!
//! Session transcripts for the multi-turn variant and the in-memory store that
//! keeps them for the lifetime of the process.

pub mod session;
pub mod store;

pub use session::{ChatSession, Role, Turn};
pub use store::{resolve_session_id, SessionStore, SharedSession, DEFAULT_MAX_SESSIONS};
