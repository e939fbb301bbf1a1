//! In-memory session store for the HTTP chat surface
//!
//! Sessions are created lazily per chat id and dropped on reset, on eviction,
//! or at process exit. Each session sits behind its own mutex so concurrent
//! asks on the same chat are serialized while different chats proceed
//! independently.
//!
//! The store holds at most `max_sessions` chats. Creating one more evicts the
//! least recently used chat; a caller still holding that session finishes
//! normally, but the chat id starts over on its next message.

use crate::memory::session::ChatSession;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<ChatSession>>;

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

struct Entry {
    session: SharedSession,
    last_used: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, Entry>,
    clock: u64,
}

impl Sessions {
    fn touch(&mut self, session_id: Uuid) -> Option<SharedSession> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(&session_id).map(|entry| {
            entry.last_used = clock;
            entry.session.clone()
        })
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| *id);

        if let Some(id) = oldest {
            self.entries.remove(&id);
            info!(session_id = %id, "Evicted least recently used chat session");
        }
    }
}

pub struct SessionStore {
    sessions: RwLock<Sessions>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cap of zero is treated as one.
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Look up a chat and mark it as recently used.
    pub async fn get(&self, session_id: Uuid) -> Option<SharedSession> {
        self.sessions.write().await.touch(session_id)
    }

    pub async fn get_or_create(&self, session_id: Uuid) -> SharedSession {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.touch(session_id) {
            return session;
        }

        if sessions.entries.len() >= self.max_sessions {
            sessions.evict_least_recent();
        }

        info!(%session_id, "Creating chat session");
        let session = Arc::new(Mutex::new(ChatSession::with_id(session_id)));
        let last_used = sessions.clock;
        sessions.entries.insert(
            session_id,
            Entry {
                session: session.clone(),
                last_used,
            },
        );
        session
    }

    /// Returns true if a session was removed.
    pub async fn reset(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.entries.remove(&session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }
}

fn stable_uuid_from_string(input: &str) -> Uuid {
    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Parse a caller-supplied chat id. Non-UUID ids map to a stable UUID;
/// a missing or blank id gets a fresh one.
pub fn resolve_session_id(value: Option<&str>) -> Uuid {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Uuid::parse_str(v.trim()).unwrap_or_else(|_| stable_uuid_from_string(v.trim()))
        }
        _ => Uuid::new_v4(),
    }
}
