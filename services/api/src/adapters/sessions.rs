//! services/api/src/adapters/sessions.rs
//!
//! In-process store for admin dashboard sessions. Tokens are random UUIDs
//! mapped to their expiry; nothing is persisted, so a restart logs every
//! admin out. Expired entries are evicted lazily when they are next seen.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use feedback_core::{
    domain::AdminSession,
    ports::{PortError, PortResult, SessionStore},
};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SessionStore` with a mutex-guarded map.
///
/// The mutex is a plain `std::sync::Mutex`: it is only ever held for map
/// operations, never across an await point.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, AdminSession>>,
    expire_hours: i64,
}

impl InMemorySessionStore {
    /// Creates an empty store whose sessions live for `expire_hours`.
    pub fn new(expire_hours: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            expire_hours,
        }
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, AdminSession>>> {
        self.sessions
            .lock()
            .map_err(|_| PortError::Unexpected("session store mutex poisoned".to_string()))
    }

    #[cfg(test)]
    fn insert_raw(&self, session: AdminSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session);
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> PortResult<AdminSession> {
        let now = Utc::now();
        let session = AdminSession {
            token: Uuid::new_v4().to_string(),
            created_at: now,
            expires_at: now + Duration::hours(self.expire_hours),
        };
        self.lock()?
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn validate(&self, token: &str) -> PortResult<()> {
        let mut sessions = self.lock()?;
        match sessions.get(token) {
            Some(session) if session.is_expired(Utc::now()) => {
                sessions.remove(token);
                Err(PortError::Unauthorized(
                    "Token expired. Please log in again.".to_string(),
                ))
            }
            Some(_) => Ok(()),
            None => Err(PortError::Unauthorized(
                "Invalid or expired token. Please log in again.".to_string(),
            )),
        }
    }

    async fn revoke(&self, token: &str) -> PortResult<()> {
        self.lock()?.remove(token);
        Ok(())
    }

    async fn active_count(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .lock()
            .map(|sessions| {
                sessions
                    .values()
                    .filter(|session| !session.is_expired(now))
                    .count()
            })
            .unwrap_or(0)
    }
}
