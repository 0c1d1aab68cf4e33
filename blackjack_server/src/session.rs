//! Per-session tables. Each session owns its own `Game` behind its own lock, so players on
//! different sessions never see each other's cards.

use crate::error::UserError;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use blackjack_lib::{Game, GameConfig};
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Header a client uses to pick its table.
pub const SESSION_HEADER: &str = "x-session-id";

/// Session used by requests that do not name one. All such callers share a single table.
pub const DEFAULT_SESSION: &str = "default";

/// The session a request belongs to, taken from the `X-Session-Id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for SessionId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_SESSION);
        ready(Ok(SessionId(id.to_string())))
    }
}

/// Sessions kept open at once unless the server is told otherwise.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct Table {
    game: Arc<Mutex<Game>>,
    last_used: u64,
}

/// Struct that hands out the table for a session, creating it on first use. Holds at most
/// `max_sessions` tables, the one used longest ago is closed to make room for a new one.
pub struct SessionStore {
    config: GameConfig,
    max_sessions: usize,
    clock: AtomicU64,
    tables: Mutex<HashMap<String, Table>>,
}

impl SessionStore {
    /// New sessions get a table built from `config`.
    pub fn new(config: GameConfig) -> Self {
        SessionStore::with_max_sessions(config, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_max_sessions(config: GameConfig, max_sessions: usize) -> Self {
        SessionStore {
            config,
            max_sessions: max_sessions.max(1),
            clock: AtomicU64::new(0),
            tables: Mutex::new(HashMap::new()),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn lock_tables(&self) -> Result<MutexGuard<'_, HashMap<String, Table>>, UserError> {
        self.tables.lock().map_err(|_| UserError::InternalError)
    }

    /// Returns the table for `session`, opening one if needed. The store lock is only held long
    /// enough to look the table up.
    pub fn game(&self, session: &SessionId) -> Result<Arc<Mutex<Game>>, UserError> {
        let now = self.tick();
        let mut tables = self.lock_tables()?;
        if let Some(table) = tables.get_mut(session.as_str()) {
            table.last_used = now;
            return Ok(Arc::clone(&table.game));
        }

        if tables.len() >= self.max_sessions {
            let oldest = tables
                .iter()
                .min_by_key(|(_, table)| table.last_used)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                tables.remove(&id);
                info!(session = %id, "closing idle table");
            }
        }

        info!(session = %session.as_str(), "opening table");
        let game = Arc::new(Mutex::new(Game::new(self.config)));
        tables.insert(
            session.0.clone(),
            Table {
                game: Arc::clone(&game),
                last_used: now,
            },
        );
        Ok(game)
    }

    /// Returns the table for `session` only if one is already open.
    pub fn existing(&self, session: &SessionId) -> Result<Option<Arc<Mutex<Game>>>, UserError> {
        let now = self.tick();
        let mut tables = self.lock_tables()?;
        Ok(tables.get_mut(session.as_str()).map(|table| {
            table.last_used = now;
            Arc::clone(&table.game)
        }))
    }

    /// Number of sessions with a table.
    pub fn session_count(&self) -> Result<usize, UserError> {
        Ok(self.lock_tables()?.len())
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
