//! Session Store - One ledger per dashboard session
//!
//! Ledgers are owned by the server state and looked up by session id,
//! so two browsers never see each other's scenarios. The number of live
//! sessions is bounded: when full, the least recently used idle session
//! without scenarios is dropped first, then the least recently used idle
//! one. Sessions held by an in-flight request are never dropped.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{DashboardError, Result};
use crate::ledger::{ScenarioLedger, SharedLedger};
use crate::scenario::MetricMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Ledgers plus their use order, least recently used at the front
struct SessionMap {
    ledgers: HashMap<SessionId, SharedLedger>,
    order: VecDeque<SessionId>,
}

impl SessionMap {
    fn touch(&mut self, id: SessionId) {
        if let Some(pos) = self.order.iter().position(|s| *s == id) {
            self.order.remove(pos);
            self.order.push_back(id);
        }
    }

    fn remove(&mut self, id: SessionId) {
        self.ledgers.remove(&id);
        self.order.retain(|s| *s != id);
    }

    /// Least recently used idle session, preferring ones without scenarios.
    ///
    /// A ledger still referenced outside the map belongs to an in-flight
    /// request and is never a candidate.
    fn eviction_candidate(&self) -> Option<SessionId> {
        let idle = self.order.iter().filter_map(|id| {
            let ledger = self.ledgers.get(id)?;
            if Arc::strong_count(ledger) > 1 {
                return None;
            }
            let empty = ledger.try_lock().map(|l| l.is_empty()).unwrap_or(false);
            Some((*id, empty))
        });

        let mut fallback = None;
        for (id, empty) in idle {
            if empty {
                return Some(id);
            }
            fallback.get_or_insert(id);
        }
        fallback
    }
}

pub struct SessionStore {
    sessions: Mutex<SessionMap>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(SessionMap {
                ledgers: HashMap::new(),
                order: VecDeque::new(),
            }),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Open a new session with an empty ledger
    pub async fn create(&self, mode: MetricMode) -> SessionId {
        let id = SessionId::new();
        let mut sessions = self.sessions.lock().await;

        while sessions.order.len() >= self.max_sessions {
            match sessions.eviction_candidate() {
                Some(victim) => {
                    sessions.remove(victim);
                    warn!("Session limit {} reached, evicted {}", self.max_sessions, victim);
                }
                None => {
                    warn!(
                        "Session limit {} reached but every session is in use, growing to {}",
                        self.max_sessions,
                        sessions.order.len() + 1
                    );
                    break;
                }
            }
        }

        sessions
            .ledgers
            .insert(id, ScenarioLedger::new(mode).into_shared());
        sessions.order.push_back(id);
        info!("Opened session {} ({} mode)", id, mode);
        id
    }

    /// Look up a session's ledger and mark it as most recently used
    pub async fn get(&self, id: SessionId) -> Result<SharedLedger> {
        let mut sessions = self.sessions.lock().await;
        let ledger = sessions
            .ledgers
            .get(&id)
            .cloned()
            .ok_or(DashboardError::UnknownSession(id))?;
        sessions.touch(id);
        Ok(ledger)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.ledgers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(1024)
    }
}
