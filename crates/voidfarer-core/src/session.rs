//! Keyed collection of independent game sessions with idle eviction.
//!
//! Locking is sharded per session: the store's own lock is held only
//! long enough to look up or insert the `Arc<Mutex<GameSession>>`, so
//! concurrent requests against different sessions never serialize
//! against each other. Requests against the same session do, which is
//! exactly the atomicity the turn engine needs.
//!
//! Eviction takes the per-session lock before removing, so a sweep can
//! never race an in-flight action on the same session.

use crate::catalog::{Catalog, CatalogError};
use crate::config::GameConfig;
use crate::engine::{self, Action};
use crate::event::{ActionOutcome, EventKind};
use crate::ship::{self, EffectiveStats};
use crate::state::{GameState, PlayerState};
use serde::Serialize;
use slotmap::Key;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session limit reached ({0})")]
    LimitReached(usize),
    #[error("session lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One player's game plus its activity bookkeeping.
#[derive(Debug)]
pub struct GameSession {
    pub id: String,
    pub state: GameState,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl GameSession {
    fn new(id: String, state: GameState) -> Self {
        let now = Instant::now();
        Self {
            id,
            state,
            created_at: now,
            last_activity: now,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A node adjacent to the player's location, as the UI sees it.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborView {
    pub key: u64,
    pub name: String,
    pub kind: crate::starmap::NodeKind,
    pub discovered: bool,
}

/// A region reachable from the player's current region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionLink {
    pub key: u64,
    pub name: String,
    pub discovered: bool,
}

/// Where the player currently is.
#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    pub region_key: u64,
    pub region_name: String,
    pub node_key: u64,
    pub node_name: String,
    pub has_repair: bool,
    pub has_trade: bool,
    pub neighbors: Vec<NeighborView>,
    pub connected_regions: Vec<RegionLink>,
}

/// The state snapshot returned with every dispatch, ready for a
/// transport to serialize. Rendering is entirely the caller's job.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub player: PlayerState,
    pub effective: EffectiveStats,
    pub location: LocationView,
    pub max_turns: u32,
}

fn snapshot(catalog: &Catalog, session: &GameSession) -> Result<SessionSnapshot, CatalogError> {
    let state = &session.state;
    let node = state.map.current_node();
    let region = state.map.current_region();

    let neighbors = node
        .connections
        .iter()
        .filter_map(|&key| {
            state.map.node(key).map(|n| NeighborView {
                key: key.data().as_ffi(),
                name: if n.discovered { n.name.clone() } else { "Unknown".to_string() },
                kind: n.kind,
                discovered: n.discovered,
            })
        })
        .collect();

    let connected_regions = region
        .connections
        .iter()
        .filter_map(|&key| {
            state.map.region(key).map(|r| RegionLink {
                key: key.data().as_ffi(),
                name: r.name.clone(),
                discovered: state.map.discovered_regions.contains(&key),
            })
        })
        .collect();

    Ok(SessionSnapshot {
        session_id: session.id.clone(),
        player: state.player.clone(),
        effective: ship::effective_stats(catalog, &state.player)?,
        location: LocationView {
            region_key: state.map.current_region.data().as_ffi(),
            region_name: region.name.clone(),
            node_key: state.map.current_node.data().as_ffi(),
            node_name: node.name.clone(),
            has_repair: node.has_repair,
            has_trade: node.has_trade,
            neighbors,
            connected_regions,
        },
        max_turns: state.config.max_turns,
    })
}

/// The transport-boundary reply tuple: human-readable message, event
/// tag, follow-up choices, success flag, and the updated snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub message: String,
    pub kind: EventKind,
    pub choices: Vec<String>,
    pub success: bool,
    pub snapshot: SessionSnapshot,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

const DEFAULT_MAX_SESSIONS: usize = 100;
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Keyed collection of independent game sessions.
pub struct SessionStore {
    catalog: Arc<Catalog>,
    config: GameConfig,
    sessions: Mutex<HashMap<String, Arc<Mutex<GameSession>>>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(catalog: Arc<Catalog>, config: GameConfig) -> Self {
        Self {
            catalog,
            config,
            sessions: Mutex::new(HashMap::new()),
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_limits(mut self, max_sessions: usize, idle_timeout: Duration) -> Self {
        self.max_sessions = max_sessions;
        self.idle_timeout = idle_timeout;
        self
    }

    /// Create a session, or return the existing one unless `force_new`.
    ///
    /// With no explicit seed, one is drawn from the wall clock.
    pub fn create(
        &self,
        session_id: &str,
        seed: Option<u64>,
        force_new: bool,
    ) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;

        if !force_new {
            if let Some(existing) = sessions.get(session_id) {
                return Ok(Arc::clone(existing));
            }
        }

        if sessions.len() >= self.max_sessions {
            drop(sessions);
            self.evict_idle()?;
            sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
            if sessions.len() >= self.max_sessions && !sessions.contains_key(session_id) {
                return Err(SessionError::LimitReached(self.max_sessions));
            }
        }

        let seed = seed.unwrap_or_else(ambient_seed);
        let state = GameState::new(&self.catalog, self.config.clone(), seed)?;
        let session = Arc::new(Mutex::new(GameSession::new(session_id.to_string(), state)));
        sessions.insert(session_id.to_string(), Arc::clone(&session));
        log::info!("session created: {session_id} (seed {seed})");
        Ok(session)
    }

    pub fn get(&self, session_id: &str) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    pub fn remove(&self, session_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        if sessions.remove(session_id).is_some() {
            log::info!("session removed: {session_id}");
        }
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Sweep out sessions idle past the timeout.
    ///
    /// Each candidate's own lock is taken (non-blocking) before removal;
    /// a session busy with an in-flight action is by definition active
    /// and is skipped.
    pub fn evict_idle(&self) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        let mut stale = Vec::new();
        for (id, session) in sessions.iter() {
            if let Ok(guard) = session.try_lock() {
                if guard.last_activity.elapsed() > self.idle_timeout {
                    stale.push(id.clone());
                }
            }
        }
        for id in &stale {
            sessions.remove(id);
            log::info!("session evicted (idle): {id}");
        }
        Ok(stale.len())
    }

    /// Resolve one transport request against a session.
    ///
    /// Unknown actions and malformed parameters come back as structured
    /// error results, not errors; a panicking handler is contained at
    /// this boundary and surfaced as a generic error event without
    /// tearing down the session.
    pub fn dispatch(
        &self,
        session_id: &str,
        action_name: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<DispatchResult, SessionError> {
        let session = self.get(session_id)?;
        let mut guard = session.lock().map_err(|_| SessionError::Poisoned)?;
        guard.touch();

        let outcome = match Action::parse(&self.catalog, action_name, params) {
            Ok(action) => {
                let catalog = &self.catalog;
                let state = &mut guard.state;
                panic::catch_unwind(AssertUnwindSafe(|| engine::process(catalog, state, &action)))
                    .unwrap_or_else(|_| {
                        log::error!("action handler panicked: session={session_id} action={action_name}");
                        ActionOutcome::error("Internal error while processing the action.")
                    })
            }
            Err(err) => ActionOutcome::error(err.to_string()),
        };

        let snapshot = snapshot(&self.catalog, &guard)?;
        Ok(DispatchResult {
            message: outcome.message,
            kind: outcome.kind,
            choices: outcome.choices,
            success: outcome.success,
            snapshot,
        })
    }
}

/// A seed drawn from the wall clock, for sessions without an explicit one.
fn ambient_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

// ===========================================================================
// Tests
// ===========================================================================
