//! # Shared Server State
//!
//! File: cli/src/commands/srv/sessions.rs
//!
//! ## Overview
//!
//! `AppState` is what every request handler sees: the current dataset and one
//! conversation per browser session.
//!
//! The dataset is an `Arc<Dataset>` behind an `RwLock`. A request clones the
//! `Arc` and works on that snapshot, so an upload swaps the pointer without
//! disturbing a turn already in progress.
//!
//! ## Sessions
//!
//! The session map holds an `Arc<Mutex<Session>>` per id. The map lock is only
//! taken to look up, insert or prune entries; a dialogue turn locks just its
//! own session, so a slow turn never stalls other conversations.
//!
//! Sessions are never deleted by the client. Instead, every `create_session`
//! first drops sessions idle for longer than `SessionLimits::idle_ttl`, then
//! evicts the least recently used ones until there is room under
//! `SessionLimits::max_sessions`. A request for an evicted id gets
//! `StoreError::UnknownSession`.
//!
use crate::predictor::{
    ConversationState, Dataset, DatasetSummary, DialogueController, Step, Turn, VehicleLookup,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Idle time after which a session may be dropped (one hour).
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Most sessions kept at once.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown chat session '{0}'.")]
    UnknownSession(Uuid),

    #[error("Server state is unavailable: a previous request panicked while holding a lock.")]
    Poisoned,
}

/// Body of the reply to a posted message.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub reply: String,
    pub step: Step,
    pub turns: usize,
}

/// Bounds on the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: DEFAULT_IDLE_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug)]
struct Session {
    conversation: ConversationState,
    last_active: Instant,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self {
            conversation: ConversationState::new(),
            last_active: now,
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct AppState {
    dataset: Arc<RwLock<Arc<Dataset>>>,
    sessions: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
    limits: SessionLimits,
    title: Arc<str>,
}

impl AppState {
    pub fn new(dataset: Dataset, title: &str) -> Self {
        Self::with_limits(dataset, title, SessionLimits::default())
    }

    /// Like `new`, with explicit bounds on the session store.
    ///
    /// ## Arguments
    ///
    /// * `dataset`: The initial dataset shared by all sessions
    /// * `title`: Page title shown by the chat page
    /// * `limits`: Idle timeout and session cap applied on `create_session`
    ///
    /// ## Returns
    ///
    /// * `AppState`: Cheap to clone; clones share the same dataset and sessions
    pub fn with_limits(dataset: Dataset, title: &str, limits: SessionLimits) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(Arc::new(dataset))),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            limits,
            title: Arc::from(title),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Snapshot of the dataset currently in use.
    pub fn dataset(&self) -> Result<Arc<Dataset>, StoreError> {
        let guard = self.dataset.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Arc::clone(&guard))
    }

    /// Swaps in a new dataset for all sessions. Conversations keep their state.
    ///
    /// ## Arguments
    ///
    /// * `dataset`: The dataset that replaces the current one
    ///
    /// ## Returns
    ///
    /// * `Result<DatasetSummary, StoreError>`: Summary of the new dataset
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::Poisoned` if the dataset lock is poisoned.
    pub fn replace_dataset(&self, dataset: Dataset) -> Result<DatasetSummary, StoreError> {
        let summary = dataset.summary();
        let mut guard = self.dataset.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Arc::new(dataset);
        info!(
            "Dataset replaced by '{}' ({} records)",
            summary.source, summary.records
        );
        Ok(summary)
    }

    /// Starts a new conversation, pruning idle and excess sessions first.
    ///
    /// ## Returns
    ///
    /// * `Result<Uuid, StoreError>`: Id of the new session, in the `Greet` step
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::Poisoned` if the session map lock is poisoned.
    pub fn create_session(&self) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.lock_sessions()?;
        let pruned = prune_sessions(&mut sessions, &self.limits, now);
        sessions.insert(id, Arc::new(Mutex::new(Session::new(now))));
        debug!(
            "Created chat session {} ({} pruned, {} active)",
            id,
            pruned,
            sessions.len()
        );
        Ok(id)
    }

    /// Runs one dialogue turn for session `id`.
    ///
    /// Only the session's own lock is held while the turn runs.
    ///
    /// ## Arguments
    ///
    /// * `id`: The session to advance
    /// * `message`: The user's message, as typed
    ///
    /// ## Returns
    ///
    /// * `Result<TurnReply, StoreError>`: The reply, the new step and the transcript length
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::UnknownSession` if `id` was never created or has been
    /// pruned, and `StoreError::Poisoned` if a lock is poisoned.
    pub fn send(&self, id: Uuid, message: &str) -> Result<TurnReply, StoreError> {
        let dataset = self.dataset()?;
        let controller = DialogueController::new(VehicleLookup::new(&dataset));

        let handle = self.session(id)?;
        let mut session = handle.lock().map_err(|_| StoreError::Poisoned)?;
        let (next, reply) =
            controller.advance(std::mem::take(&mut session.conversation), message);
        session.conversation = next;
        session.touch();

        Ok(TurnReply {
            reply,
            step: session.conversation.step,
            turns: session.conversation.history.len(),
        })
    }

    pub fn history(&self, id: Uuid) -> Result<Vec<Turn>, StoreError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().map_err(|_| StoreError::Poisoned)?;
        session.touch();
        Ok(session.conversation.history.clone())
    }

    /// The clear action: back to the greeting with an empty transcript.
    pub fn clear(&self, id: Uuid) -> Result<(), StoreError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().map_err(|_| StoreError::Poisoned)?;
        session.conversation.reset();
        session.touch();
        debug!("Cleared chat session {}", id);
        Ok(())
    }

    /// Clones the handle for `id`, releasing the map lock before returning.
    fn session(&self, id: Uuid) -> Result<SessionHandle, StoreError> {
        let sessions = self.lock_sessions()?;
        sessions
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownSession(id))
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, SessionHandle>>, StoreError> {
        self.sessions.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Drops idle sessions, then the least recently used ones until one more fits.
///
/// A session whose lock is held right now is in use and never counts as idle.
/// A poisoned session is dropped.
///
/// ## Returns
///
/// * `usize`: How many sessions were removed
fn prune_sessions(
    sessions: &mut HashMap<Uuid, SessionHandle>,
    limits: &SessionLimits,
    now: Instant,
) -> usize {
    let before = sessions.len();
    let mut last_seen: Vec<(Uuid, Instant)> = Vec::with_capacity(before);

    sessions.retain(|id, handle| match handle.try_lock() {
        Ok(session) => {
            if now.saturating_duration_since(session.last_active) > limits.idle_ttl {
                return false;
            }
            last_seen.push((*id, session.last_active));
            true
        }
        Err(TryLockError::WouldBlock) => {
            last_seen.push((*id, now));
            true
        }
        Err(TryLockError::Poisoned(_)) => false,
    });

    let max = limits.max_sessions.max(1);
    if sessions.len() >= max {
        last_seen.sort_by_key(|(_, at)| *at);
        let excess = sessions.len() + 1 - max;
        for (id, _) in last_seen.into_iter().take(excess) {
            sessions.remove(&id);
        }
    }

    before - sessions.len()
}
