//! Rummy Star scoring engine
//!
//! Platform-agnostic rules engine for a multiplayer elimination rummy
//! tournament: cumulative totals over a round ledger, elimination against a
//! configurable out limit, re-entry gating at the compel point, round
//! validation, and survival metrics. No UI or platform-specific
//! dependencies; presentation and storage are external collaborators.

pub mod constants;
pub mod eligibility;
pub mod player;
pub mod rounds;
pub mod scoring;
pub mod session;
pub mod status;
pub mod thresholds;

// Re-export commonly used types
pub use eligibility::{EntryDenied, evaluate_entry, reentry_floor};
pub use player::Player;
pub use rounds::{RoundError, RoundRecord, infer_winner, max_score};
pub use session::{
    AddedPlayer, HistoryViewMode, ImportError, LedgerError, RosterError, Session, SessionError,
    Standing, Theme,
};
pub use status::{StatusTier, SurvivalStatus, classify};
pub use thresholds::{ThresholdError, Thresholds};

/// Trait for abstracting snapshot persistence.
/// Platform-specific implementations should provide this.
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the persisted snapshot payload, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the persisted snapshot payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn save(&self, key: &str, payload: &str) -> Result<(), Self::Error>;
}

/// Engine façade binding a session to its snapshot store.
///
/// Loads the session at startup and persists a whole-snapshot overwrite
/// after every mutating transition; there are no partial writes.
pub struct ScoreKeeper<S: SessionStore> {
    store: S,
    key: String,
    session: Session,
}

impl<S: SessionStore> ScoreKeeper<S> {
    /// Open the keeper at the default storage key.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read or the stored
    /// snapshot cannot be imported.
    pub fn open(store: S) -> Result<Self, anyhow::Error> {
        Self::open_at(store, constants::STORAGE_KEY)
    }

    /// Open the keeper at a specific storage key, falling back to a fresh
    /// default-roster session when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read or the stored
    /// snapshot cannot be imported.
    pub fn open_at(store: S, key: &str) -> Result<Self, anyhow::Error> {
        let session = match store.load(key)? {
            Some(payload) => Session::from_json(&payload)?,
            None => Session::with_default_roster(),
        };
        Ok(Self {
            store,
            key: key.to_string(),
            session,
        })
    }

    /// Borrow the current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Apply a transition to the session and persist the resulting
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be serialized or saved;
    /// the transition's own outcome is passed through untouched.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> Result<R, anyhow::Error> {
        let outcome = f(&mut self.session);
        let payload = self.session.to_json()?;
        self.store.save(&self.key, &payload)?;
        Ok(outcome)
    }

    /// Replace the session wholesale from an exported payload and persist.
    ///
    /// # Errors
    ///
    /// Returns the import error without touching current state, or a
    /// persistence error after the replacement.
    pub fn import(&mut self, payload: &str) -> Result<(), anyhow::Error> {
        let session = Session::from_json(payload)?;
        self.session = session;
        let payload = self.session.to_json()?;
        self.store.save(&self.key, &payload)?;
        Ok(())
    }
}
