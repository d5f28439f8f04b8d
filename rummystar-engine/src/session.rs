//! Session aggregate root: the round ledger, roster transitions, and the
//! reconciliation pass keeping derived flags consistent.
//!
//! Every public mutation is a discrete, atomic transition: it either fully
//! validates and commits (ledger, totals, and flags together) or leaves the
//! session unchanged. The session is the unit of export/import and of
//! persistence; its wire format matches the original Rummy Star snapshots.
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_ROSTER, SCHEMA_VERSION};
use crate::eligibility::{self, EntryDenied};
use crate::player::Player;
use crate::rounds::{self, RoundError, RoundRecord};
use crate::scoring;
use crate::status::{self, SurvivalStatus};
use crate::thresholds::{ThresholdError, Thresholds};

/// Cosmetic color theme carried in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Ocean,
    Midnight,
    Forest,
    Sunset,
}

/// Cosmetic history layout preference carried in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryViewMode {
    #[default]
    Standard,
    Grid,
}

/// Rejected ledger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("no recorded rounds to undo")]
    Empty,
}

/// Rejected roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("player name cannot be empty")]
    BlankName,
    #[error("player {id} does not exist")]
    UnknownPlayer { id: String },
    #[error("default player {id} cannot be deleted")]
    ProtectedPlayer { id: String },
}

/// Rejected session imports.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("session payload could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("session payload is missing a `{field}` list")]
    MissingField { field: &'static str },
}

/// Unified error for session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Entry(#[from] EntryDenied),
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Outcome of adding a player: the roster always gains the player, but the
/// eligibility gate may have refused to activate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedPlayer {
    pub id: String,
    pub activated: bool,
    pub denial: Option<EntryDenied>,
}

/// One row of the sorted standings consumed by external formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub id: String,
    pub name: String,
    pub total: i32,
    pub status: SurvivalStatus,
}

fn default_version() -> String {
    String::from(SCHEMA_VERSION)
}

fn default_round_counter() -> u32 {
    1
}

fn default_hide_default() -> bool {
    true
}

/// The aggregate session state: full player list, round ledger, counters,
/// flags, thresholds, and cosmetic preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(rename = "users", default)]
    players: Vec<Player>,
    #[serde(rename = "gameHistory", default)]
    ledger: Vec<RoundRecord>,
    #[serde(rename = "gameCounter", default = "default_round_counter")]
    round_counter: u32,
    #[serde(rename = "isRummyRound", default)]
    double_round: bool,
    #[serde(rename = "isEntryProhibitedGlobally", default)]
    entry_prohibited: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(rename = "hideDefaultUsers", default = "default_hide_default")]
    pub hide_default_users: bool,
    #[serde(flatten)]
    thresholds: Thresholds,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_view_mode: Option<HistoryViewMode>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            version: default_version(),
            players: Vec::new(),
            ledger: Vec::new(),
            round_counter: 1,
            double_round: false,
            entry_prohibited: false,
            theme: Theme::default(),
            hide_default_users: true,
            thresholds: Thresholds::default(),
            timestamp: String::new(),
            history_view_mode: None,
        }
    }
}

impl Session {
    /// Fresh session carrying the protected default roster.
    #[must_use]
    pub fn with_default_roster() -> Self {
        let mut session = Self::default();
        session.players = DEFAULT_ROSTER
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut player = Player::new((idx + 1).to_string(), *name);
                player.is_default = true;
                player
            })
            .collect();
        session
    }

    // ---- read-only views -------------------------------------------------

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players taking part in the current round.
    #[must_use]
    pub fn active_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_active()).collect()
    }

    #[must_use]
    pub fn ledger(&self) -> &[RoundRecord] {
        &self.ledger
    }

    #[must_use]
    pub const fn round_counter(&self) -> u32 {
        self.round_counter
    }

    #[must_use]
    pub const fn is_double_round(&self) -> bool {
        self.double_round
    }

    #[must_use]
    pub const fn is_entry_prohibited(&self) -> bool {
        self.entry_prohibited
    }

    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Cumulative total for a known player.
    #[must_use]
    pub fn total(&self, id: &str) -> Option<i32> {
        self.player(id).map(|p| scoring::total(p, &self.ledger))
    }

    /// Survival metrics for a known player.
    #[must_use]
    pub fn status_of(&self, id: &str) -> Option<SurvivalStatus> {
        self.total(id)
            .map(|total| status::classify(total, &self.thresholds))
    }

    /// Totals for every player appearing in the ledger or currently checked,
    /// sorted by descending total. This is the read-only output external
    /// formatters (summaries, sharing) consume.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let mut rows: Vec<Standing> = self
            .players
            .iter()
            .filter(|p| {
                p.is_checked || self.ledger.iter().any(|r| r.scores.contains_key(&p.id))
            })
            .map(|p| {
                let total = scoring::total(p, &self.ledger);
                Standing {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    total,
                    status: status::classify(total, &self.thresholds),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    // ---- roster transitions ----------------------------------------------

    /// Add a player, auto-activating them through the eligibility gate.
    ///
    /// The player joins the roster either way; when the gate refuses, they
    /// stay unchecked and the denial is reported for user-facing messaging.
    ///
    /// # Errors
    ///
    /// `RosterError::BlankName` when the trimmed name is empty.
    pub fn add_player(&mut self, name: &str) -> Result<AddedPlayer, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::BlankName.into());
        }
        let floor = eligibility::reentry_floor(&self.players, &self.ledger, None);
        let gate = eligibility::evaluate_entry(floor, &self.thresholds, self.entry_prohibited);
        let id = self.allocate_id();
        let mut player = Player::new(id.clone(), name);
        player.joined_at = Some(self.ledger.len());
        let outcome = match gate {
            Ok(seed) => {
                player.is_checked = true;
                // A fresh table seeds at zero even if overrides linger.
                player.total_override = Some(if self.ledger.is_empty() { 0 } else { seed });
                info!("player {id} ({name}) joined at floor {seed}");
                AddedPlayer {
                    id,
                    activated: true,
                    denial: None,
                }
            }
            Err(denial) => {
                if denial.raises_latch() {
                    self.raise_latch();
                }
                warn!("player {id} ({name}) added without activation: {denial}");
                AddedPlayer {
                    id,
                    activated: false,
                    denial: Some(denial),
                }
            }
        };
        self.players.push(player);
        Ok(outcome)
    }

    /// Rename an existing player.
    ///
    /// # Errors
    ///
    /// `BlankName` or `UnknownPlayer`.
    pub fn rename_player(&mut self, id: &str, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::BlankName.into());
        }
        let player = self.player_mut(id)?;
        player.name = name.to_string();
        Ok(())
    }

    /// Remove a player from the roster. Default players are protected.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` or `ProtectedPlayer`.
    pub fn delete_player(&mut self, id: &str) -> Result<(), SessionError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RosterError::UnknownPlayer { id: id.to_string() })?;
        if self.players[idx].is_default {
            return Err(RosterError::ProtectedPlayer { id: id.to_string() }.into());
        }
        self.players.remove(idx);
        Ok(())
    }

    /// Toggle a player's participation.
    ///
    /// Unchecking clears the pending score and the override seed. Checking
    /// runs the eligibility gate against the other active players' floor and
    /// seeds the re-entry. Returns whether the player is now checked.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer`, or the gate's `EntryDenied` (which leaves the player
    /// untouched but may raise the global latch).
    pub fn toggle_player(&mut self, id: &str) -> Result<bool, SessionError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RosterError::UnknownPlayer { id: id.to_string() })?;
        if self.players[idx].is_checked {
            let player = &mut self.players[idx];
            player.is_checked = false;
            player.score = None;
            player.total_override = None;
            return Ok(false);
        }
        let floor = eligibility::reentry_floor(&self.players, &self.ledger, Some(id));
        match eligibility::evaluate_entry(floor, &self.thresholds, self.entry_prohibited) {
            Ok(seed) => {
                let joined = self.ledger.len();
                let player = &mut self.players[idx];
                player.is_checked = true;
                player.score = None;
                player.is_out = false;
                player.total_override = Some(seed);
                player.joined_at = Some(joined);
                info!("player {id} re-entered at floor {seed}");
                Ok(true)
            }
            Err(denial) => {
                if denial.raises_latch() {
                    self.raise_latch();
                }
                Err(denial.into())
            }
        }
    }

    // ---- round transitions -----------------------------------------------

    /// Record a pending score for the in-progress round, then re-run winner
    /// inference. Returns the inferred winner's id when one was assigned.
    ///
    /// # Errors
    ///
    /// `RosterError::UnknownPlayer`.
    pub fn set_score(
        &mut self,
        id: &str,
        score: Option<i32>,
    ) -> Result<Option<String>, SessionError> {
        let player = self.player_mut(id)?;
        player.score = score;
        Ok(rounds::infer_winner(&mut self.players))
    }

    /// Flag (or unflag) the next round as a double round. The flag applies
    /// to one round only and clears on commit.
    pub fn set_double_round(&mut self, double_round: bool) {
        self.double_round = double_round;
    }

    /// Validate and commit the in-progress round, returning its label.
    ///
    /// On success the ledger gains one record, the round counter increments,
    /// pending scores of checked players clear, the double-round flag
    /// resets, and every player's elimination state is reconciled.
    ///
    /// # Errors
    ///
    /// The validator's `RoundError`; nothing changes on failure.
    pub fn commit_round(&mut self) -> Result<String, SessionError> {
        let active: Vec<&Player> = self.players.iter().filter(|p| p.is_active()).collect();
        let scores = rounds::validate(&active, self.double_round)?;
        let name = format!("Game {}", self.round_counter);
        info!("committing {name} with {} players", scores.len());
        self.ledger.push(RoundRecord {
            name: name.clone(),
            scores,
        });
        self.round_counter += 1;
        for player in &mut self.players {
            if player.is_checked {
                player.score = None;
            }
        }
        self.double_round = false;
        self.reconcile();
        Ok(name)
    }

    /// Undo the most recently committed round.
    ///
    /// Players whose join index lies beyond the truncated history are reset
    /// to spectators and must re-enter explicitly. The global prohibition is
    /// recomputed from the remaining checked, non-out players.
    ///
    /// # Errors
    ///
    /// `LedgerError::Empty` when no rounds are recorded; nothing changes.
    pub fn undo_last(&mut self) -> Result<RoundRecord, SessionError> {
        let Some(record) = self.ledger.pop() else {
            return Err(LedgerError::Empty.into());
        };
        self.round_counter = self.round_counter.saturating_sub(1);
        let remaining = self.ledger.len();
        for player in &mut self.players {
            if player.joined_index() >= remaining {
                player.is_checked = false;
                player.score = None;
                player.total_override = None;
                player.is_out = false;
            }
        }
        // The rescan reads the flags as they stand, before reconciliation;
        // players unchecked by the reset above no longer hold the latch.
        self.entry_prohibited = self
            .players
            .iter()
            .filter(|p| p.is_active())
            .any(|p| scoring::total(p, &self.ledger) >= self.thresholds.compel_point);
        self.reconcile();
        info!("undid {}; {} rounds remain", record.name, remaining);
        Ok(record)
    }

    // ---- threshold transitions -------------------------------------------

    /// Set the out limit (holds the scoot point) and reconcile.
    pub fn set_out_limit(&mut self, value: i32) {
        self.thresholds.set_out_limit(value);
        self.reconcile();
    }

    /// Set the compel point (holds the scoot point) and reconcile.
    pub fn set_compel_point(&mut self, value: i32) {
        self.thresholds.set_compel_point(value);
        self.reconcile();
    }

    /// Set the scoot point (holds the out limit) and reconcile.
    ///
    /// # Errors
    ///
    /// `ThresholdError::NonPositiveScootPoint`.
    pub fn set_scoot_point(&mut self, value: i32) -> Result<(), SessionError> {
        self.thresholds.set_scoot_point(value)?;
        self.reconcile();
        Ok(())
    }

    // ---- whole-session operations ----------------------------------------

    /// Reset to a fresh tournament: non-default players dropped, default
    /// players back to a clean slate, ledger cleared, thresholds and
    /// cosmetics restored.
    pub fn reset(&mut self) {
        self.players.retain(|p| p.is_default);
        for player in &mut self.players {
            player.is_checked = false;
            player.score = None;
            player.is_out = false;
            player.total_override = None;
            player.joined_at = Some(0);
        }
        self.ledger.clear();
        self.round_counter = 1;
        self.double_round = false;
        self.entry_prohibited = false;
        self.thresholds = Thresholds::default();
        self.theme = Theme::default();
        self.hide_default_users = true;
        self.history_view_mode = None;
        info!("session reset");
    }

    /// Serialize the whole session, refreshing the timestamp.
    ///
    /// # Errors
    ///
    /// Passes through `serde_json` serialization failures.
    pub fn to_json(&mut self) -> Result<String, serde_json::Error> {
        self.timestamp = Utc::now().to_rfc3339();
        serde_json::to_string_pretty(self)
    }

    /// Rebuild a session from an exported payload, fully replacing state.
    ///
    /// Validation is deliberately minimal: the payload must carry `users`
    /// and `gameHistory` lists. Missing optional fields are normalized to
    /// defaults; deeper value validation is not performed. Elimination
    /// flags are reconciled against the imported ledger, so stale flags
    /// in the payload do not survive.
    ///
    /// # Errors
    ///
    /// `ImportError` when the payload is not JSON or lacks either list.
    pub fn from_json(payload: &str) -> Result<Self, ImportError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        for field in ["users", "gameHistory"] {
            if !value.get(field).is_some_and(serde_json::Value::is_array) {
                return Err(ImportError::MissingField { field });
            }
        }
        let mut session: Self = serde_json::from_value(value)?;
        session.normalize();
        session.reconcile();
        Ok(session)
    }

    // ---- internals -------------------------------------------------------

    /// Recompute every player's elimination state from the ledger. Run after
    /// any ledger or threshold mutation. Transition into OUT clears the
    /// check mark and pending score; transition out of OUT clears only the
    /// flag and never auto-rechecks.
    fn reconcile(&mut self) {
        for player in &mut self.players {
            let total = scoring::total(player, &self.ledger);
            let now_out = total > self.thresholds.out_limit;
            if now_out && player.is_checked {
                player.is_checked = false;
                player.score = None;
                player.is_out = true;
                debug!("player {} eliminated at {total}", player.id);
            } else if !now_out && player.is_out {
                player.is_out = false;
            } else {
                player.is_out = now_out;
            }
        }
    }

    fn raise_latch(&mut self) {
        if !self.entry_prohibited {
            self.entry_prohibited = true;
            info!("global entry prohibition latched");
        }
    }

    fn player_mut(&mut self, id: &str) -> Result<&mut Player, RosterError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RosterError::UnknownPlayer { id: id.to_string() })
    }

    /// Next unused numeric id; imported non-numeric ids are skipped.
    fn allocate_id(&self) -> String {
        let next = self
            .players
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        next.to_string()
    }

    /// Defaulting pass for externally supplied sessions.
    fn normalize(&mut self) {
        for player in &mut self.players {
            if player.joined_at.is_none() {
                player.joined_at = Some(0);
            }
        }
    }
}
