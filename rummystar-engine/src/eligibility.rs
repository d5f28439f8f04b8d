//! Join / re-join gating against the compel point.
use thiserror::Error;

use crate::player::Player;
use crate::rounds::RoundRecord;
use crate::scoring;
use crate::thresholds::Thresholds;

/// Why a candidate could not be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryDenied {
    #[error("entry is globally prohibited after an earlier compel-point breach")]
    GlobalLatch,
    #[error("highest active total ({floor}) is at or above the compel point")]
    ThresholdBreached { floor: i32 },
}

impl EntryDenied {
    /// Whether this denial raises the one-way global prohibition latch.
    #[must_use]
    pub const fn raises_latch(&self) -> bool {
        matches!(self, Self::ThresholdBreached { .. })
    }
}

/// Highest total among active (checked, not out) players, skipping
/// `exclude`. Zero when nobody is active: a fresh table has no re-entry
/// floor. A joining player starts from this floor rather than zero, so they
/// cannot trivially out-run the surviving field.
#[must_use]
pub fn reentry_floor(players: &[Player], ledger: &[RoundRecord], exclude: Option<&str>) -> i32 {
    players
        .iter()
        .filter(|p| p.is_active() && exclude != Some(p.id.as_str()))
        .map(|p| scoring::total(p, ledger))
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Decide whether a candidate may be auto-activated at the given floor.
///
/// # Errors
///
/// `GlobalLatch` when the prohibition latch is set; `ThresholdBreached`
/// when the floor meets the compel point, in which case the caller must
/// raise the latch (see [`EntryDenied::raises_latch`]). On success the
/// caller seeds the candidate's override with the floor and stamps the
/// join index.
pub fn evaluate_entry(
    floor: i32,
    thresholds: &Thresholds,
    latched: bool,
) -> Result<i32, EntryDenied> {
    if latched {
        return Err(EntryDenied::GlobalLatch);
    }
    if floor >= thresholds.compel_point {
        return Err(EntryDenied::ThresholdBreached { floor });
    }
    Ok(floor)
}
