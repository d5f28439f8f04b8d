//! Threshold configuration with the two-way derivation rule.
//!
//! The three thresholds form a system with one free degree of freedom:
//! `compel_point = out_limit - scoot_point + 1`. Editing the out limit or the
//! compel point holds the scoot point fixed; editing the scoot point holds
//! the out limit fixed and recomputes the compel point.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_COMPEL_POINT, DEFAULT_OUT_LIMIT, DEFAULT_SCOOT_POINT};

/// Rejected threshold edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("scoot point must be at least 1 (got {value})")]
    NonPositiveScootPoint { value: i32 },
}

fn default_out_limit() -> i32 {
    DEFAULT_OUT_LIMIT
}

fn default_compel_point() -> i32 {
    DEFAULT_COMPEL_POINT
}

fn default_scoot_point() -> i32 {
    DEFAULT_SCOOT_POINT
}

/// The three related thresholds driving elimination and entry gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Exceeding this cumulative total eliminates a player.
    #[serde(default = "default_out_limit")]
    pub out_limit: i32,
    /// At or above this total, no new or returning player may join.
    #[serde(default = "default_compel_point")]
    pub compel_point: i32,
    /// Point buffer between compel and out; the per-play deduction unit.
    #[serde(default = "default_scoot_point")]
    pub scoot_point: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            out_limit: DEFAULT_OUT_LIMIT,
            compel_point: DEFAULT_COMPEL_POINT,
            scoot_point: DEFAULT_SCOOT_POINT,
        }
    }
}

impl Thresholds {
    /// Set the out limit, holding the scoot point fixed.
    pub fn set_out_limit(&mut self, value: i32) {
        self.out_limit = value;
        self.compel_point = value - self.scoot_point + 1;
    }

    /// Set the compel point, holding the scoot point fixed.
    pub fn set_compel_point(&mut self, value: i32) {
        self.compel_point = value;
        self.out_limit = value + self.scoot_point - 1;
    }

    /// Set the scoot point, holding the out limit fixed.
    ///
    /// # Errors
    ///
    /// Returns `ThresholdError::NonPositiveScootPoint` for values below 1;
    /// the plays-left decomposition divides by the scoot point.
    pub fn set_scoot_point(&mut self, value: i32) -> Result<(), ThresholdError> {
        if value <= 0 {
            return Err(ThresholdError::NonPositiveScootPoint { value });
        }
        self.scoot_point = value;
        self.compel_point = self.out_limit - value + 1;
        Ok(())
    }
}
