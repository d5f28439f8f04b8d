//! Survival metrics derived from a cumulative total and the thresholds.
use std::fmt;

use crate::thresholds::Thresholds;

/// Coarse standing tier used in shared summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    Out,
    Compel,
    Safe,
}

impl StatusTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Out => "OUT",
            Self::Compel => "COMPEL",
            Self::Safe => "SAFE",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tactical survival metrics for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurvivalStatus {
    /// Total exceeds the out limit.
    pub is_out: bool,
    /// Not out, but at or above the compel point.
    pub is_compel: bool,
    /// Margin before elimination, floored at zero.
    pub points_remaining: i32,
    /// Whole scoot-point multiples remaining.
    pub full_plays: i32,
    /// A partial play remains (remainder below one scoot point).
    pub has_compel_play: bool,
}

impl SurvivalStatus {
    /// Full plays plus the optional compel play.
    #[must_use]
    pub const fn total_plays(&self) -> i32 {
        self.full_plays + self.has_compel_play as i32
    }

    #[must_use]
    pub const fn tier(&self) -> StatusTier {
        if self.is_out {
            StatusTier::Out
        } else if self.is_compel {
            StatusTier::Compel
        } else {
            StatusTier::Safe
        }
    }

    /// Long-form plays-left description.
    ///
    /// The five cases are mutually exclusive and exhaustive over
    /// non-negative margins and positive scoot points.
    #[must_use]
    pub fn description(&self) -> String {
        if self.is_out {
            String::from("Eliminated")
        } else if self.full_plays > 0 && !self.has_compel_play {
            format!("{} more play left", self.full_plays)
        } else if self.full_plays > 0 && self.has_compel_play {
            format!("{} play + 1 compel", self.full_plays)
        } else if self.has_compel_play {
            String::from("1 compel play left")
        } else {
            String::from("Next point is out")
        }
    }

    /// Abbreviated status shown in dense layouts.
    #[must_use]
    pub fn short_status(&self) -> String {
        if self.is_out {
            String::from("OUT")
        } else if self.full_plays > 0 && !self.has_compel_play {
            format!("{}P", self.full_plays)
        } else if self.full_plays > 0 && self.has_compel_play {
            format!("{}P + 1C", self.full_plays)
        } else if self.has_compel_play {
            String::from("1C")
        } else {
            String::from("Next Pt")
        }
    }

    /// Compact P+C notation used in shared standings ("3P+1C", "NEXT").
    #[must_use]
    pub fn notation(&self) -> String {
        if self.is_out {
            String::from("0")
        } else if self.full_plays > 0 && !self.has_compel_play {
            format!("{}P+0C", self.full_plays)
        } else if self.full_plays > 0 && self.has_compel_play {
            format!("{}P+1C", self.full_plays)
        } else if self.has_compel_play {
            String::from("0P+1C")
        } else {
            String::from("NEXT")
        }
    }
}

/// Classify a cumulative total against the threshold config.
#[must_use]
pub fn classify(total: i32, thresholds: &Thresholds) -> SurvivalStatus {
    let is_out = total > thresholds.out_limit;
    let is_compel = !is_out && total >= thresholds.compel_point;
    let points_remaining = (thresholds.out_limit - total).max(0);
    // Imported sessions bypass threshold validation; a degenerate scoot
    // point must not divide by zero here.
    let scoot = thresholds.scoot_point.max(1);
    SurvivalStatus {
        is_out,
        is_compel,
        points_remaining,
        full_plays: points_remaining / scoot,
        has_compel_play: points_remaining % scoot > 0,
    }
}
