//! Player records tracked by a session.
use serde::{Deserialize, Serialize};

/// A tracked tournament player.
///
/// Wire field names match the session snapshot format of the original
/// Rummy Star exports, so backup files remain interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Protected from deletion; has no effect on scoring.
    #[serde(default)]
    pub is_default: bool,
    /// Whether the player takes part in the current/next round.
    #[serde(default)]
    pub is_checked: bool,
    /// Pending score for the in-progress round, not yet committed.
    #[serde(default)]
    pub score: Option<i32>,
    /// Derived: cumulative total exceeds the out limit.
    #[serde(default)]
    pub is_out: bool,
    /// Base offset seeding a (re-)entering player's total at the tournament
    /// floor instead of zero.
    #[serde(default, rename = "overrideTotalScoreForIsOut")]
    pub total_override: Option<i32>,
    /// Ledger length at the moment the player became active; earlier rounds
    /// do not contribute to the total. `None` normalizes to zero.
    #[serde(default, rename = "joinedAtGameIndex")]
    pub joined_at: Option<usize>,
}

impl Player {
    /// Create a fresh, unchecked, non-default player.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default: false,
            is_checked: false,
            score: None,
            is_out: false,
            total_override: None,
            joined_at: Some(0),
        }
    }

    /// Whether the player participates in the current round.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_checked && !self.is_out
    }

    /// First ledger index contributing to this player's total.
    #[must_use]
    pub fn joined_index(&self) -> usize {
        self.joined_at.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player_is_inactive() {
        let player = Player::new("42", "Meera");
        assert!(!player.is_active());
        assert_eq!(player.joined_index(), 0);
        assert!(player.score.is_none());
    }

    #[test]
    fn eliminated_player_is_not_active_even_when_checked() {
        let mut player = Player::new("1", "Rajesh");
        player.is_checked = true;
        player.is_out = true;
        assert!(!player.is_active());
    }

    #[test]
    fn snapshot_field_names_match_original_exports() {
        let mut player = Player::new("9", "Anu");
        player.total_override = Some(120);
        player.joined_at = Some(3);
        let json = serde_json::to_value(&player).expect("serialize");
        assert_eq!(json["overrideTotalScoreForIsOut"], 120);
        assert_eq!(json["joinedAtGameIndex"], 3);
        assert_eq!(json["isDefault"], false);
        assert_eq!(json["isChecked"], false);
    }

    #[test]
    fn null_join_index_deserializes() {
        let player: Player = serde_json::from_str(
            r#"{"id":"1","name":"Rajesh","joinedAtGameIndex":null,"score":null}"#,
        )
        .expect("deserialize");
        assert_eq!(player.joined_at, None);
        assert_eq!(player.joined_index(), 0);
    }
}
