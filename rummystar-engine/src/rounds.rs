//! Round records, submission validation, and winner inference.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::{MAX_SCORE_DEFAULT, MAX_SCORE_DOUBLE_ROUND};
use crate::player::Player;

/// One committed round: a sequential label and the participants' scores.
///
/// Immutable once appended, except for the single-step undo of the most
/// recent record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub name: String,
    #[serde(default)]
    pub scores: BTreeMap<String, i32>,
}

/// Rejected round submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("no active players to record a round for")]
    EmptyRoster,
    #[error("all active players need a score between 0 and {max}")]
    InvalidScore { max: i32 },
    #[error("exactly one player must score 0 to win the round (got {zeros})")]
    WinnerCount { zeros: usize },
}

/// Per-player score cap for the round mode.
#[must_use]
pub const fn max_score(double_round: bool) -> i32 {
    if double_round {
        MAX_SCORE_DOUBLE_ROUND
    } else {
        MAX_SCORE_DEFAULT
    }
}

/// Validate the active players' pending scores for commit.
///
/// Returns the id-to-score mapping to append as a new [`RoundRecord`].
///
/// # Errors
///
/// `EmptyRoster` when nobody is active, `InvalidScore` when a pending score
/// is missing or outside `[0, max]` for the mode, `WinnerCount` unless
/// exactly one active player scored zero.
pub fn validate(
    active: &[&Player],
    double_round: bool,
) -> Result<BTreeMap<String, i32>, RoundError> {
    if active.is_empty() {
        return Err(RoundError::EmptyRoster);
    }
    let max = max_score(double_round);
    let mut scores = BTreeMap::new();
    let mut zeros = 0usize;
    for player in active {
        let Some(score) = player.score else {
            return Err(RoundError::InvalidScore { max });
        };
        if score < 0 || score > max {
            return Err(RoundError::InvalidScore { max });
        }
        if score == 0 {
            zeros += 1;
        }
        scores.insert(player.id.clone(), score);
    }
    if zeros != 1 {
        return Err(RoundError::WinnerCount { zeros });
    }
    Ok(scores)
}

/// Fill in the implied winner.
///
/// When more than one player is active, none has an explicit zero, and
/// exactly one has no score entered, that player's score is logically
/// determined: the winner always scores 0. Re-run after every single-player
/// score edit. Returns the inferred winner's id when a score was assigned.
pub fn infer_winner(players: &mut [Player]) -> Option<String> {
    let active: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_active())
        .map(|(idx, _)| idx)
        .collect();
    if active.len() < 2 {
        return None;
    }
    if active.iter().any(|&idx| players[idx].score == Some(0)) {
        return None;
    }
    let mut missing = active.iter().filter(|&&idx| players[idx].score.is_none());
    let (Some(&idx), None) = (missing.next(), missing.next()) else {
        return None;
    };
    players[idx].score = Some(0);
    Some(players[idx].id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(id: &str, score: Option<i32>) -> Player {
        let mut player = Player::new(id, format!("Player {id}"));
        player.is_checked = true;
        player.score = score;
        player
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert_eq!(validate(&[], false), Err(RoundError::EmptyRoster));
    }

    #[test]
    fn missing_score_is_invalid() {
        let a = active("1", Some(0));
        let b = active("2", None);
        assert_eq!(
            validate(&[&a, &b], false),
            Err(RoundError::InvalidScore { max: 80 })
        );
    }

    #[test]
    fn scores_above_the_mode_max_are_invalid() {
        let a = active("1", Some(0));
        let b = active("2", Some(81));
        assert_eq!(
            validate(&[&a, &b], false),
            Err(RoundError::InvalidScore { max: 80 })
        );
        // The same hand is fine in a double round.
        let scores = validate(&[&a, &b], true).expect("valid double round");
        assert_eq!(scores["2"], 81);
    }

    #[test]
    fn double_round_caps_at_160() {
        let a = active("1", Some(0));
        let b = active("2", Some(161));
        assert_eq!(
            validate(&[&a, &b], true),
            Err(RoundError::InvalidScore { max: 160 })
        );
    }

    #[test]
    fn negative_scores_are_invalid() {
        let a = active("1", Some(-5));
        let b = active("2", Some(0));
        assert_eq!(
            validate(&[&a, &b], false),
            Err(RoundError::InvalidScore { max: 80 })
        );
    }

    #[test]
    fn exactly_one_winner_is_required() {
        let a = active("1", Some(10));
        let b = active("2", Some(40));
        assert_eq!(
            validate(&[&a, &b], false),
            Err(RoundError::WinnerCount { zeros: 0 })
        );
        let a = active("1", Some(0));
        let b = active("2", Some(0));
        assert_eq!(
            validate(&[&a, &b], false),
            Err(RoundError::WinnerCount { zeros: 2 })
        );
    }

    #[test]
    fn valid_round_maps_every_active_player() {
        let a = active("1", Some(0));
        let b = active("2", Some(40));
        let scores = validate(&[&a, &b], false).expect("valid round");
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["1"], 0);
        assert_eq!(scores["2"], 40);
    }

    #[test]
    fn last_unscored_player_becomes_the_winner() {
        let mut players = vec![active("1", Some(5)), active("2", None)];
        assert_eq!(infer_winner(&mut players), Some(String::from("2")));
        assert_eq!(players[1].score, Some(0));
    }

    #[test]
    fn no_inference_with_an_explicit_zero() {
        let mut players = vec![active("1", Some(0)), active("2", None)];
        assert_eq!(infer_winner(&mut players), None);
        assert_eq!(players[1].score, None);
    }

    #[test]
    fn no_inference_with_two_scores_missing() {
        let mut players = vec![active("1", Some(5)), active("2", None), active("3", None)];
        assert_eq!(infer_winner(&mut players), None);
    }

    #[test]
    fn no_inference_for_a_lone_player() {
        let mut players = vec![active("1", None)];
        assert_eq!(infer_winner(&mut players), None);
    }

    #[test]
    fn inactive_players_are_ignored_by_inference() {
        let mut spectator = Player::new("3", "Shine");
        spectator.score = None;
        let mut players = vec![active("1", Some(12)), active("2", None), spectator];
        assert_eq!(infer_winner(&mut players), Some(String::from("2")));
        assert_eq!(players[2].score, None);
    }
}
