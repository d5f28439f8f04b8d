//! Cumulative score accumulation over the round ledger.
use crate::player::Player;
use crate::rounds::RoundRecord;

/// A player's effective cumulative total.
///
/// Starts from the override base (zero when unset) and adds the player's
/// per-round scores from the round they joined onward; rounds the player did
/// not take part in contribute nothing. Pure, O(ledger length).
#[must_use]
pub fn total(player: &Player, ledger: &[RoundRecord]) -> i32 {
    let mut total = player.total_override.unwrap_or(0);
    for record in ledger.iter().skip(player.joined_index()) {
        if let Some(score) = record.scores.get(&player.id) {
            total += score;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(scores: &[(&str, i32)]) -> RoundRecord {
        RoundRecord {
            name: String::from("Game"),
            scores: scores
                .iter()
                .map(|(id, score)| ((*id).to_string(), *score))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn sums_rounds_the_player_took_part_in() {
        let player = Player::new("1", "Rajesh");
        let ledger = vec![record(&[("1", 10), ("2", 0)]), record(&[("1", 25)])];
        assert_eq!(total(&player, &ledger), 35);
    }

    #[test]
    fn absent_rounds_contribute_nothing() {
        let player = Player::new("2", "Vinod");
        let ledger = vec![record(&[("1", 10)]), record(&[("2", 40)])];
        assert_eq!(total(&player, &ledger), 40);
    }

    #[test]
    fn join_index_skips_earlier_rounds() {
        let mut player = Player::new("1", "Rajesh");
        player.joined_at = Some(1);
        let ledger = vec![record(&[("1", 50)]), record(&[("1", 20)])];
        assert_eq!(total(&player, &ledger), 20);
    }

    #[test]
    fn override_seeds_the_base() {
        let mut player = Player::new("8", "Meera");
        player.total_override = Some(120);
        player.joined_at = Some(2);
        let ledger = vec![
            record(&[("8", 999)]),
            record(&[("8", 999)]),
            record(&[("8", 30)]),
        ];
        assert_eq!(total(&player, &ledger), 150);
    }

    #[test]
    fn appending_a_round_adds_exactly_that_score() {
        let player = Player::new("1", "Rajesh");
        let mut ledger = vec![record(&[("1", 10)])];
        let before = total(&player, &ledger);
        ledger.push(record(&[("1", 30)]));
        assert_eq!(total(&player, &ledger), before + 30);
        ledger.push(record(&[("2", 15)]));
        assert_eq!(total(&player, &ledger), before + 30);
    }
}
