//! Button rotation, blind posting and the blind schedule.

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindLevel {
    pub small: u32,
    pub big: u32,
}

impl BlindLevel {
    pub const fn new(small: u32, big: u32) -> Self {
        Self { small, big }
    }
}

/// Blind levels in play order. With `hands_per_level` set, the level goes up
/// every that many hands and stays on the last level once reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSchedule {
    pub levels: Vec<BlindLevel>,
    #[serde(default)]
    pub hands_per_level: Option<u32>,
}

impl BlindSchedule {
    pub fn fixed(small: u32, big: u32) -> Self {
        Self {
            levels: vec![BlindLevel::new(small, big)],
            hands_per_level: None,
        }
    }

    pub fn escalating(levels: Vec<BlindLevel>, hands_per_level: u32) -> Self {
        Self {
            levels,
            hands_per_level: Some(hands_per_level),
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.levels.is_empty() {
            return Err(GameError::InvalidConfig("blind schedule is empty".into()));
        }
        for level in &self.levels {
            if level.small == 0 || level.big < level.small {
                return Err(GameError::InvalidConfig(format!(
                    "invalid blinds {}/{}",
                    level.small, level.big
                )));
            }
        }
        if self.hands_per_level == Some(0) {
            return Err(GameError::InvalidConfig(
                "hands_per_level must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Zero-based level index for a 1-based hand number.
    pub fn level_index(&self, hand_number: u64) -> usize {
        let last = self.levels.len().saturating_sub(1);
        match self.hands_per_level {
            Some(per) if per > 0 => {
                let idx = hand_number.saturating_sub(1) / per as u64;
                (idx as usize).min(last)
            }
            _ => 0,
        }
    }

    pub fn level_for_hand(&self, hand_number: u64) -> BlindLevel {
        self.levels[self.level_index(hand_number)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positions {
    pub dealer: usize,
    pub small_blind: usize,
    pub big_blind: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedBlinds {
    pub small: u32,
    pub big: u32,
}

/// Next seat after `from` (wrapping) that still has chips.
pub fn next_seat_with_chips(players: &[Player], from: usize) -> Option<usize> {
    let n = players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&i| players[i].stack() > 0)
}

pub fn funded_seats(players: &[Player]) -> usize {
    players.iter().filter(|p| p.stack() > 0).count()
}

/// Picks dealer and blind seats for the next hand.
///
/// The button moves to the next funded seat after `previous_dealer` (or the
/// first funded seat for the opening hand). Heads-up, the dealer posts the
/// small blind.
pub fn assign_positions(
    players: &[Player],
    previous_dealer: Option<usize>,
) -> Result<Positions, GameError> {
    if funded_seats(players) < 2 {
        return Err(GameError::TableCollapsed);
    }
    let n = players.len();
    let dealer = match previous_dealer {
        Some(prev) => next_seat_with_chips(players, prev),
        None => next_seat_with_chips(players, n - 1),
    }
    .ok_or(GameError::TableCollapsed)?;

    let small_blind = if funded_seats(players) == 2 {
        dealer
    } else {
        next_seat_with_chips(players, dealer).ok_or(GameError::TableCollapsed)?
    };
    let big_blind = next_seat_with_chips(players, small_blind).ok_or(GameError::TableCollapsed)?;

    Ok(Positions {
        dealer,
        small_blind,
        big_blind,
    })
}

/// Posts both blinds. A seat short of its blind posts everything it has and
/// goes all-in.
pub(crate) fn post_blinds(
    players: &mut [Player],
    positions: &Positions,
    level: BlindLevel,
) -> PostedBlinds {
    let small = players[positions.small_blind].commit(level.small);
    let big = players[positions.big_blind].commit(level.big);
    tracing::debug!(
        dealer = positions.dealer,
        small_blind = positions.small_blind,
        big_blind = positions.big_blind,
        small,
        big,
        "blinds posted"
    );
    PostedBlinds { small, big }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerStatus, SeatConfig};

    fn table(stacks: &[u32]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(&SeatConfig::human(format!("p{i}"), format!("P{i}")), s))
            .collect()
    }

    #[test]
    fn opening_hand_starts_at_first_funded_seat() {
        let players = table(&[0, 100, 100, 100]);
        let pos = assign_positions(&players, None).unwrap();
        assert_eq!((pos.dealer, pos.small_blind, pos.big_blind), (1, 2, 3));
    }

    #[test]
    fn button_skips_busted_seats() {
        let players = table(&[100, 0, 100, 100]);
        let pos = assign_positions(&players, Some(0)).unwrap();
        assert_eq!((pos.dealer, pos.small_blind, pos.big_blind), (2, 3, 0));
    }

    #[test]
    fn heads_up_dealer_posts_small_blind() {
        let players = table(&[100, 0, 100]);
        let pos = assign_positions(&players, Some(0)).unwrap();
        assert_eq!((pos.dealer, pos.small_blind, pos.big_blind), (2, 2, 0));
    }

    #[test]
    fn collapsed_table_is_reported() {
        let players = table(&[0, 100, 0]);
        assert_eq!(
            assign_positions(&players, Some(1)),
            Err(GameError::TableCollapsed)
        );
    }

    #[test]
    fn short_blind_goes_all_in() {
        let mut players = table(&[1000, 1000, 1000, 3]);
        let pos = Positions {
            dealer: 1,
            small_blind: 2,
            big_blind: 3,
        };
        let posted = post_blinds(&mut players, &pos, BlindLevel::new(5, 10));
        assert_eq!(posted, PostedBlinds { small: 5, big: 3 });
        assert_eq!(players[3].status(), PlayerStatus::AllIn);
        assert_eq!(players[3].stack(), 0);
    }

    #[test]
    fn schedule_escalates_and_caps() {
        let schedule = BlindSchedule::escalating(
            vec![BlindLevel::new(5, 10), BlindLevel::new(10, 20)],
            3,
        );
        assert_eq!(schedule.level_for_hand(1), BlindLevel::new(5, 10));
        assert_eq!(schedule.level_for_hand(3), BlindLevel::new(5, 10));
        assert_eq!(schedule.level_for_hand(4), BlindLevel::new(10, 20));
        assert_eq!(schedule.level_for_hand(100), BlindLevel::new(10, 20));
    }
}
