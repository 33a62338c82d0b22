//! Per-street betting: turn order, action legality, minimum raise and
//! reopening rules.

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{ActionKind, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn next(self) -> Street {
        match self {
            Street::PreFlop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }

    /// Community cards on the table once this street is dealt.
    pub fn board_len(self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River | Street::Showdown => 5,
        }
    }
}

/// What happens after an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// Betting continues with this seat.
    Continue { next: usize },
    /// Everyone still able to bet has acted and matched the bet.
    StreetComplete,
    /// At most one seat is left in the hand.
    HandOver,
}

/// An accepted action as it was actually executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// Effective action; a call with nothing owed is recorded as a check.
    pub kind: ActionKind,
    /// Chips moved from the stack into the pot.
    pub committed: u32,
    /// Whether the action raised by at least the minimum and reopened betting.
    pub full_raise: bool,
    pub status: RoundStatus,
}

/// Moves a seat may make right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub seat: usize,
    pub can_check: bool,
    /// Chips a call costs; capped at the stack.
    pub call_amount: u32,
    pub can_raise: bool,
    /// Smallest legal "raise to" total. Equal to `max_raise_to` when the seat
    /// can only shove for less than a full raise.
    pub min_raise_to: u32,
    /// Street total if the seat goes all-in.
    pub max_raise_to: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingRound {
    street: Street,
    current_bet: u32,
    last_raise: u32,
    big_blind: u32,
    to_act: Option<usize>,
    /// Seat still owes an action on this street.
    pending: Vec<bool>,
    /// Seat may still raise; cleared when only an undersized all-in came
    /// after the seat's last action.
    may_raise: Vec<bool>,
}

impl BettingRound {
    /// Pre-flop round after blinds are posted. The amount to call is the full
    /// big blind even when the big blind seat posted short.
    pub fn preflop(players: &[Player], big_blind: u32) -> Self {
        let current_bet = players
            .iter()
            .map(Player::street_bet)
            .max()
            .unwrap_or(0)
            .max(big_blind);
        Self {
            street: Street::PreFlop,
            current_bet,
            last_raise: big_blind,
            big_blind,
            to_act: None,
            pending: players.iter().map(Player::can_act).collect(),
            may_raise: vec![true; players.len()],
        }
    }

    /// Resets betting for a post-flop street. Street bets on the players must
    /// already be cleared.
    pub fn start_street(&mut self, street: Street, players: &[Player]) {
        self.street = street;
        self.current_bet = 0;
        self.last_raise = self.big_blind;
        self.to_act = None;
        self.pending = players.iter().map(Player::can_act).collect();
        self.may_raise = vec![true; players.len()];
    }

    pub fn street(&self) -> Street {
        self.street
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn last_raise(&self) -> u32 {
        self.last_raise
    }
    pub fn to_act(&self) -> Option<usize> {
        self.to_act
    }

    /// Finds the next seat after `from` that owes an action and points the
    /// round at it.
    pub fn advance(&mut self, players: &[Player], from: usize) -> RoundStatus {
        if players.iter().filter(|p| p.in_hand()).count() <= 1 {
            self.to_act = None;
            return RoundStatus::HandOver;
        }
        let lone_bettor = players.iter().filter(|p| p.can_act()).count() <= 1;
        let n = players.len();
        let next = (1..=n).map(|step| (from + step) % n).find(|&i| {
            let p = &players[i];
            p.can_act()
                && (p.street_bet() < self.current_bet || (self.pending[i] && !lone_bettor))
        });
        self.to_act = next;
        match next {
            Some(seat) => RoundStatus::Continue { next: seat },
            None => RoundStatus::StreetComplete,
        }
    }

    pub fn legal_actions(&self, players: &[Player], seat: usize) -> Option<LegalActions> {
        let p = players.get(seat)?;
        if self.to_act != Some(seat) || !p.can_act() {
            return None;
        }
        let to_call = self.current_bet.saturating_sub(p.street_bet());
        let max_raise_to = p.street_bet() + p.stack();
        let can_raise = self.raise_open(players, seat) && max_raise_to > self.current_bet;
        Some(LegalActions {
            seat,
            can_check: to_call == 0,
            call_amount: to_call.min(p.stack()),
            can_raise,
            min_raise_to: (self.current_bet + self.last_raise).min(max_raise_to),
            max_raise_to,
        })
    }

    /// Validates and applies one action. Nothing is mutated on error.
    ///
    /// For [`ActionKind::Raise`], `amount` is the street total to raise to.
    /// Amounts beyond the stack are treated as all-in; amounts below
    /// `current_bet + last_raise` are rejected unless they commit the whole
    /// stack.
    pub fn apply(
        &mut self,
        players: &mut [Player],
        seat: usize,
        kind: ActionKind,
        amount: u32,
    ) -> Result<Applied, GameError> {
        let player = players.get(seat).ok_or(GameError::UnknownSeat(seat))?;
        if !player.can_act() {
            return Err(GameError::SeatCannotAct {
                seat,
                status: player.status(),
            });
        }
        if self.to_act != Some(seat) {
            return Err(GameError::NotPlayersTurn {
                expected: self.to_act,
                actual: seat,
            });
        }

        let street_bet = player.street_bet();
        let to_call = self.current_bet.saturating_sub(street_bet);
        let max_total = street_bet + player.stack();

        // Resolve the request into (effective kind, street total to reach).
        let (effective, target) = match kind {
            ActionKind::Fold => (ActionKind::Fold, street_bet),
            ActionKind::Check => {
                if to_call > 0 {
                    return Err(GameError::CannotCheck { to_call });
                }
                (ActionKind::Check, street_bet)
            }
            ActionKind::Call => self.call_target(to_call, street_bet, max_total),
            // Nobody left to answer a raise: putting chips in can only call.
            ActionKind::AllIn | ActionKind::Raise
                if max_total > self.current_bet && !opponent_can_act(players, seat) =>
            {
                self.call_target(to_call, street_bet, max_total)
            }
            ActionKind::AllIn => {
                if max_total > self.current_bet && !self.may_raise[seat] {
                    return Err(GameError::RaiseNotAllowed { seat });
                }
                (ActionKind::AllIn, max_total)
            }
            ActionKind::Raise => {
                let target = amount.min(max_total);
                let minimum = self.current_bet + self.last_raise;
                let all_in = target == max_total;
                if target <= self.current_bet && !all_in {
                    return Err(GameError::InvalidBetAmount { amount, minimum });
                }
                if target > self.current_bet && !self.may_raise[seat] {
                    return Err(GameError::RaiseNotAllowed { seat });
                }
                if target < minimum && !all_in {
                    return Err(GameError::InvalidBetAmount { amount, minimum });
                }
                let kind = if all_in { ActionKind::AllIn } else { ActionKind::Raise };
                (kind, target)
            }
        };

        let committed = if effective == ActionKind::Fold {
            players[seat].fold();
            0
        } else {
            players[seat].commit(target - street_bet)
        };

        let new_bet = players[seat].street_bet();
        let mut full_raise = false;
        if new_bet > self.current_bet {
            let raise_size = new_bet - self.current_bet;
            full_raise = raise_size >= self.last_raise;
            if full_raise {
                self.last_raise = raise_size;
            }
            for (i, p) in players.iter().enumerate() {
                if i == seat || !p.can_act() {
                    continue;
                }
                if full_raise {
                    self.may_raise[i] = true;
                } else if !self.pending[i] {
                    // Already acted: must answer the extra chips but may not re-raise.
                    self.may_raise[i] = false;
                }
                self.pending[i] = true;
            }
            self.current_bet = new_bet;
        }
        self.pending[seat] = false;

        let status = self.advance(players, seat);
        Ok(Applied {
            kind: effective,
            committed,
            full_raise,
            status,
        })
    }

    fn call_target(&self, to_call: u32, street_bet: u32, max_total: u32) -> (ActionKind, u32) {
        if to_call == 0 {
            (ActionKind::Check, street_bet)
        } else {
            (ActionKind::Call, self.current_bet.min(max_total))
        }
    }

    /// Raising needs an open option and somebody left who could respond.
    fn raise_open(&self, players: &[Player], seat: usize) -> bool {
        self.may_raise[seat] && opponent_can_act(players, seat)
    }
}

fn opponent_can_act(players: &[Player], seat: usize) -> bool {
    players
        .iter()
        .enumerate()
        .any(|(i, p)| i != seat && p.can_act())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerStatus, SeatConfig};

    fn seats(stacks: &[u32]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(&SeatConfig::human(format!("p{i}"), format!("P{i}")), s))
            .collect()
    }

    /// Three-handed pre-flop: dealer 0, SB 1 posts 5, BB 2 posts 10.
    fn three_handed(stacks: &[u32]) -> (Vec<Player>, BettingRound) {
        let mut players = seats(stacks);
        players[1].commit(5);
        players[2].commit(10);
        let mut round = BettingRound::preflop(&players, 10);
        round.advance(&players, 2);
        (players, round)
    }

    #[test]
    fn preflop_starts_left_of_big_blind() {
        let (_, round) = three_handed(&[1000, 1000, 1000]);
        assert_eq!(round.to_act(), Some(0));
        assert_eq!(round.current_bet(), 10);
        assert_eq!(round.last_raise(), 10);
    }

    #[test]
    fn big_blind_keeps_option_after_limps() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        round.apply(&mut players, 0, ActionKind::Call, 0).unwrap();
        let applied = round.apply(&mut players, 1, ActionKind::Call, 0).unwrap();
        assert_eq!(applied.status, RoundStatus::Continue { next: 2 });
        let applied = round.apply(&mut players, 2, ActionKind::Check, 0).unwrap();
        assert_eq!(applied.status, RoundStatus::StreetComplete);
    }

    #[test]
    fn undersized_raise_is_rejected_without_mutation() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        let before = round.clone();
        let err = round.apply(&mut players, 0, ActionKind::Raise, 15).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidBetAmount {
                amount: 15,
                minimum: 20
            }
        );
        assert_eq!(round, before);
        assert_eq!(players[0].stack(), 1000);
    }

    #[test]
    fn full_raise_sets_new_minimum() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        round.apply(&mut players, 0, ActionKind::Raise, 35).unwrap();
        assert_eq!(round.current_bet(), 35);
        assert_eq!(round.last_raise(), 25);
        let legal = round.legal_actions(&players, 1).unwrap();
        assert_eq!(legal.min_raise_to, 60);
        assert_eq!(legal.call_amount, 30);
    }

    #[test]
    fn short_all_in_raise_does_not_reopen_for_callers() {
        // Seat 2 (BB) has only 25 behind its blind.
        let (mut players, mut round) = three_handed(&[1000, 1000, 35]);
        round.apply(&mut players, 0, ActionKind::Raise, 30).unwrap();
        round.apply(&mut players, 1, ActionKind::Call, 0).unwrap();
        let applied = round.apply(&mut players, 2, ActionKind::AllIn, 0).unwrap();
        assert!(!applied.full_raise);
        assert_eq!(round.current_bet(), 35);
        assert_eq!(round.last_raise(), 20);

        let legal = round.legal_actions(&players, 0).unwrap();
        assert!(!legal.can_raise);
        assert_eq!(legal.call_amount, 5);
        assert_eq!(
            round.apply(&mut players, 0, ActionKind::Raise, 100),
            Err(GameError::RaiseNotAllowed { seat: 0 })
        );
        round.apply(&mut players, 0, ActionKind::Call, 0).unwrap();
        let applied = round.apply(&mut players, 1, ActionKind::Call, 0).unwrap();
        assert_eq!(applied.status, RoundStatus::StreetComplete);
    }

    #[test]
    fn short_call_consumes_remaining_stack() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        round.apply(&mut players, 0, ActionKind::Raise, 500).unwrap();
        players[1] = {
            let mut p = Player::new(&SeatConfig::human("p1", "P1"), 45);
            p.commit(5);
            p
        };
        let applied = round.apply(&mut players, 1, ActionKind::Call, 0).unwrap();
        assert_eq!(applied.committed, 40);
        assert_eq!(players[1].stack(), 0);
        assert_eq!(players[1].status(), PlayerStatus::AllIn);
    }

    #[test]
    fn out_of_turn_is_rejected() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        assert_eq!(
            round.apply(&mut players, 1, ActionKind::Call, 0),
            Err(GameError::NotPlayersTurn {
                expected: Some(0),
                actual: 1
            })
        );
    }

    #[test]
    fn fold_to_one_player_ends_hand() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        round.apply(&mut players, 0, ActionKind::Fold, 0).unwrap();
        let applied = round.apply(&mut players, 1, ActionKind::Fold, 0).unwrap();
        assert_eq!(applied.status, RoundStatus::HandOver);
        assert_eq!(round.to_act(), None);
    }

    #[test]
    fn postflop_minimum_resets_to_big_blind() {
        let (mut players, mut round) = three_handed(&[1000, 1000, 1000]);
        round.apply(&mut players, 0, ActionKind::Raise, 60).unwrap();
        round.apply(&mut players, 1, ActionKind::Call, 0).unwrap();
        round.apply(&mut players, 2, ActionKind::Call, 0).unwrap();
        for p in players.iter_mut() {
            p.reset_street();
        }
        round.start_street(Street::Flop, &players);
        assert_eq!(round.advance(&players, 0), RoundStatus::Continue { next: 1 });
        assert_eq!(round.last_raise(), 10);
        assert_eq!(round.legal_actions(&players, 1).unwrap().min_raise_to, 10);
    }
}
