//! Read-only views of a table for callers outside the engine.

use serde::{Deserialize, Serialize};

use crate::betting::LegalActions;
use crate::blinds::BlindLevel;
use crate::cards::Card;
use crate::game::Phase;
use crate::history::CompletedHand;
use crate::player::{Personality, PlayerStatus};
use crate::pot::Pot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub seat: usize,
    pub id: String,
    pub name: String,
    pub stack: u32,
    /// Chips put in on the current street.
    pub bet: u32,
    /// Chips put in over the whole hand.
    pub invested: u32,
    pub status: PlayerStatus,
    pub is_human: bool,
    pub personality: Option<Personality>,
    /// Only filled in for the viewing seat.
    pub hole_cards: Option<[Card; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub hand_number: u64,
    pub pot: u32,
    /// Current main/side pot layering.
    pub pots: Vec<Pot>,
    pub current_bet: u32,
    pub last_raise: u32,
    pub board: Vec<Card>,
    pub dealer: Option<usize>,
    pub small_blind: Option<usize>,
    pub big_blind: Option<usize>,
    pub to_act: Option<usize>,
    pub blinds: BlindLevel,
    pub blind_level: usize,
    pub seats: Vec<SeatSnapshot>,
    /// Moves available to the viewer when it is the viewer's turn.
    pub legal_actions: Option<LegalActions>,
    pub last_hand: Option<CompletedHand>,
}

impl GameSnapshot {
    pub fn seat(&self, seat: usize) -> Option<&SeatSnapshot> {
        self.seats.get(seat)
    }

    /// Sum of stacks and chips in the pot.
    pub fn chip_total(&self) -> u64 {
        self.seats
            .iter()
            .map(|s| s.stack as u64 + s.invested as u64)
            .sum()
    }
}
