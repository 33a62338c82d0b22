use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::betting::Street;
use crate::blinds::{BlindLevel, PostedBlinds};
use crate::cards::Card;
use crate::hand::Category;
use crate::player::ActionKind;
use crate::pot::{Pot, PotAward};

/// One accepted action with the chip movement it caused.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub action: ActionKind,
    /// Chips moved into the pot by this action.
    pub amount: u32,
    pub stack_before: u32,
    pub stack_after: u32,
    pub pot_before: u32,
    pub pot_after: u32,
    /// Set when the engine folded the seat after its own action was rejected.
    #[serde(default)]
    pub forced: bool,
}

/// Hole cards revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownHand {
    pub seat: usize,
    pub hole_cards: [Card; 2],
    pub category: Category,
    pub strength: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatResult {
    pub seat: usize,
    pub starting_stack: u32,
    pub final_stack: u32,
    pub net: i64,
}

/// Immutable summary of a finished hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompletedHand {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    pub hand_number: u64,
    pub seed: Option<u64>,
    /// RFC3339
    pub ts: String,
    pub dealer: usize,
    pub small_blind: usize,
    pub big_blind: usize,
    pub blinds: BlindLevel,
    pub posted: PostedBlinds,
    pub board: Vec<Card>,
    pub actions: Vec<ActionRecord>,
    pub pots: Vec<Pot>,
    pub awards: Vec<PotAward>,
    /// Empty when the hand ended without a showdown.
    #[serde(default)]
    pub showdown: Vec<ShowdownHand>,
    pub results: Vec<SeatResult>,
}

impl CompletedHand {
    pub fn total_pot(&self) -> u64 {
        self.pots.iter().map(|p| p.amount as u64).sum()
    }

    /// Seats that received chips, in payout order without duplicates. A seat
    /// whose uncalled bet came back is included.
    pub fn winners(&self) -> Vec<usize> {
        let mut seats = Vec::new();
        for (seat, _) in self.awards.iter().flat_map(|a| a.shares.iter()) {
            if !seats.contains(seat) {
                seats.push(*seat);
            }
        }
        seats
    }

    pub fn went_to_showdown(&self) -> bool {
        !self.showdown.is_empty()
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u64) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Bounded store of completed hands; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct HandHistory {
    hands: VecDeque<CompletedHand>,
    capacity: usize,
}

impl HandHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            hands: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, hand: CompletedHand) {
        if self.hands.len() == self.capacity {
            self.hands.pop_front();
        }
        self.hands.push_back(hand);
    }

    pub fn latest(&self) -> Option<&CompletedHand> {
        self.hands.back()
    }

    /// Newest first, skipping `offset` entries.
    pub fn page(&self, limit: usize, offset: usize) -> Vec<CompletedHand> {
        self.hands
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Appends completed hands to a JSONL file, one hand per line.
pub struct HandLogger {
    writer: BufWriter<File>,
    written: u64,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
            written: 0,
        })
    }

    pub fn write(&mut self, hand: &CompletedHand) -> std::io::Result<()> {
        let line = serde_json::to_string(hand).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Drop for HandLogger {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
