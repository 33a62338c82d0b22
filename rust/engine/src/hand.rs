//! Hand evaluation for 2 to 7 cards.
//!
//! Strength compares category first, then up to five tiebreak ranks ordered
//! high to low. Hands with fewer than five cards can only make the
//! rank-multiple categories (pair, trips, ...); straights and flushes need five.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comparable hand strength. Field order matters: the derived `Ord` compares
/// `category` before `kickers`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    /// Tiebreak ranks, high to low, zero padded.
    pub kickers: [u8; 5],
}

impl HandStrength {
    /// Packs the strength into a single integer with the same ordering.
    pub fn value(&self) -> u32 {
        self.kickers
            .iter()
            .fold(self.category as u32, |acc, &k| (acc << 4) | k as u32)
    }

    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

/// Evaluates the best hand that can be made from `cards`.
///
/// Accepts any number of cards; callers are expected to pass 2 to 7.
/// Duplicate cards are not checked for.
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: u16 = 0;
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        let s = c.suit.index();
        suit_counts[s] += 1;
        suit_masks[s] |= 1 << r;
    }

    let flush_suit = suit_counts.iter().position(|&n| n >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(suit_masks[s]) {
            let category = if high == 14 {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            };
            return strength(category, &[high]);
        }
    }

    // Ranks grouped by multiplicity, highest rank first within each group.
    let ranks_with = |n: u8| -> Vec<u8> {
        (2..=14u8)
            .rev()
            .filter(|&r| rank_counts[r as usize] == n)
            .collect()
    };
    let quads = ranks_with(4);
    let trips = ranks_with(3);
    let pairs = ranks_with(2);

    if let Some(&q) = quads.first() {
        return strength(Category::FourOfAKind, &[q, top_excluding(&rank_counts, &[q])]);
    }

    if let Some(&t) = trips.first() {
        // A second set of trips counts as the pair of a full house.
        let pair = trips
            .iter()
            .skip(1)
            .chain(pairs.iter())
            .copied()
            .max();
        if let Some(p) = pair {
            return strength(Category::FullHouse, &[t, p]);
        }
    }

    if let Some(s) = flush_suit {
        return strength(Category::Flush, &top_ranks(suit_masks[s], 5));
    }

    if let Some(high) = straight_high(rank_mask) {
        return strength(Category::Straight, &[high]);
    }

    if let Some(&t) = trips.first() {
        let mut k = vec![t];
        k.extend(top_ranks(rank_mask & !(1 << t), 2));
        return strength(Category::ThreeOfAKind, &k);
    }

    if pairs.len() >= 2 {
        let (hi, lo) = (pairs[0], pairs[1]);
        let kicker = top_excluding(&rank_counts, &[hi, lo]);
        return strength(Category::TwoPair, &[hi, lo, kicker]);
    }

    if let Some(&p) = pairs.first() {
        let mut k = vec![p];
        k.extend(top_ranks(rank_mask & !(1 << p), 3));
        return strength(Category::OnePair, &k);
    }

    strength(Category::HighCard, &top_ranks(rank_mask, 5))
}

/// Evaluates hole cards together with the board.
pub fn evaluate_with_board(hole: &[Card; 2], board: &[Card]) -> HandStrength {
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(board);
    evaluate_hand(&cards)
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    a.cmp(b)
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

fn top_ranks(mask: u16, n: usize) -> Vec<u8> {
    (2..=14u8).rev().filter(|&r| mask & (1 << r) != 0).take(n).collect()
}

fn top_excluding(rank_counts: &[u8; 15], excluded: &[u8]) -> u8 {
    (2..=14u8)
        .rev()
        .find(|r| rank_counts[*r as usize] > 0 && !excluded.contains(r))
        .unwrap_or(0)
}

fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if m & (1 << 14) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}
