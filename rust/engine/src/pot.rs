//! Main/side pot layering and payout.

use serde::{Deserialize, Serialize};

use crate::hand::HandStrength;

/// What one seat has put into the pot over the whole hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub seat: usize,
    pub amount: u32,
    pub folded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    /// Seats that can win this pot, in seat order.
    pub eligible: Vec<usize>,
}

/// Result of paying out one pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    pub pot_index: usize,
    pub amount: u32,
    /// `(seat, chips)` in the order the chips were handed out.
    pub shares: Vec<(usize, u32)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotManager {
    pots: Vec<Pot>,
}

impl PotManager {
    /// Builds the main pot and side pots from hand contributions.
    ///
    /// Every distinct contribution level closes a layer. A layer holds what
    /// each seat put in between the previous level and this one; it can be won
    /// by non-folded seats that reached the level. Consecutive layers with the
    /// same eligible seats are merged.
    ///
    /// A layer no live seat reached is an uncalled bet: it becomes a pot
    /// eligible to the seats that paid into it, so those chips go back to them.
    pub fn from_contributions(contributions: &[Contribution]) -> Self {
        let mut levels: Vec<u32> = contributions
            .iter()
            .map(|c| c.amount)
            .filter(|&a| a > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots: Vec<Pot> = Vec::new();
        let mut prev = 0u32;
        for &level in &levels {
            let amount: u32 = contributions
                .iter()
                .map(|c| c.amount.min(level) - c.amount.min(prev))
                .sum();
            let reached: Vec<&Contribution> =
                contributions.iter().filter(|c| c.amount >= level).collect();
            let mut eligible: Vec<usize> = reached
                .iter()
                .filter(|c| !c.folded)
                .map(|c| c.seat)
                .collect();
            if eligible.is_empty() {
                eligible = reached.iter().map(|c| c.seat).collect();
            }
            eligible.sort_unstable();
            prev = level;

            match pots.last_mut() {
                Some(last) if last.eligible == eligible => last.amount += amount,
                _ => pots.push(Pot { amount, eligible }),
            }
        }

        Self { pots }
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map(|p| p.amount).unwrap_or(0)
    }

    pub fn side_pots(&self) -> &[Pot] {
        self.pots.get(1..).unwrap_or(&[])
    }

    pub fn total(&self) -> u64 {
        self.pots.iter().map(|p| p.amount as u64).sum()
    }

    /// Pays out every pot.
    ///
    /// `strength_of` returns the showdown strength for a seat; a pot with a
    /// single eligible seat is awarded without looking at hands. Ties split
    /// evenly; odd chips go one each to the tied winners starting with the
    /// first one clockwise of the dealer.
    pub fn distribute<F>(&self, seat_count: usize, dealer: usize, strength_of: F) -> Vec<PotAward>
    where
        F: Fn(usize) -> Option<HandStrength>,
    {
        self.pots
            .iter()
            .enumerate()
            .map(|(pot_index, pot)| {
                let winners = if pot.eligible.len() == 1 {
                    pot.eligible.clone()
                } else {
                    best_hands(&pot.eligible, &strength_of)
                };
                let ordered = order_from_dealer(&winners, dealer, seat_count);
                PotAward {
                    pot_index,
                    amount: pot.amount,
                    shares: split_pot(pot.amount, &ordered),
                }
            })
            .collect()
    }
}

fn best_hands<F>(eligible: &[usize], strength_of: &F) -> Vec<usize>
where
    F: Fn(usize) -> Option<HandStrength>,
{
    let ranked: Vec<(usize, HandStrength)> = eligible
        .iter()
        .filter_map(|&seat| strength_of(seat).map(|hs| (seat, hs)))
        .collect();
    let Some(best) = ranked.iter().map(|(_, hs)| *hs).max() else {
        return eligible.to_vec();
    };
    ranked
        .into_iter()
        .filter(|(_, hs)| *hs == best)
        .map(|(seat, _)| seat)
        .collect()
}

/// Sorts seats by distance clockwise from the dealer, dealer's left first.
pub fn order_from_dealer(seats: &[usize], dealer: usize, seat_count: usize) -> Vec<usize> {
    let n = seat_count.max(1);
    let mut ordered = seats.to_vec();
    ordered.sort_by_key(|&s| (s + n - (dealer % n) - 1) % n);
    ordered
}

/// Splits `amount` evenly across `winners`; the remainder goes one chip at a
/// time to winners in the given order.
pub fn split_pot(amount: u32, winners: &[usize]) -> Vec<(usize, u32)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u32;
    let share = amount / n;
    let remainder = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| (seat, share + u32::from(i < remainder)))
        .collect()
}
