//! Seedable 52-card deck.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// Dealing removes cards; nothing comes back until the next
/// [`Deck::shuffle`]. Successive shuffles continue one RNG stream, so a
/// seeded table replays the same sequence of hands.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
    burned: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    /// A deck in factory order. `None` seeds from operating-system entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_os_rng(),
        };
        Self {
            cards: full_deck(),
            next: 0,
            burned: 0,
            rng,
        }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Gathers every card back and shuffles.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.next = 0;
        self.burned = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let card = *self.cards.get(self.next)?;
        self.next += 1;
        Some(card)
    }

    /// Deals `n` cards, or nothing at all when fewer remain.
    pub fn deal_n(&mut self, n: usize) -> Option<Vec<Card>> {
        let end = self.next.checked_add(n)?;
        let cards = self.cards.get(self.next..end)?.to_vec();
        self.next = end;
        Some(cards)
    }

    /// Discards the top card face down.
    pub fn burn_card(&mut self) {
        if self.deal_card().is_some() {
            self.burned += 1;
        }
    }

    /// Cards burned since the last shuffle.
    pub fn burned(&self) -> usize {
        self.burned
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }
}
