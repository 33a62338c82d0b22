//! Personality parameter records.
//!
//! Every AI seat runs the same decision algorithm; personalities only differ
//! in the numbers below.

use pokerlab_engine::player::Personality;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityParams {
    /// 0.0 passive .. 1.0 hyper-aggressive. Drives optional raises with
    /// calling-strength hands and raise sizing.
    pub aggression: f32,
    /// Chance of raising regardless of hand strength when a raise is allowed.
    pub bluff_frequency: f32,
    /// Below this strength the seat gives up against any bet.
    pub fold_threshold: f32,
    /// At or above this strength the seat always continues.
    pub call_threshold: f32,
    /// At or above this strength the seat raises for value.
    pub raise_threshold: f32,
    /// How much a low stack-to-pot ratio pushes the seat towards committing.
    pub spr_sensitivity: f32,
    /// Raise size as a fraction of the pot, before aggression scaling.
    pub bet_sizing: f32,
}

impl PersonalityParams {
    pub const fn new(
        aggression: f32,
        bluff_frequency: f32,
        fold_threshold: f32,
        call_threshold: f32,
        raise_threshold: f32,
        spr_sensitivity: f32,
        bet_sizing: f32,
    ) -> Self {
        Self {
            aggression,
            bluff_frequency,
            fold_threshold,
            call_threshold,
            raise_threshold,
            spr_sensitivity,
            bet_sizing,
        }
    }
}

impl From<Personality> for PersonalityParams {
    fn from(p: Personality) -> Self {
        match p {
            Personality::Rock => Self::new(0.20, 0.02, 0.45, 0.65, 0.80, 0.30, 0.60),
            Personality::Shark => Self::new(0.60, 0.08, 0.35, 0.55, 0.70, 0.70, 0.75),
            Personality::Maniac => Self::new(0.95, 0.30, 0.10, 0.30, 0.45, 0.20, 1.20),
            Personality::CallingStation => Self::new(0.15, 0.02, 0.10, 0.25, 0.85, 0.10, 0.50),
            Personality::Professional => Self::new(0.55, 0.06, 0.35, 0.50, 0.68, 0.80, 0.70),
            Personality::Bluffer => Self::new(0.70, 0.25, 0.30, 0.50, 0.65, 0.40, 0.90),
            Personality::Nit => Self::new(0.10, 0.00, 0.55, 0.75, 0.88, 0.20, 0.50),
            Personality::Gambler => Self::new(0.80, 0.15, 0.15, 0.35, 0.55, 0.30, 1.00),
        }
    }
}

/// Picks `count` distinct personalities in random order, or `None` when more
/// seats are requested than there are personalities.
pub fn assign_personalities(count: usize, rng: &mut dyn RngCore) -> Option<Vec<Personality>> {
    if count > Personality::ALL.len() {
        return None;
    }
    let mut pool = Personality::ALL.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn thresholds_are_ordered_for_every_personality() {
        for p in Personality::ALL {
            let params = PersonalityParams::from(p);
            assert!(params.fold_threshold <= params.call_threshold, "{:?}", p);
            assert!(params.call_threshold <= params.raise_threshold, "{:?}", p);
            assert!((0.0..=1.0).contains(&params.bluff_frequency));
            assert!((0.0..=1.0).contains(&params.aggression));
        }
    }

    #[test]
    fn assignment_has_no_duplicates() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        for n in 0..=8 {
            let picked = assign_personalities(n, &mut rng).unwrap();
            assert_eq!(picked.len(), n);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), n);
        }
        assert!(assign_personalities(9, &mut rng).is_none());
    }

    #[test]
    fn assignment_is_random_per_seed() {
        let a = assign_personalities(8, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        let b = assign_personalities(8, &mut ChaCha20Rng::seed_from_u64(2)).unwrap();
        assert_ne!(a, b);
    }
}
