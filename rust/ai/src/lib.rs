//! # pokerlab-ai: AI Opponents
//!
//! One data-driven decision algorithm ([`strategy::decide`]) shared by every
//! AI seat, parameterised per [`Personality`] through
//! [`personality::PersonalityParams`].
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerlab_ai::{create_ai, AIOpponent};
//! use pokerlab_engine::game::{GameSession, TableConfig};
//! use pokerlab_engine::player::{Personality, SeatConfig};
//! use rand::SeedableRng;
//!
//! let seats = vec![
//!     SeatConfig::ai("a", Personality::Shark),
//!     SeatConfig::ai("b", Personality::Rock),
//! ];
//! let config = TableConfig { seed: Some(42), ..TableConfig::default() };
//! let mut game = GameSession::new(config, seats).unwrap();
//! game.start_new_hand().unwrap();
//!
//! let seat = game.to_act().unwrap();
//! let ai = create_ai(Personality::Shark);
//! let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(7);
//! let decision = ai.get_action(&game, seat, &mut rng).unwrap();
//! assert!(game.apply_action(seat, decision.action, decision.amount).is_success());
//! ```

use pokerlab_engine::game::GameSession;
use pokerlab_engine::player::Personality;
use rand::RngCore;

pub mod personality;
pub mod strategy;

pub use personality::{assign_personalities, PersonalityParams};
pub use strategy::{decide, Decision, DecisionContext};

/// Interface for automated seats.
pub trait AIOpponent: Send + Sync {
    /// Chooses an action for `seat`. Returns `None` when the seat is not the
    /// one to act.
    fn get_action(&self, game: &GameSession, seat: usize, rng: &mut dyn RngCore) -> Option<Decision>;

    fn name(&self) -> &str;
}

/// An AI seat driven by a personality's parameters.
#[derive(Debug, Clone)]
pub struct PersonalityAI {
    personality: Personality,
    params: PersonalityParams,
}

impl PersonalityAI {
    pub fn new(personality: Personality) -> Self {
        Self {
            personality,
            params: PersonalityParams::from(personality),
        }
    }

    /// Same algorithm with hand-tuned numbers.
    pub fn with_params(personality: Personality, params: PersonalityParams) -> Self {
        Self { personality, params }
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn params(&self) -> &PersonalityParams {
        &self.params
    }
}

impl AIOpponent for PersonalityAI {
    fn get_action(&self, game: &GameSession, seat: usize, rng: &mut dyn RngCore) -> Option<Decision> {
        let ctx = DecisionContext::from_game(game, seat)?;
        Some(decide(&self.params, &ctx, rng))
    }

    fn name(&self) -> &str {
        self.personality.display_name()
    }
}

pub fn create_ai(personality: Personality) -> Box<dyn AIOpponent> {
    Box::new(PersonalityAI::new(personality))
}
