//! # pokerlab-engine: Texas Hold'em Table Engine
//!
//! A multi-seat (2-10) no-limit Texas Hold'em engine. One [`GameSession`]
//! owns a table across hands: it rotates the button, posts blinds, validates
//! every action against the betting rules, builds side pots and pays them out
//! with odd chips going clockwise from the dealer.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and parsing
//! - [`deck`] - Seedable 52-card deck with ChaCha20 shuffling
//! - [`hand`] - 5-7 card hand evaluation and comparison
//! - [`player`] - Seat configuration, stacks and player status
//! - [`pot`] - Main/side pot construction and distribution
//! - [`betting`] - Turn order, minimum raise and reopening rules
//! - [`blinds`] - Button rotation, blind posting and blind schedules
//! - [`game`] - Hand lifecycle orchestration ([`GameSession`])
//! - [`snapshot`] - Read-only table views
//! - [`history`] - Completed hand records and JSONL export
//! - [`errors`] - Error types and their classification
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerlab_engine::game::{GameSession, TableConfig};
//! use pokerlab_engine::player::{ActionKind, SeatConfig};
//!
//! let seats = vec![
//!     SeatConfig::human("alice", "Alice"),
//!     SeatConfig::human("bob", "Bob"),
//!     SeatConfig::human("carol", "Carol"),
//! ];
//! let config = TableConfig { seed: Some(42), ..TableConfig::default() };
//! let mut game = GameSession::new(config, seats).unwrap();
//! game.start_new_hand().unwrap();
//!
//! let seat = game.to_act().unwrap();
//! let result = game.apply_action(seat, ActionKind::Call, 0);
//! assert!(result.is_success());
//! assert_eq!(game.pot_total(), 25);
//! ```
//!
//! ## Hand Evaluation
//!
//! ```rust
//! use pokerlab_engine::cards::parse_cards;
//! use pokerlab_engine::hand::{evaluate_hand, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! assert_eq!(evaluate_hand(&cards).category, Category::RoyalFlush);
//! ```

pub mod betting;
pub mod blinds;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod history;
pub mod player;
pub mod pot;
pub mod snapshot;

pub use errors::{ErrorKind, GameError};
pub use game::{ActionResult, GameSession, Phase, TableConfig};
