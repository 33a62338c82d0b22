//! The shared decision algorithm.
//!
//! Hand strength is rated 0-10 (a pre-flop chart before the flop, the made
//! hand category after it), scaled to 0.0-1.0 and nudged up when the stack is
//! small relative to the pot. The personality thresholds then choose between
//! fold, check/call and raise; pot odds decide the marginal calls.

use pokerlab_engine::betting::LegalActions;
use pokerlab_engine::cards::Card;
use pokerlab_engine::game::GameSession;
use pokerlab_engine::hand::{evaluate_with_board, Category};
use pokerlab_engine::player::ActionKind;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::personality::PersonalityParams;

/// Everything the algorithm looks at for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionContext {
    pub hole_cards: [Card; 2],
    pub board: Vec<Card>,
    pub current_bet: u32,
    /// Chips in the middle, including this street's bets.
    pub pot: u32,
    pub stack: u32,
    pub legal: LegalActions,
}

impl DecisionContext {
    /// Context for `seat`, or `None` when the seat is not the one to act.
    pub fn from_game(game: &GameSession, seat: usize) -> Option<Self> {
        let legal = game.legal_actions(seat)?;
        let player = game.player(seat)?;
        Some(Self {
            hole_cards: player.hole_cards()?,
            board: game.board().to_vec(),
            current_bet: game.current_bet(),
            pot: game.pot_total(),
            stack: player.stack(),
            legal,
        })
    }

    pub fn to_call(&self) -> u32 {
        self.legal.call_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: ActionKind,
    /// "Raise to" total for raises and all-ins, chips owed for calls, else 0.
    pub amount: u32,
    pub confidence: f32,
    pub reasoning: String,
}

impl Decision {
    fn new(action: ActionKind, amount: u32, confidence: f32, reasoning: String) -> Self {
        Self {
            action,
            amount,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning,
        }
    }
}

/// Pre-flop hand rating on a 0-10 scale.
pub fn preflop_strength(hole: [Card; 2]) -> u8 {
    let (a, b) = (hole[0].rank.value(), hole[1].rank.value());
    let (high, low) = if a >= b { (a, b) } else { (b, a) };
    let suited = hole[0].suit == hole[1].suit;

    if high == low {
        return match high {
            13..=14 => 10,
            11..=12 => 9,
            10 => 8,
            9 => 7,
            8 => 6,
            7 => 5,
            _ => 4,
        };
    }

    // (offsuit, suited) ratings for the broadway combinations
    let chart = match (high, low) {
        (14, 13) => Some((8, 10)),
        (14, 12) => Some((7, 8)),
        (14, 11) => Some((6, 7)),
        (14, 10) => Some((5, 6)),
        (14, _) => Some((4, 5)),
        (13, 12) => Some((6, 7)),
        (13, 11) => Some((5, 6)),
        (13, 10) => Some((4, 5)),
        (12, 11) => Some((5, 6)),
        (12, 10) => Some((4, 5)),
        _ => None,
    };
    if let Some((offsuit, suited_rating)) = chart {
        return if suited { suited_rating } else { offsuit };
    }

    if suited && high - low <= 2 {
        if high >= 9 { 5 } else { 4 }
    } else if high >= 11 && low >= 9 {
        4
    } else if suited {
        3
    } else {
        2
    }
}

/// Post-flop rating of the made hand on a 0-10 scale.
pub fn postflop_strength(hole: [Card; 2], board: &[Card]) -> u8 {
    let hs = evaluate_with_board(&hole, board);
    let base = match hs.category {
        Category::HighCard => 1,
        Category::OnePair => 3,
        Category::TwoPair => 5,
        Category::ThreeOfAKind => 6,
        Category::Straight => 7,
        Category::Flush => 8,
        Category::FullHouse => 9,
        Category::FourOfAKind | Category::StraightFlush | Category::RoyalFlush => 10,
    };
    // A pair made only on the board is worth much less than it looks.
    let board_only = hs.category == Category::OnePair
        && !hole.iter().any(|c| c.rank.value() == hs.kickers[0]);
    let kicker = u8::from(hs.kickers[0] >= 12 && !board_only);
    if board_only { 2 } else { (base + kicker).min(10) }
}

/// Share of the final pot the call represents.
pub fn pot_odds(pot: u32, to_call: u32) -> f32 {
    if to_call == 0 {
        return 0.0;
    }
    to_call as f32 / (pot + to_call) as f32
}

pub fn stack_to_pot(stack: u32, pot: u32) -> f32 {
    stack as f32 / pot.max(1) as f32
}

/// Picks an action for the context. The result is always legal for
/// `ctx.legal`.
pub fn decide(params: &PersonalityParams, ctx: &DecisionContext, rng: &mut dyn RngCore) -> Decision {
    let raw = if ctx.board.is_empty() {
        preflop_strength(ctx.hole_cards)
    } else {
        postflop_strength(ctx.hole_cards, &ctx.board)
    };
    let strength = raw as f32 / 10.0;

    let spr = stack_to_pot(ctx.stack, ctx.pot);
    let commitment = (1.0 - (spr / 4.0).min(1.0)) * params.spr_sensitivity;
    let effective = (strength + 0.2 * commitment).min(1.0);

    let to_call = ctx.to_call();
    let odds = pot_odds(ctx.pot, to_call);
    let legal = &ctx.legal;

    // Both rolls are always drawn so a seeded RNG stays in step.
    let bluff_roll: f32 = rng.random();
    let aggression_roll: f32 = rng.random();

    if legal.can_raise {
        if effective >= params.raise_threshold {
            return raise(params, ctx, effective, format!("value raise, strength {raw}/10 spr {spr:.1}"));
        }
        if bluff_roll < params.bluff_frequency {
            return raise(params, ctx, 1.0 - strength, format!("bluff with strength {raw}/10"));
        }
        if effective >= params.call_threshold && aggression_roll < params.aggression * 0.25 {
            return raise(params, ctx, effective, format!("aggressive raise, strength {raw}/10"));
        }
    }

    if legal.can_check {
        return Decision::new(
            ActionKind::Check,
            0,
            1.0 - effective,
            format!("check, strength {raw}/10"),
        );
    }

    if effective >= params.call_threshold {
        return Decision::new(
            ActionKind::Call,
            legal.call_amount,
            effective,
            format!("call, strength {raw}/10"),
        );
    }
    if effective >= params.fold_threshold && odds <= effective {
        return Decision::new(
            ActionKind::Call,
            legal.call_amount,
            effective - odds,
            format!("call, pot odds {odds:.2} against strength {effective:.2}"),
        );
    }
    Decision::new(
        ActionKind::Fold,
        0,
        1.0 - effective,
        format!("fold, strength {raw}/10 facing {to_call}"),
    )
}

fn raise(params: &PersonalityParams, ctx: &DecisionContext, confidence: f32, reasoning: String) -> Decision {
    let legal = &ctx.legal;
    let sizing = params.bet_sizing * (0.75 + params.aggression * 0.5);
    let pot_after_call = ctx.pot + legal.call_amount;
    let wanted = ctx.current_bet + (pot_after_call as f32 * sizing) as u32;
    let target = wanted.clamp(legal.min_raise_to, legal.max_raise_to);
    if target >= legal.max_raise_to {
        Decision::new(ActionKind::AllIn, legal.max_raise_to, confidence, reasoning)
    } else {
        Decision::new(ActionKind::Raise, target, confidence, reasoning)
    }
}
