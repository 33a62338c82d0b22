use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The action a seat submits. Raise carries its "raise to" total separately
/// (see [`crate::game::GameSession::apply_action`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Fold and forfeit the hand
    Fold,
    /// Pass without betting; only legal when nothing is owed
    Check,
    /// Match the current bet, or as much of it as the stack allows
    Call,
    /// Raise the street bet to the given total
    Raise,
    /// Commit the entire remaining stack
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all_in",
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
    /// No chips left; skipped by dealing and blinds.
    Eliminated,
}

/// Playing style of an AI seat. The parameters behind each style live in the
/// AI crate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Rock,
    Shark,
    Maniac,
    CallingStation,
    Professional,
    Bluffer,
    Nit,
    Gambler,
}

impl Personality {
    pub const ALL: [Personality; 8] = [
        Personality::Rock,
        Personality::Shark,
        Personality::Maniac,
        Personality::CallingStation,
        Personality::Professional,
        Personality::Bluffer,
        Personality::Nit,
        Personality::Gambler,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Personality::Rock => "The Rock",
            Personality::Shark => "Shark",
            Personality::Maniac => "Maniac",
            Personality::CallingStation => "Calling Station",
            Personality::Professional => "The Pro",
            Personality::Bluffer => "Bluffer",
            Personality::Nit => "Nit",
            Personality::Gambler => "Gambler",
        }
    }
}

/// Who occupies a seat when the table is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub id: String,
    pub name: String,
    pub is_human: bool,
    #[serde(default)]
    pub personality: Option<Personality>,
    /// Overrides the table's starting stack when set.
    #[serde(default)]
    pub stack: Option<u32>,
}

impl SeatConfig {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_human: true,
            personality: None,
            stack: None,
        }
    }

    pub fn ai(id: impl Into<String>, personality: Personality) -> Self {
        Self {
            id: id.into(),
            name: personality.display_name().to_string(),
            is_human: false,
            personality: Some(personality),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: u32) -> Self {
        self.stack = Some(stack);
        self
    }
}

/// A seat at the table with its chips and per-hand betting state.
#[derive(Debug, Clone)]
pub struct Player {
    id: String,
    name: String,
    stack: u32,
    street_bet: u32,
    hand_invested: u32,
    hole: Option<[Card; 2]>,
    status: PlayerStatus,
    is_human: bool,
    personality: Option<Personality>,
}

impl Player {
    pub fn new(config: &SeatConfig, stack: u32) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            stack,
            street_bet: 0,
            hand_invested: 0,
            hole: None,
            status: if stack == 0 {
                PlayerStatus::Eliminated
            } else {
                PlayerStatus::Active
            },
            is_human: config.is_human,
            personality: config.personality,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn street_bet(&self) -> u32 {
        self.street_bet
    }
    pub fn hand_invested(&self) -> u32 {
        self.hand_invested
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn is_human(&self) -> bool {
        self.is_human
    }
    pub fn personality(&self) -> Option<Personality> {
        self.personality
    }
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }

    /// Still contesting the pot (may or may not be able to bet).
    pub fn in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Can still put chips in on this street.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub(crate) fn deal(&mut self, cards: [Card; 2]) {
        self.hole = Some(cards);
    }

    /// Moves up to `amount` chips from the stack into the pot; returns what
    /// was actually committed. Emptying the stack marks the seat all-in.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.street_bet += paid;
        self.hand_invested += paid;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }

    pub(crate) fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }

    pub(crate) fn award(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    pub(crate) fn reset_street(&mut self) {
        self.street_bet = 0;
    }

    /// Clears hand state. Seats without chips become eliminated.
    pub(crate) fn reset_hand(&mut self) {
        self.street_bet = 0;
        self.hand_invested = 0;
        self.hole = None;
        self.status = if self.stack == 0 {
            PlayerStatus::Eliminated
        } else {
            PlayerStatus::Active
        };
    }
}
