use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::betting::{BettingRound, LegalActions, RoundStatus, Street};
use crate::blinds::{
    assign_positions, funded_seats, post_blinds, BlindLevel, BlindSchedule, Positions,
    PostedBlinds,
};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{evaluate_with_board, HandStrength};
use crate::history::{
    format_hand_id, ActionRecord, CompletedHand, HandHistory, SeatResult, ShowdownHand,
};
use crate::player::{ActionKind, Player, SeatConfig};
use crate::pot::{Contribution, PotManager};
use crate::snapshot::{GameSnapshot, SeatSnapshot};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub blinds: BlindSchedule,
    pub starting_stack: u32,
    /// Completed hands kept in memory.
    pub history_capacity: usize,
    /// Fixed shuffle seed; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            blinds: BlindSchedule::fixed(5, 10),
            starting_stack: 1000,
            history_capacity: 100,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        self.blinds.validate()?;
        if self.starting_stack == 0 {
            return Err(GameError::InvalidConfig(
                "starting_stack must be greater than 0".into(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(GameError::InvalidConfig(
                "history_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Where the table is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No hand has been dealt yet.
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    /// The last hand is settled; the next one can start.
    Showdown,
    /// Fewer than two seats have chips.
    GameOver,
    /// An invariant check failed; every operation is refused.
    Frozen,
}

impl From<Street> for Phase {
    fn from(street: Street) -> Self {
        match street {
            Street::PreFlop => Phase::PreFlop,
            Street::Flop => Phase::Flop,
            Street::Turn => Phase::Turn,
            Street::River => Phase::River,
            Street::Showdown => Phase::Showdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandStart {
    pub hand_number: u64,
    pub hand_id: String,
    pub positions: Positions,
    pub blinds: BlindLevel,
    pub posted: PostedBlinds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub record: ActionRecord,
    pub next_to_act: Option<usize>,
    pub phase: Phase,
    pub hand_complete: bool,
}

/// Result of submitting an action: either applied, or rejected with the
/// state left untouched (except for invariant failures, which freeze the
/// table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Success(ActionOutcome),
    Rejected(GameError),
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn error(&self) -> Option<&GameError> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::Rejected(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<ActionOutcome, GameError> {
        match self {
            ActionResult::Success(o) => Ok(o),
            ActionResult::Rejected(e) => Err(e),
        }
    }
}

#[derive(Debug)]
struct HandInProgress {
    hand_id: String,
    started: DateTime<Utc>,
    blinds: BlindLevel,
    posted: PostedBlinds,
    starting_stacks: Vec<u32>,
    actions: Vec<ActionRecord>,
}

/// Authoritative state of one table across hands.
#[derive(Debug)]
pub struct GameSession {
    config: TableConfig,
    players: Vec<Player>,
    deck: Deck,
    board: Vec<Card>,
    positions: Option<Positions>,
    round: Option<BettingRound>,
    hand: Option<HandInProgress>,
    phase: Phase,
    hand_number: u64,
    history: HandHistory,
    total_chips: u64,
}

impl GameSession {
    pub fn new(config: TableConfig, seats: Vec<SeatConfig>) -> Result<Self, GameError> {
        config.validate()?;
        if !(MIN_SEATS..=MAX_SEATS).contains(&seats.len()) {
            return Err(GameError::InvalidConfig(format!(
                "a table needs {MIN_SEATS} to {MAX_SEATS} seats, got {}",
                seats.len()
            )));
        }
        let players: Vec<Player> = seats
            .iter()
            .map(|s| Player::new(s, s.stack.unwrap_or(config.starting_stack)))
            .collect();
        if funded_seats(&players) < MIN_SEATS {
            return Err(GameError::InvalidConfig(
                "at least two seats need chips".into(),
            ));
        }
        let total_chips = players.iter().map(|p| p.stack() as u64).sum();
        let deck = Deck::new(config.seed);
        let history = HandHistory::with_capacity(config.history_capacity);
        Ok(Self {
            config,
            players,
            deck,
            board: Vec::with_capacity(5),
            positions: None,
            round: None,
            hand: None,
            phase: Phase::Waiting,
            hand_number: 0,
            history,
            total_chips,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn positions(&self) -> Option<Positions> {
        self.positions
    }
    pub fn total_chips(&self) -> u64 {
        self.total_chips
    }
    pub fn is_frozen(&self) -> bool {
        self.phase == Phase::Frozen
    }
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
    pub fn hand_in_progress(&self) -> bool {
        self.hand.is_some()
    }
    pub fn to_act(&self) -> Option<usize> {
        self.round.as_ref().and_then(BettingRound::to_act)
    }
    pub fn street(&self) -> Option<Street> {
        self.round.as_ref().map(BettingRound::street)
    }
    pub fn current_bet(&self) -> u32 {
        self.round.as_ref().map_or(0, BettingRound::current_bet)
    }
    pub fn last_raise(&self) -> u32 {
        self.round
            .as_ref()
            .map_or(self.current_blinds().big, BettingRound::last_raise)
    }
    pub fn pot_total(&self) -> u32 {
        pot_total(&self.players)
    }

    /// Blinds in force for the current (or next) hand.
    pub fn current_blinds(&self) -> BlindLevel {
        match &self.hand {
            Some(hand) => hand.blinds,
            None => self.config.blinds.level_for_hand(self.hand_number + 1),
        }
    }

    pub fn legal_actions(&self, seat: usize) -> Option<LegalActions> {
        self.round.as_ref()?.legal_actions(&self.players, seat)
    }

    /// Shuffles, rotates the button, posts blinds and deals hole cards.
    ///
    /// Fails with [`GameError::TableCollapsed`] once fewer than two seats
    /// have chips; the table is then over for good.
    pub fn start_new_hand(&mut self) -> Result<HandStart, GameError> {
        self.ensure_not_frozen()?;
        if self.hand.is_some() {
            return Err(GameError::HandInProgress);
        }
        if self.phase == Phase::GameOver {
            return Err(GameError::TableCollapsed);
        }

        for p in &mut self.players {
            p.reset_hand();
        }
        let previous_dealer = self.positions.map(|p| p.dealer);
        let positions = match assign_positions(&self.players, previous_dealer) {
            Ok(p) => p,
            Err(e) => {
                tracing::info!(hands_played = self.hand_number, "table collapsed, game over");
                self.phase = Phase::GameOver;
                return Err(e);
            }
        };

        self.hand_number += 1;
        let blinds = self.config.blinds.level_for_hand(self.hand_number);
        let starting_stacks: Vec<u32> = self.players.iter().map(Player::stack).collect();

        self.board.clear();
        self.deck.shuffle();
        if let Err(e) = self.deal_hole_cards(positions.dealer) {
            self.freeze(&e);
            return Err(e);
        }
        let posted = post_blinds(&mut self.players, &positions, blinds);

        let started = Utc::now();
        let hand_id = format_hand_id(&started.format("%Y%m%d").to_string(), self.hand_number);
        self.hand = Some(HandInProgress {
            hand_id: hand_id.clone(),
            started,
            blinds,
            posted,
            starting_stacks,
            actions: Vec::new(),
        });
        self.positions = Some(positions);

        let mut round = BettingRound::preflop(&self.players, blinds.big);
        let status = round.advance(&self.players, positions.big_blind);
        self.round = Some(round);
        self.phase = Phase::PreFlop;

        tracing::info!(
            hand = self.hand_number,
            hand_id = %hand_id,
            dealer = positions.dealer,
            small_blind = blinds.small,
            big_blind = blinds.big,
            "hand started"
        );

        self.settle_or_freeze(status)?;
        self.verify_chips()?;

        Ok(HandStart {
            hand_number: self.hand_number,
            hand_id,
            positions,
            blinds,
            posted,
        })
    }

    /// Applies an action for `seat`. For [`ActionKind::Raise`], `amount` is
    /// the street total to raise to; it is ignored for the other actions.
    pub fn apply_action(&mut self, seat: usize, kind: ActionKind, amount: u32) -> ActionResult {
        match self.try_apply(seat, kind, amount, false) {
            Ok(outcome) => ActionResult::Success(outcome),
            Err(e) => {
                tracing::debug!(hand = self.hand_number, seat, action = %kind, amount, error = %e, "action rejected");
                ActionResult::Rejected(e)
            }
        }
    }

    /// Folds the seat to act on its behalf. Folding is always legal for the
    /// seat whose turn it is, so this only fails for the wrong seat or when
    /// no hand is running.
    pub fn force_fold(&mut self, seat: usize) -> Result<ActionOutcome, GameError> {
        tracing::warn!(hand = self.hand_number, seat, "forcing fold");
        self.try_apply(seat, ActionKind::Fold, 0, true)
    }

    pub fn get_state(&self, viewer: Option<usize>) -> GameSnapshot {
        let positions = self.positions;
        let pots = if self.hand.is_some() {
            PotManager::from_contributions(&contributions(&self.players))
                .pots()
                .to_vec()
        } else {
            Vec::new()
        };
        let seats = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| SeatSnapshot {
                seat,
                id: p.id().to_string(),
                name: p.name().to_string(),
                stack: p.stack(),
                bet: p.street_bet(),
                invested: p.hand_invested(),
                status: p.status(),
                is_human: p.is_human(),
                personality: p.personality(),
                hole_cards: if viewer == Some(seat) {
                    p.hole_cards()
                } else {
                    None
                },
            })
            .collect();
        GameSnapshot {
            phase: self.phase,
            hand_number: self.hand_number,
            pot: self.pot_total(),
            pots,
            current_bet: self.current_bet(),
            last_raise: self.last_raise(),
            board: self.board.clone(),
            dealer: positions.map(|p| p.dealer),
            small_blind: positions.map(|p| p.small_blind),
            big_blind: positions.map(|p| p.big_blind),
            to_act: self.to_act(),
            blinds: self.current_blinds(),
            blind_level: self
                .config
                .blinds
                .level_index(self.hand_number.max(1)),
            seats,
            legal_actions: viewer.and_then(|seat| self.legal_actions(seat)),
            last_hand: self.history.latest().cloned(),
        }
    }

    /// Completed hands, newest first.
    pub fn get_history(&self, limit: usize, offset: usize) -> Vec<CompletedHand> {
        self.history.page(limit, offset)
    }

    pub fn last_completed_hand(&self) -> Option<&CompletedHand> {
        self.history.latest()
    }

    fn try_apply(
        &mut self,
        seat: usize,
        kind: ActionKind,
        amount: u32,
        forced: bool,
    ) -> Result<ActionOutcome, GameError> {
        self.ensure_not_frozen()?;
        let round = self.round.as_mut().ok_or(GameError::NoHandInProgress)?;
        let street = round.street();
        let stack_before = self
            .players
            .get(seat)
            .map(Player::stack)
            .ok_or(GameError::UnknownSeat(seat))?;
        let pot_before = pot_total(&self.players);

        let applied = round.apply(&mut self.players, seat, kind, amount)?;

        let record = ActionRecord {
            seat,
            street,
            action: applied.kind,
            amount: applied.committed,
            stack_before,
            stack_after: self.players[seat].stack(),
            pot_before,
            pot_after: pot_total(&self.players),
            forced,
        };
        tracing::debug!(
            hand = self.hand_number,
            seat,
            action = %applied.kind,
            amount = applied.committed,
            full_raise = applied.full_raise,
            "action applied"
        );
        if let Some(hand) = self.hand.as_mut() {
            hand.actions.push(record.clone());
        }

        self.settle_or_freeze(applied.status)?;
        self.verify_chips()?;

        Ok(ActionOutcome {
            record,
            next_to_act: self.to_act(),
            phase: self.phase,
            hand_complete: self.hand.is_none(),
        })
    }

    fn settle_or_freeze(&mut self, status: RoundStatus) -> Result<(), GameError> {
        self.settle(status).inspect_err(|e| self.freeze(e))
    }

    /// Runs street transitions until someone has to act or the hand is over.
    fn settle(&mut self, mut status: RoundStatus) -> Result<(), GameError> {
        loop {
            match status {
                RoundStatus::Continue { .. } => return Ok(()),
                RoundStatus::HandOver => return self.finish_hand(),
                RoundStatus::StreetComplete => {
                    let street = self
                        .round
                        .as_ref()
                        .map(BettingRound::street)
                        .ok_or(GameError::NoHandInProgress)?;
                    let next = street.next();
                    let bettors = self.players.iter().filter(|p| p.can_act()).count();
                    if next == Street::Showdown || bettors <= 1 {
                        // Nobody can bet any more: run the board out.
                        self.deal_board_to(Street::River.board_len())?;
                        return self.finish_hand();
                    }

                    self.deal_board_to(next.board_len())?;
                    for p in &mut self.players {
                        p.reset_street();
                    }
                    let dealer = self.positions.map_or(0, |p| p.dealer);
                    let round = self.round.as_mut().ok_or(GameError::NoHandInProgress)?;
                    round.start_street(next, &self.players);
                    status = round.advance(&self.players, dealer);
                    self.phase = Phase::from(next);
                    tracing::debug!(hand = self.hand_number, street = ?next, board = self.board.len(), "street dealt");
                }
            }
        }
    }

    fn deal_hole_cards(&mut self, dealer: usize) -> Result<(), GameError> {
        let n = self.players.len();
        let order: Vec<usize> = (1..=n)
            .map(|step| (dealer + step) % n)
            .filter(|&i| self.players[i].can_act())
            .collect();
        let first = self
            .deck
            .deal_n(order.len())
            .ok_or(GameError::DeckExhausted)?;
        let second = self
            .deck
            .deal_n(order.len())
            .ok_or(GameError::DeckExhausted)?;
        for (i, &seat) in order.iter().enumerate() {
            self.players[seat].deal([first[i], second[i]]);
        }
        Ok(())
    }

    fn deal_board_to(&mut self, len: usize) -> Result<(), GameError> {
        while self.board.len() < len {
            self.deck.burn_card();
            let count = if self.board.is_empty() { 3 } else { 1 };
            let cards = self.deck.deal_n(count).ok_or(GameError::DeckExhausted)?;
            self.board.extend(cards);
        }
        Ok(())
    }

    fn finish_hand(&mut self) -> Result<(), GameError> {
        let hand = self.hand.take().ok_or(GameError::NoHandInProgress)?;
        let positions = self.positions.ok_or(GameError::NoHandInProgress)?;
        self.round = None;

        let pots = PotManager::from_contributions(&contributions(&self.players));
        let contenders = self.players.iter().filter(|p| p.in_hand()).count();

        let mut strengths: Vec<Option<HandStrength>> = vec![None; self.players.len()];
        let mut showdown = Vec::new();
        if contenders > 1 {
            for (seat, p) in self.players.iter().enumerate() {
                let Some(hole) = p.hole_cards().filter(|_| p.in_hand()) else {
                    continue;
                };
                let hs = evaluate_with_board(&hole, &self.board);
                strengths[seat] = Some(hs);
                showdown.push(ShowdownHand {
                    seat,
                    hole_cards: hole,
                    category: hs.category,
                    strength: hs.value(),
                });
            }
        }

        let awards = pots.distribute(self.players.len(), positions.dealer, |seat| {
            strengths.get(seat).copied().flatten()
        });
        for award in &awards {
            for &(seat, chips) in &award.shares {
                self.players[seat].award(chips);
            }
        }
        for p in &mut self.players {
            p.reset_hand();
        }

        let results = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| {
                let starting_stack = hand.starting_stacks[seat];
                SeatResult {
                    seat,
                    starting_stack,
                    final_stack: p.stack(),
                    net: p.stack() as i64 - starting_stack as i64,
                }
            })
            .collect();

        let completed = CompletedHand {
            hand_id: hand.hand_id,
            hand_number: self.hand_number,
            seed: self.config.seed,
            ts: hand.started.to_rfc3339_opts(SecondsFormat::Secs, true),
            dealer: positions.dealer,
            small_blind: positions.small_blind,
            big_blind: positions.big_blind,
            blinds: hand.blinds,
            posted: hand.posted,
            board: self.board.clone(),
            actions: hand.actions,
            pots: pots.pots().to_vec(),
            awards,
            showdown,
            results,
        };
        tracing::info!(
            hand = completed.hand_number,
            pot = completed.total_pot(),
            winners = ?completed.winners(),
            showdown = completed.went_to_showdown(),
            "hand complete"
        );
        self.history.push(completed);

        self.phase = if funded_seats(&self.players) < MIN_SEATS {
            tracing::info!(hands_played = self.hand_number, "table collapsed, game over");
            Phase::GameOver
        } else {
            Phase::Showdown
        };
        Ok(())
    }

    /// Stacks plus chips in the pot must always equal the chips the table
    /// started with.
    fn verify_chips(&mut self) -> Result<(), GameError> {
        let actual: u64 = self
            .players
            .iter()
            .map(|p| p.stack() as u64 + p.hand_invested() as u64)
            .sum();
        if actual != self.total_chips {
            let err = GameError::ChipsNotConserved {
                expected: self.total_chips,
                actual,
            };
            self.freeze(&err);
            return Err(err);
        }
        Ok(())
    }

    fn freeze(&mut self, cause: &GameError) {
        tracing::error!(hand = self.hand_number, error = %cause, "invariant violated, freezing table");
        self.phase = Phase::Frozen;
    }

    fn ensure_not_frozen(&self) -> Result<(), GameError> {
        if self.phase == Phase::Frozen {
            Err(GameError::SessionFrozen)
        } else {
            Ok(())
        }
    }
}

fn pot_total(players: &[Player]) -> u32 {
    players.iter().map(Player::hand_invested).sum()
}

fn contributions(players: &[Player]) -> Vec<Contribution> {
    players
        .iter()
        .enumerate()
        .map(|(seat, p)| Contribution {
            seat,
            amount: p.hand_invested(),
            folded: !p.in_hand(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Personality;

    fn table(stacks: &[u32]) -> GameSession {
        let seats = stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| SeatConfig::ai(format!("bot{i}"), Personality::ALL[i]).with_stack(s))
            .collect();
        let config = TableConfig {
            seed: Some(7),
            ..TableConfig::default()
        };
        GameSession::new(config, seats).expect("table")
    }

    #[test]
    fn chip_mismatch_freezes_the_table() {
        let mut game = table(&[1000, 1000, 1000]);
        game.start_new_hand().unwrap();
        game.players[0].award(1);
        let err = game.verify_chips().unwrap_err();
        assert!(matches!(err, GameError::ChipsNotConserved { .. }));
        assert!(game.is_frozen());

        let seat = game.to_act().unwrap();
        let result = game.apply_action(seat, ActionKind::Fold, 0);
        assert_eq!(result.error(), Some(&GameError::SessionFrozen));
        assert_eq!(game.start_new_hand(), Err(GameError::SessionFrozen));
    }

    #[test]
    fn hole_cards_are_dealt_to_funded_seats_only() {
        let mut game = table(&[1000, 0, 1000, 1000]);
        game.start_new_hand().unwrap();
        assert!(game.players[1].hole_cards().is_none());
        assert!(game.players[0].hole_cards().is_some());
        assert!(game.players[2].hole_cards().is_some());
        assert!(game.players[3].hole_cards().is_some());
        // 6 hole cards dealt
        assert_eq!(game.deck.remaining(), 46);
    }

    #[test]
    fn board_burns_before_each_street() {
        let mut game = table(&[1000, 1000]);
        game.start_new_hand().unwrap();
        game.deal_board_to(5).unwrap();
        assert_eq!(game.board.len(), 5);
        // 4 hole + 3 burns + 5 board
        assert_eq!(game.deck.burned(), 3);
        assert_eq!(game.deck.remaining(), 52 - 12);
    }
}
