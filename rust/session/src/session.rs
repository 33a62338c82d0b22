use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::settings::{SessionSettings, SettingsError};
use chrono::{DateTime, SecondsFormat, Utc};
use pokerlab_ai::{assign_personalities, create_ai, AIOpponent};
use pokerlab_engine::errors::{ErrorKind, GameError};
use pokerlab_engine::game::{ActionResult, GameSession, Phase, TableConfig, MAX_SEATS, MIN_SEATS};
use pokerlab_engine::history::CompletedHand;
use pokerlab_engine::player::{ActionKind, Personality, SeatConfig};
use pokerlab_engine::snapshot::GameSnapshot;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

/// What a new session looks like. Human seats come first, in the given
/// order, followed by the AI seats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Display names of the human seats.
    pub humans: Vec<String>,
    pub ai_players: usize,
    /// Table rules; the registry's defaults are used when absent.
    #[serde(default)]
    pub table: Option<TableConfig>,
    /// Seeds both the shuffle and the AI decisions.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn new(humans: Vec<String>, ai_players: usize) -> Self {
        Self {
            humans,
            ai_players,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = Some(table);
        self
    }

    pub fn seat_count(&self) -> usize {
        self.humans.len() + self.ai_players
    }

    fn validate(&self) -> Result<(), SessionError> {
        let seats = self.seat_count();
        if !(MIN_SEATS..=MAX_SEATS).contains(&seats) {
            return Err(SessionError::InvalidConfig(format!(
                "a session needs {MIN_SEATS} to {MAX_SEATS} seats, got {seats}"
            )));
        }
        if self.ai_players > Personality::ALL.len() {
            return Err(SessionError::InvalidConfig(format!(
                "at most {} AI players are supported, got {}",
                Personality::ALL.len(),
                self.ai_players
            )));
        }
        if self.humans.iter().any(|name| name.trim().is_empty()) {
            return Err(SessionError::InvalidConfig(
                "human player names cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reply to an action submitted through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Table as seen by the acting seat, after any AI turns that followed.
    pub state: GameSnapshot,
}

/// Registry-level facts about a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: String,
    pub phase: Phase,
    pub hand_number: u64,
    pub seats: usize,
    pub human_seats: Vec<usize>,
}

/// Owns every live table. Each table sits behind its own mutex, held for one
/// external call plus the AI turns it triggers, so calls on one session are
/// serialized while different sessions proceed in parallel.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<ManagedSession>>>,
    settings: SessionSettings,
    session_ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        let settings = SessionSettings::default();
        Self {
            sessions: RwLock::new(HashMap::new()),
            session_ttl: settings.session_ttl(),
            settings,
        }
    }

    pub fn with_settings(settings: SessionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            sessions: RwLock::new(HashMap::new()),
            session_ttl: settings.session_ttl(),
            settings,
        })
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            session_ttl: ttl,
            ..Self::new()
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn create_session(&self, config: SessionConfig) -> Result<SessionId, SessionError> {
        self.create_session_with(config, create_ai)
    }

    /// Like [`create_session`](Self::create_session), with a custom factory
    /// for the AI seats.
    pub fn create_session_with<F>(
        &self,
        config: SessionConfig,
        make_ai: F,
    ) -> Result<SessionId, SessionError>
    where
        F: Fn(Personality) -> Box<dyn AIOpponent>,
    {
        config.validate()?;

        let mut table_config = config
            .table
            .clone()
            .unwrap_or_else(|| self.settings.table_config(None));
        if config.seed.is_some() {
            table_config.seed = config.seed;
        }

        let mut rng = match table_config.seed {
            Some(seed) => {
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                rng.set_stream(1);
                rng
            }
            None => ChaCha20Rng::from_os_rng(),
        };
        let personalities = assign_personalities(config.ai_players, &mut rng).ok_or_else(|| {
            SessionError::InvalidConfig(format!("cannot seat {} AI players", config.ai_players))
        })?;

        let mut seats: Vec<SeatConfig> = config
            .humans
            .iter()
            .enumerate()
            .map(|(i, name)| SeatConfig::human(format!("human-{i}"), name.clone()))
            .collect();
        seats.extend(
            personalities
                .iter()
                .enumerate()
                .map(|(i, &p)| SeatConfig::ai(format!("ai-{i}"), p)),
        );

        let game = GameSession::new(table_config, seats)?;
        let bots = game
            .players()
            .iter()
            .map(|p| match p.personality() {
                Some(personality) if !p.is_human() => Some(make_ai(personality)),
                _ => None,
            })
            .collect();

        let id = Uuid::new_v4().to_string();
        let session = Arc::new(ManagedSession::new(
            id.clone(),
            Table { game, bots, rng },
        ));

        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            if guard.len() >= self.settings.max_sessions {
                return Err(SessionError::CapacityReached(self.settings.max_sessions));
            }
            guard.insert(id.clone(), session);
        }

        tracing::info!(
            session_id = %id,
            humans = config.humans.len(),
            ai_players = config.ai_players,
            seeded = config.seed.is_some(),
            "created game session"
        );
        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<ManagedSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Deals the next hand and plays AI seats until a human must act or the
    /// hand ends.
    pub fn start_new_hand(&self, id: &SessionId) -> Result<GameSnapshot, SessionError> {
        let session = self.live_session(id)?;
        let mut table = session.lock()?;

        let start = table.game.start_new_hand()?;
        tracing::debug!(
            session_id = %id,
            hand = start.hand_number,
            hand_id = %start.hand_id,
            "hand dealt"
        );
        table.auto_play(id)?;

        let viewer = table.first_human();
        Ok(table.game.get_state(viewer))
    }

    /// Submits an action for `seat`. A rejected action leaves the table as it
    /// was and is reported in the response; registry failures and invariant
    /// violations during the AI turns that follow come back as `Err`.
    pub fn apply_action(
        &self,
        id: &SessionId,
        seat: usize,
        kind: ActionKind,
        amount: u32,
    ) -> Result<ActionResponse, SessionError> {
        let session = self.live_session(id)?;
        let mut table = session.lock()?;

        match table.game.apply_action(seat, kind, amount) {
            ActionResult::Success(outcome) => {
                tracing::debug!(
                    session_id = %id,
                    seat,
                    action = %kind,
                    amount = outcome.record.amount,
                    "action applied"
                );
                table.auto_play(id)?;
                Ok(ActionResponse {
                    success: true,
                    error: None,
                    message: None,
                    state: table.game.get_state(Some(seat)),
                })
            }
            ActionResult::Rejected(err) => {
                if !err.is_recoverable() {
                    return Err(SessionError::Game(err));
                }
                Ok(ActionResponse {
                    success: false,
                    error: Some(err.kind()),
                    message: Some(err.to_string()),
                    state: table.game.get_state(Some(seat)),
                })
            }
        }
    }

    pub fn get_state(
        &self,
        id: &SessionId,
        viewer: Option<usize>,
    ) -> Result<GameSnapshot, SessionError> {
        let session = self.live_session(id)?;
        let table = session.lock()?;
        Ok(table.game.get_state(viewer))
    }

    /// Completed hands, newest first.
    pub fn get_history(
        &self,
        id: &SessionId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CompletedHand>, SessionError> {
        let session = self.live_session(id)?;
        let table = session.lock()?;
        Ok(table.game.get_history(limit, offset))
    }

    pub fn session_info(&self, id: &SessionId) -> Result<SessionInfo, SessionError> {
        let session = self.live_session(id)?;
        let table = session.lock()?;
        Ok(SessionInfo {
            id: id.clone(),
            created_at: session.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            phase: table.game.phase(),
            hand_number: table.game.hand_number(),
            seats: table.game.players().len(),
            human_seats: table.human_seats(),
        })
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(id)? {
            Some(_) => {
                tracing::info!(session_id = %id, "session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.clone())),
        }
    }

    /// Drops every session idle for longer than the TTL. Returns how many
    /// were removed.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, session| {
                if session.is_expired(self.session_ttl) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
        }

        for id in &expired {
            tracing::info!(session_id = %id, "session expired due to inactivity");
        }
        expired.len()
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Runs [`cleanup_expired_sessions`](Self::cleanup_expired_sessions)
    /// every `period` on the current tokio runtime.
    pub fn spawn_cleanup_task(
        self: &Arc<Self>,
        period: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let removed = manager.cleanup_expired_sessions();
                if removed > 0 {
                    tracing::debug!(removed, "expired sessions cleaned up");
                }
            }
        })
    }

    fn live_session(&self, id: &SessionId) -> Result<Arc<ManagedSession>, SessionError> {
        let session = self.get_session(id)?;
        if session.is_expired(self.session_ttl) {
            if self.remove_session(id)?.is_some() {
                tracing::info!(session_id = %id, "session expired due to inactivity");
            }
            return Err(SessionError::Expired(id.clone()));
        }
        session.touch();
        Ok(session)
    }

    fn remove_session(
        &self,
        id: &SessionId,
    ) -> Result<Option<Arc<ManagedSession>>, SessionError> {
        match self.sessions.write() {
            Ok(mut guard) => Ok(guard.remove(id)),
            Err(_) => Err(SessionError::StoragePoisoned),
        }
    }
}

/// A registered table with its AI seats and idle tracking.
pub struct ManagedSession {
    id: SessionId,
    table: Mutex<Table>,
    created_at: DateTime<Utc>,
    last_active: Mutex<Instant>,
}

impl std::fmt::Debug for ManagedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedSession")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

struct Table {
    game: GameSession,
    /// Indexed by seat; `None` for human seats.
    bots: Vec<Option<Box<dyn AIOpponent>>>,
    rng: ChaCha20Rng,
}

impl ManagedSession {
    fn new(id: SessionId, table: Table) -> Self {
        Self {
            id,
            table: Mutex::new(table),
            created_at: Utc::now(),
            last_active: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, SessionError> {
        self.table.lock().map_err(|_| SessionError::StoragePoisoned)
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
impl ManagedSession {
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }
}

impl Table {
    fn first_human(&self) -> Option<usize> {
        self.bots.iter().position(|bot| bot.is_none())
    }

    fn human_seats(&self) -> Vec<usize> {
        self.bots
            .iter()
            .enumerate()
            .filter(|(_, bot)| bot.is_none())
            .map(|(seat, _)| seat)
            .collect()
    }

    /// Plays AI seats while one of them is to act. An AI action the table
    /// rejects is replaced by a forced fold, so every iteration moves the
    /// hand forward.
    fn auto_play(&mut self, session_id: &SessionId) -> Result<usize, GameError> {
        let Table { game, bots, rng } = self;
        let mut played = 0;

        while let Some(seat) = game.to_act() {
            let Some(bot) = bots.get(seat).and_then(|b| b.as_deref()) else {
                break;
            };

            match bot.get_action(&*game, seat, &mut *rng) {
                Some(decision) => match game.apply_action(seat, decision.action, decision.amount) {
                    ActionResult::Success(_) => {
                        tracing::trace!(
                            session_id = %session_id,
                            seat,
                            action = %decision.action,
                            amount = decision.amount,
                            reasoning = %decision.reasoning,
                            "AI acted"
                        );
                    }
                    ActionResult::Rejected(err) if !err.is_recoverable() => {
                        return Err(err);
                    }
                    ActionResult::Rejected(err) => {
                        tracing::warn!(
                            session_id = %session_id,
                            seat,
                            ai = bot.name(),
                            action = %decision.action,
                            amount = decision.amount,
                            error = %err,
                            "AI action rejected, folding instead"
                        );
                        game.force_fold(seat)?;
                    }
                },
                None => {
                    tracing::warn!(
                        session_id = %session_id,
                        seat,
                        ai = bot.name(),
                        "AI produced no action, folding instead"
                    );
                    game.force_fold(seat)?;
                }
            }
            played += 1;
        }

        Ok(played)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
    #[error("Session limit of {0} reached")]
    CapacityReached(usize),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl SessionError {
    /// Engine classification, when the failure came from the table.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            SessionError::Game(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl IntoErrorResponse for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Expired(_) => "session_expired",
            SessionError::InvalidConfig(_) => "invalid_config",
            SessionError::CapacityReached(_) => "capacity_reached",
            SessionError::Game(err) => match err.kind() {
                ErrorKind::Validation => "validation_error",
                ErrorKind::State => "state_error",
                ErrorKind::InvariantViolation => "invariant_violation",
            },
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({
                "session_id": id
            })),
            SessionError::Expired(id) => Some(serde_json::json!({
                "session_id": id,
                "reason": "Session expired due to inactivity"
            })),
            SessionError::Game(err) => Some(serde_json::json!({
                "kind": err.kind()
            })),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::CapacityReached(_) => ErrorSeverity::Server,
            SessionError::Game(err) => ErrorSeverity::from(err.kind()),
            _ => ErrorSeverity::Client,
        }
    }
}
