//! The `sim` command: an all-AI table played hand by hand through the
//! session registry, optionally recorded as JSONL.
//!
//! ```no_run
//! use pokerlab_cli::commands::sim::{SimArgs, handle_sim_command};
//! use std::io;
//!
//! let args = SimArgs { hands: 1000, players: Some(6), seed: Some(42), output: Some("data/sim.jsonl".into()) };
//! handle_sim_command(args, &mut io::stdout(), &mut io::stderr()).unwrap();
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use pokerlab_engine::errors::GameError;
use pokerlab_engine::history::HandLogger;
use pokerlab_session::{SessionConfig, SessionError, SessionManager};
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct SimArgs {
    pub hands: u64,
    /// Overrides the configured number of AI seats
    pub players: Option<u8>,
    /// Overrides the configured seed
    pub seed: Option<u64>,
    pub output: Option<String>,
}

pub fn handle_sim_command(
    args: SimArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if args.hands == 0 {
        ui::write_error(err, "hands must be >= 1")?;
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }

    let cfg = match config::load_with_sources() {
        Ok(resolved) => resolved.config,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(e));
        }
    };
    let players = args.players.map(usize::from).unwrap_or(cfg.players);
    let seed = args.seed.or(cfg.seed).unwrap_or_else(rand::random);

    let mut logger = match args.output.as_deref() {
        Some(path) => match HandLogger::create(path) {
            Ok(logger) => Some(logger),
            Err(e) => {
                ui::write_error(err, &format!("Failed to open output file: {}", e))?;
                return Err(CliError::Io(e));
            }
        },
        None => None,
    };

    let manager = SessionManager::new();
    let id = manager.create_session(
        SessionConfig::new(Vec::new(), players)
            .with_table(cfg.table_config(None))
            .with_seed(seed),
    )?;
    let expected_chips = cfg.starting_stack as u64 * players as u64;

    let mut played = 0u64;
    let mut showdowns = 0u64;
    while played < args.hands {
        let state = match manager.start_new_hand(&id) {
            Ok(state) => state,
            Err(SessionError::Game(GameError::TableCollapsed)) => {
                ui::display_warning(
                    err,
                    &format!("table collapsed after {} hands", played),
                )?;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if state.chip_total() != expected_chips {
            return Err(CliError::Engine(format!(
                "chip total {} does not match {}",
                state.chip_total(),
                expected_chips
            )));
        }
        let Some(hand) = state.last_hand else {
            return Err(CliError::Engine("hand did not complete".to_string()));
        };
        if hand.went_to_showdown() {
            showdowns += 1;
        }
        if let Some(logger) = logger.as_mut() {
            logger.write(&hand)?;
        }
        played += 1;
    }

    if let Some(logger) = logger.as_mut() {
        logger.flush()?;
    }

    let final_state = manager.get_state(&id, None)?;
    writeln!(out, "Simulated: {} hands (seed {})", played, seed)?;
    writeln!(out, "Showdowns: {}", showdowns)?;
    for seat in &final_state.seats {
        writeln!(out, "  seat {} {:<16} {:>8}", seat.seat, seat.name, seat.stack)?;
    }
    if let Some(path) = args.output.as_deref() {
        writeln!(out, "Wrote {} hands to {}", played, path)?;
    }
    Ok(())
}
