//! Command handlers. Each handler takes its parsed arguments plus the output
//! and error streams, and reports failure through [`crate::error::CliError`].

pub mod cfg;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use sim::{SimArgs, handle_sim_command};
