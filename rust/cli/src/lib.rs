//! # pokerlab CLI Library
//!
//! Command-line front-end for the pokerlab engine. The [`run`] function
//! parses arguments and dispatches to a subcommand, writing to the streams
//! it is given so tests can capture the output.
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let code = pokerlab_cli::run(["pokerlab", "eval", "Ah Kh Qh Jh Th"], &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert!(String::from_utf8(out).unwrap().contains("Royal Flush"));
//! ```
//!
//! ## Subcommands
//!
//! - `sim`: Play an all-AI table and optionally write a JSONL hand history
//! - `eval`: Evaluate 2 to 7 cards
//! - `cfg`: Display the resolved configuration and value sources

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod ui;

use cli::{Commands, PokerlabCli};
use commands::{SimArgs, handle_cfg_command, handle_eval_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["sim", "eval", "cfg"];

/// Parses `args` and runs the selected command.
///
/// Returns [`exit_code::SUCCESS`] or [`exit_code::ERROR`]. Help and version
/// output go to `out` and count as success.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match PokerlabCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    if writeln!(err, "{}", e).is_err()
                        || writeln!(err, "Usage: pokerlab <command> [options]\n").is_err()
                        || writeln!(err, "Commands:").is_err()
                    {
                        return exit_code::ERROR;
                    }
                    for c in COMMANDS {
                        if writeln!(err, "  {}", c).is_err() {
                            return exit_code::ERROR;
                        }
                    }
                    exit_code::ERROR
                }
            };
        }
    };

    if cli.verbose
        && pokerlab_session::init_logging(false).is_err()
        && ui::display_warning(err, "logging already initialised").is_err()
    {
        return exit_code::ERROR;
    }

    let result = match cli.cmd {
        Commands::Sim {
            hands,
            players,
            seed,
            output,
        } => handle_sim_command(
            SimArgs {
                hands,
                players,
                seed,
                output,
            },
            out,
            err,
        ),
        Commands::Eval { cards, json } => handle_eval_command(&cards, json, out),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_parses() {
        let commands = vec![
            vec!["pokerlab", "cfg"],
            vec!["pokerlab", "eval", "As Kd"],
            vec!["pokerlab", "sim", "--hands", "1"],
            vec!["pokerlab", "--verbose", "sim", "--players", "3", "--seed", "1"],
        ];
        for cmd_args in commands {
            let result = PokerlabCli::try_parse_from(&cmd_args);
            assert!(result.is_ok(), "Failed to parse: {:?}", cmd_args);
        }
    }

    #[test]
    fn players_range_is_enforced_by_clap() {
        assert!(PokerlabCli::try_parse_from(["pokerlab", "sim", "--players", "1"]).is_err());
        assert!(PokerlabCli::try_parse_from(["pokerlab", "sim", "--players", "9"]).is_err());
        assert!(PokerlabCli::try_parse_from(["pokerlab", "sim", "--players", "8"]).is_ok());
    }

    #[test]
    fn unknown_command_lists_commands() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["pokerlab", "serve"], &mut out, &mut err);
        assert_eq!(code, exit_code::ERROR);
        let stderr = String::from_utf8(err).unwrap();
        for c in COMMANDS {
            assert!(stderr.contains(c), "{stderr}");
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_logging_warning_fails_the_run() {
        // Make sure a global subscriber exists so --verbose has to warn.
        let _ = pokerlab_session::init_logging(false);
        let mut out = Vec::new();
        let code = run(["pokerlab", "--verbose", "eval", "As Kd"], &mut out, &mut ClosedPipe);
        assert_eq!(code, exit_code::ERROR);
    }

    #[test]
    fn help_goes_to_stdout() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(run(["pokerlab", "--help"], &mut out, &mut err), exit_code::SUCCESS);
        assert!(String::from_utf8(out).unwrap().contains("sim"));
    }
}
