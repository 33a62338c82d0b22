//! Layered configuration: built-in defaults, then a TOML file named by
//! `POKERLAB_CONFIG`, then `POKERLAB_*` environment variables. Command-line
//! flags are applied on top by the individual commands.

use pokerlab_engine::blinds::BlindSchedule;
use pokerlab_engine::game::TableConfig;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "POKERLAB_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// AI seats used by `sim`
    pub players: usize,
    pub seed: Option<u64>,
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            players: 6,
            seed: None,
            history_capacity: 100,
        }
    }
}

impl Config {
    pub fn table_config(&self, seed: Option<u64>) -> TableConfig {
        TableConfig {
            blinds: BlindSchedule::fixed(self.small_blind, self.big_blind),
            starting_stack: self.starting_stack,
            history_capacity: self.history_capacity,
            seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub players: ValueSource,
    pub seed: ValueSource,
    pub history_capacity: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            players: ValueSource::Default,
            seed: ValueSource::Default,
            history_capacity: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.history_capacity {
            cfg.history_capacity = v;
            sources.history_capacity = ValueSource::File;
        }
    }

    if let Some(v) = env_value("POKERLAB_STARTING_STACK")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_value("POKERLAB_SMALL_BLIND")? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("POKERLAB_BIG_BLIND")? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("POKERLAB_PLAYERS")? {
        cfg.players = v;
        sources.players = ValueSource::Env;
    }
    if let Some(v) = env_value("POKERLAB_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value("POKERLAB_HISTORY_CAPACITY")? {
        cfg.history_capacity = v;
        sources.history_capacity = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

/// Reads and parses an environment variable; unset or empty means absent.
fn env_value<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid value for {}: {:?}", key, raw))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    history_capacity: Option<usize>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.starting_stack == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_stack must be >0".into(),
        ));
    }
    if cfg.small_blind == 0 || cfg.big_blind < cfg.small_blind {
        return Err(ConfigError::Invalid(
            "Invalid configuration: blinds must satisfy 0 < small_blind <= big_blind".into(),
        ));
    }
    if !(2..=8).contains(&cfg.players) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: players must be between 2 and 8".into(),
        ));
    }
    if cfg.history_capacity == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: history_capacity must be >0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write as _;

    const KEYS: &[&str] = &[
        CONFIG_ENV,
        "POKERLAB_STARTING_STACK",
        "POKERLAB_SMALL_BLIND",
        "POKERLAB_BIG_BLIND",
        "POKERLAB_PLAYERS",
        "POKERLAB_SEED",
        "POKERLAB_HISTORY_CAPACITY",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_when_nothing_is_set() {
        clear_env();
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.sources.seed, ValueSource::Default);
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 456\nbig_blind = 20\nplayers = 4").unwrap();
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
            std::env::set_var("POKERLAB_SEED", "99");
        }

        let resolved = load_with_sources().unwrap();
        clear_env();

        assert_eq!(resolved.config.seed, Some(99));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.big_blind, 20);
        assert_eq!(resolved.sources.big_blind, ValueSource::File);
        assert_eq!(resolved.config.players, 4);
        assert_eq!(resolved.sources.starting_stack, ValueSource::Default);
    }

    #[test]
    #[serial]
    fn rejects_bad_values() {
        clear_env();
        unsafe {
            std::env::set_var("POKERLAB_PLAYERS", "many");
        }
        assert!(matches!(load_with_sources(), Err(ConfigError::Invalid(_))));

        unsafe {
            std::env::set_var("POKERLAB_PLAYERS", "9");
        }
        assert!(matches!(load_with_sources(), Err(ConfigError::Invalid(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_file_keys_are_rejected() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = 3").unwrap();
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
        }
        let result = load_with_sources();
        clear_env();
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
