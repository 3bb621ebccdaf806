use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agents::AgentKind;
use crate::error::ConfigError;

/// Slowest and fastest accepted speed settings
pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 100;

/// Largest accepted match length
pub const MAX_TOTAL_ROUNDS: usize = 10_000_000;

/// Tick delay for a speed setting: speed 1 waits 100, speed 100 waits 1
pub fn tick_delay_for_speed(speed: u32) -> usize {
    let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    (MAX_SPEED + 1 - speed) as usize
}

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub arena: ArenaSettings,
    pub agents: AgentParams,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub total_rounds: usize,
    pub speed: u32,
    pub seed: u64,
    pub agent_a: String,
    pub agent_b: String,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        ArenaSettings {
            total_rounds: 5000,
            speed: 50,
            seed: 42,
            agent_a: AgentKind::Random.key().to_string(),
            agent_b: AgentKind::MarkovChain.key().to_string(),
        }
    }
}

/// Tunable parameters of the agents that take any
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    pub markov_window: usize,
    pub markov_exploration: f64,
    pub q_learning_rate: f64,
    pub q_discount: f64,
    pub q_exploration: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        AgentParams {
            markov_window: 3,
            markov_exploration: 0.1,
            q_learning_rate: 0.1,
            q_discount: 0.9,
            q_exploration: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub write_series_csv: bool,
    pub write_summary_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: PathBuf::from("results"),
            write_series_csv: true,
            write_summary_json: true,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            arena: ArenaSettings::default(),
            agents: AgentParams::default(),
            output: OutputSettings::default(),
        }
    }
}

impl ArenaConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ArenaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn agent_a(&self) -> Result<AgentKind, ConfigError> {
        self.arena.agent_a.parse()
    }

    pub fn agent_b(&self) -> Result<AgentKind, ConfigError> {
        self.arena.agent_b.parse()
    }

    pub fn tick_delay(&self) -> usize {
        tick_delay_for_speed(self.arena.speed)
    }

    /// Simulated time by which every round has been played, with room for
    /// the finishing tick
    pub fn horizon(&self) -> usize {
        self.arena
            .total_rounds
            .saturating_add(1)
            .saturating_mul(self.tick_delay())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent_a()?;
        self.agent_b()?;

        if self.arena.total_rounds > MAX_TOTAL_ROUNDS {
            return Err(ConfigError::Validation(format!(
                "arena.total_rounds must be <= {}",
                MAX_TOTAL_ROUNDS
            )));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.arena.speed) {
            return Err(ConfigError::Validation(format!(
                "arena.speed must be in [{}, {}]",
                MIN_SPEED, MAX_SPEED
            )));
        }
        self.agents.validate()
    }
}

impl AgentParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markov_window == 0 {
            return Err(ConfigError::Validation(
                "agents.markov_window must be > 0".into(),
            ));
        }
        let probabilities = [
            ("agents.markov_exploration", self.markov_exploration),
            ("agents.q_learning_rate", self.q_learning_rate),
            ("agents.q_discount", self.q_discount),
            ("agents.q_exploration", self.q_exploration),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{} must be in [0, 1]",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arena.total_rounds, 5000);
        assert_eq!(config.agent_a().unwrap(), AgentKind::Random);
        assert_eq!(config.agent_b().unwrap(), AgentKind::MarkovChain);
        assert_eq!(config.tick_delay(), 51);
    }

    #[test]
    fn test_tick_delay_for_speed() {
        assert_eq!(tick_delay_for_speed(1), 100);
        assert_eq!(tick_delay_for_speed(100), 1);
        assert_eq!(tick_delay_for_speed(0), 100);
        assert_eq!(tick_delay_for_speed(500), 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ArenaConfig::from_toml(
            r#"
            [arena]
            total_rounds = 200
            agent_a = "minimax"
            agent_b = "Frequency"

            [agents]
            markov_window = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.arena.total_rounds, 200);
        assert_eq!(config.arena.speed, 50);
        assert_eq!(config.agent_a().unwrap(), AgentKind::Minimax);
        assert_eq!(config.agent_b().unwrap(), AgentKind::Frequency);
        assert_eq!(config.agents.markov_window, 4);
        assert_eq!(config.agents.q_discount, 0.9);
        assert!(config.output.write_series_csv);
    }

    #[test]
    fn test_unknown_agent_fails_fast() {
        let err = ArenaConfig::from_toml(
            r#"
            [arena]
            agent_b = "deep-blue"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAgent(ref name) if name == "deep-blue"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ArenaConfig::default();
        config.agents.markov_window = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = ArenaConfig::default();
        config.agents.q_exploration = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = ArenaConfig::default();
        config.arena.speed = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_total_rounds_upper_bound() {
        let mut config = ArenaConfig::default();
        config.arena.total_rounds = MAX_TOTAL_ROUNDS;
        assert!(config.validate().is_ok());

        config.arena.total_rounds = usize::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_horizon_covers_every_round() {
        let config = ArenaConfig::default();
        assert_eq!(config.horizon(), 5001 * 51);

        let mut config = ArenaConfig::default();
        config.arena.total_rounds = MAX_TOTAL_ROUNDS;
        config.arena.speed = MIN_SPEED;
        assert_eq!(config.horizon(), (MAX_TOTAL_ROUNDS + 1) * 100);

        config.arena.total_rounds = usize::MAX;
        assert_eq!(config.horizon(), usize::MAX);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = ArenaConfig::from_toml("[arena\ntotal_rounds = 1").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = ArenaConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
