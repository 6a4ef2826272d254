//! Scenario Configuration
//!
//! A scenario describes the dungeon map, the creatures in it and where each
//! of them is sent. Scenarios are TOML files:
//!
//! ```toml
//! name = "corridor"
//! ticks = 600
//! dt = 0.016666668
//! map = ["....#", "....."]
//!
//! [navigation.steering]
//! facing_enabled = true
//!
//! [[agents]]
//! id = 1
//! start = { x = 0, y = 0 }
//! destination = { x = 4, y = 1 }
//! ```
//!
//! # Configuration Sources (in priority order)
//!
//! 1. First positional argument: path to a scenario file
//! 2. Environment variable: `KEEPER_SIM_SCENARIO=path/to/scenario.toml`
//! 3. The built-in dungeon scenario
//!
//! `KEEPER_SIM_TICKS` overrides the tick count of whichever scenario loads.

use crate::error::{Result, SimError};
use keeper_ai::{MovementProfile, NavigationConfig, SteeringLimits, TileCoordinate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const BUILTIN_SCENARIO: &str = include_str!("../scenarios/dungeon.toml");

/// One creature in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: u32,
    /// Tile the creature spawns on
    pub start: TileCoordinate,
    /// Tile the creature is sent to
    pub destination: TileCoordinate,
    /// Tile to face when the destination is unreachable
    #[serde(default)]
    pub facing: Option<TileCoordinate>,
    #[serde(default)]
    pub profile: MovementProfile,
    #[serde(default)]
    pub limits: SteeringLimits,
}

/// A complete simulation scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Maximum number of ticks to run
    pub ticks: u32,
    /// Fixed timestep (seconds)
    pub dt: f32,
    /// Map rows, see `TileGrid::from_ascii`
    pub map: Vec<String>,
    pub navigation: NavigationConfig,
    pub agents: Vec<AgentSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            ticks: 600,
            dt: 1.0 / 60.0,
            map: Vec::new(),
            navigation: NavigationConfig::default(),
            agents: Vec::new(),
        }
    }
}

impl Scenario {
    /// Parse a scenario from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a scenario file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// The scenario shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_SCENARIO)
    }
}

/// Where to take the scenario from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimConfig {
    /// Scenario file, built-in scenario when `None`
    pub scenario_path: Option<PathBuf>,
    /// Replaces the scenario's tick count
    pub ticks_override: Option<u32>,
}

impl SimConfig {
    /// Load from process arguments and environment
    pub fn load() -> Self {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Resolve from explicit arguments and an environment lookup
    pub fn from_sources<I, E>(args: I, env: E) -> Self
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = env("KEEPER_SIM_SCENARIO").filter(|p| !p.is_empty()) {
            log::info!("Scenario from env: {}", path);
            config.scenario_path = Some(PathBuf::from(path));
        }

        // First non-flag argument wins over the environment
        if let Some(arg) = args.into_iter().find(|arg| !arg.starts_with('-')) {
            log::info!("Scenario from args: {}", arg);
            config.scenario_path = Some(PathBuf::from(arg));
        }

        if let Some(ticks) = env("KEEPER_SIM_TICKS") {
            match ticks.parse() {
                Ok(ticks) => config.ticks_override = Some(ticks),
                Err(_) => log::warn!("Ignoring KEEPER_SIM_TICKS={}: not a tick count", ticks),
            }
        }

        config
    }

    /// Load the selected scenario and apply overrides
    pub fn scenario(&self) -> Result<Scenario> {
        let mut scenario = match &self.scenario_path {
            Some(path) => {
                let scenario = Scenario::load_from_file(path)?;
                log::info!("Loaded scenario '{}' from {}", scenario.name, path.display());
                scenario
            }
            None => {
                let scenario = Scenario::builtin()?;
                log::info!("Using built-in scenario '{}'", scenario.name);
                scenario
            }
        };

        if let Some(ticks) = self.ticks_override {
            log::info!("Tick count from env: {}", ticks);
            scenario.ticks = ticks;
        }
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_builtin_scenario_parses() {
        let scenario = Scenario::builtin().unwrap();
        assert_eq!(scenario.name, "dungeon");
        assert_eq!(scenario.agents.len(), 3);
        assert!(!scenario.agents[1].profile.can_swim);
        assert_eq!(scenario.agents[1].limits.max_linear_speed, 1.0);
        assert_eq!(scenario.agents[0].facing, None);
        assert!(scenario.navigation.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let scenario = Scenario::from_toml(
            r#"
            map = ["..."]

            [[agents]]
            id = 7
            start = { x = 0, y = 0 }
            destination = { x = 2, y = 0 }
            "#,
        )
        .unwrap();
        assert_eq!(scenario.ticks, 600);
        assert_eq!(scenario.navigation, NavigationConfig::default());
        assert_eq!(scenario.agents[0].limits, SteeringLimits::default());
        assert_eq!(scenario.agents[0].profile, MovementProfile::default());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Scenario::from_toml("ticks = \"many\""), Err(SimError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Scenario::load_from_file(Path::new("/nonexistent/keeper/scenario.toml"));
        assert!(matches!(result, Err(SimError::Io { .. })));
    }

    #[test]
    fn test_sources_priority() {
        let config = SimConfig::from_sources(Vec::new(), env(&[]));
        assert_eq!(config, SimConfig::default());

        let from_env = env(&[("KEEPER_SIM_SCENARIO", "env.toml")]);
        let config = SimConfig::from_sources(Vec::new(), from_env);
        assert_eq!(config.scenario_path, Some(PathBuf::from("env.toml")));

        let args = vec!["--verbose".to_string(), "arg.toml".to_string()];
        let config = SimConfig::from_sources(args, env(&[("KEEPER_SIM_SCENARIO", "env.toml")]));
        assert_eq!(config.scenario_path, Some(PathBuf::from("arg.toml")));
    }

    #[test]
    fn test_short_flags_are_not_scenarios() {
        let args = vec!["-v".to_string(), "-q".to_string()];
        let config = SimConfig::from_sources(args, env(&[]));
        assert_eq!(config.scenario_path, None);

        let args = vec!["-v".to_string(), "cave.toml".to_string()];
        let config = SimConfig::from_sources(args, env(&[]));
        assert_eq!(config.scenario_path, Some(PathBuf::from("cave.toml")));
    }

    #[test]
    fn test_ticks_override() {
        let config = SimConfig::from_sources(Vec::new(), env(&[("KEEPER_SIM_TICKS", "42")]));
        assert_eq!(config.ticks_override, Some(42));
        assert_eq!(config.scenario().unwrap().ticks, 42);

        let config = SimConfig::from_sources(Vec::new(), env(&[("KEEPER_SIM_TICKS", "lots")]));
        assert_eq!(config.ticks_override, None);
    }
}
