use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Largest accepted grid width or height
pub const MAX_GRID_SIDE: usize = 500;

/// Spawn and lifetime rules for one kind of special food
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialFoodConfig {
    /// Chance per tick of spawning once the cooldown has elapsed
    pub spawn_chance: f64,
    /// Ticks to wait after a spawn before the next spawn roll
    pub cooldown_ticks: u32,
    /// Chance per tick that a live item disappears unconsumed
    pub expire_chance: f64,
    /// Hard cap on how many ticks a live item survives
    pub lifetime_ticks: u32,
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Pacing
    /// Tick interval at level 1, in milliseconds
    pub base_tick_ms: u64,
    /// Amount the tick interval shrinks on every level-up
    pub tick_step_ms: u64,
    /// Floor for the tick interval
    pub min_tick_ms: u64,

    // Progression
    /// Normal food eaten per level
    pub points_per_level: u32,
    /// Walls added per level
    pub walls_per_level: usize,
    /// Upper bound on the number of walls
    pub max_walls: usize,

    // Scoring
    pub bonus_points: u32,
    pub hazard_penalty: u32,
    /// Tail cells removed when a hazard is eaten
    pub hazard_tail_cut: usize,
    /// The hazard tail cut never shrinks the snake below this
    pub min_snake_length: usize,

    pub bonus: SpecialFoodConfig,
    pub hazard: SpecialFoodConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 25,
            initial_snake_length: 3,
            base_tick_ms: 150,
            tick_step_ms: 10,
            min_tick_ms: 50,
            points_per_level: 5,
            walls_per_level: 2,
            max_walls: 10,
            bonus_points: 5,
            hazard_penalty: 2,
            hazard_tail_cut: 2,
            min_snake_length: 3,
            bonus: SpecialFoodConfig {
                spawn_chance: 0.02,
                cooldown_ticks: 100,
                expire_chance: 0.01,
                lifetime_ticks: 120,
            },
            hazard: SpecialFoodConfig {
                spawn_chance: 0.015,
                cooldown_ticks: 150,
                expire_chance: 0.008,
                lifetime_ticks: 160,
            },
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Small grid with special food switched off, so tests only see what they place
    pub fn quiet(width: usize, height: usize) -> Self {
        let mut config = Self::new(width, height);
        config.bonus.spawn_chance = 0.0;
        config.bonus.expire_chance = 0.0;
        config.hazard.spawn_chance = 0.0;
        config.hazard.expire_chance = 0.0;
        config
    }

    /// Load a JSON config file. Missing fields fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Tick interval at level 1
    pub fn base_tick(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    /// Number of walls a level should carry
    pub fn wall_target(&self, level: u32) -> usize {
        (level as usize)
            .saturating_mul(self.walls_per_level)
            .min(self.max_walls)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 5 || self.grid_height < 5 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 5x5, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid cannot exceed {MAX_GRID_SIDE}x{MAX_GRID_SIDE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "initial_snake_length must be at least 1".to_string(),
            ));
        }

        if self.min_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "min_snake_length must be at least 1".to_string(),
            ));
        }

        // Hazard cuts never go below the floor, so the snake must start at or above it
        if self.initial_snake_length < self.min_snake_length {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length ({}) cannot be below min_snake_length ({})",
                self.initial_snake_length, self.min_snake_length
            )));
        }

        // The snake starts centered with its body trailing to the left
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length ({}) does not fit a grid {} cells wide",
                self.initial_snake_length, self.grid_width
            )));
        }

        if self.min_tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_tick_ms must be positive".to_string(),
            ));
        }

        if self.base_tick_ms < self.min_tick_ms {
            return Err(ConfigError::Invalid(format!(
                "base_tick_ms ({}) cannot be below min_tick_ms ({})",
                self.base_tick_ms, self.min_tick_ms
            )));
        }

        if self.points_per_level == 0 {
            return Err(ConfigError::Invalid(
                "points_per_level must be at least 1".to_string(),
            ));
        }

        for (name, special) in [("bonus", &self.bonus), ("hazard", &self.hazard)] {
            if !(0.0..=1.0).contains(&special.spawn_chance) {
                return Err(ConfigError::Invalid(format!(
                    "{name}.spawn_chance must be in [0, 1], got {}",
                    special.spawn_chance
                )));
            }
            if !(0.0..=1.0).contains(&special.expire_chance) {
                return Err(ConfigError::Invalid(format!(
                    "{name}.expire_chance must be in [0, 1], got {}",
                    special.expire_chance
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 25);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.base_tick(), Duration::from_millis(150));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
    }

    #[test]
    fn test_wall_target_is_capped() {
        let config = GameConfig::default();
        assert_eq!(config.wall_target(1), 2);
        assert_eq!(config.wall_target(3), 6);
        assert_eq!(config.wall_target(5), 10);
        assert_eq!(config.wall_target(40), 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameConfig::new(4, 10).validate().is_err());
        assert!(GameConfig::new(MAX_GRID_SIDE + 1, 10).validate().is_err());
        assert!(GameConfig::new(10, MAX_GRID_SIDE + 1).validate().is_err());
        assert!(GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE).validate().is_ok());

        let mut config = GameConfig::small();
        config.initial_snake_length = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.initial_snake_length = 7;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.initial_snake_length = 2;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.min_snake_length = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.min_snake_length = 2;
        config.initial_snake_length = 2;
        assert!(config.validate().is_ok());

        let mut config = GameConfig::small();
        config.base_tick_ms = 20;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.hazard.spawn_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid_width": 12, "bonus_points": 7}}"#).unwrap();

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 25);
        assert_eq!(config.bonus_points, 7);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = GameConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
