use std::path::{Path, PathBuf};

use crate::board::MIN_RUN;
use crate::error::ConfigError;
use crate::session::GameSpeed;

/// Board dimensions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 8,
            height: 8,
        }
    }
}

/// Starting session state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_level: u32,
    pub starting_gold: u64,
    pub speed: GameSpeed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            starting_level: 1,
            starting_gold: 0,
            speed: GameSpeed::Normal,
        }
    }
}

/// Preference file location.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub path: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        SaveConfig {
            path: PathBuf::from("save/prefs.json"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub session: SessionConfig,
    pub save: SaveConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!(
                "Warning: config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.width < MIN_RUN || self.board.height < MIN_RUN {
            return Err(ConfigError::Validation(format!(
                "board must be at least {MIN_RUN}x{MIN_RUN} to be playable"
            )));
        }
        let cells = self.board.width.checked_mul(self.board.height);
        if cells.map_or(true, |n| n > 10_000) {
            return Err(ConfigError::Validation(
                "board.width * board.height must be <= 10000".into(),
            ));
        }
        if self.session.starting_level == 0 {
            return Err(ConfigError::Validation(
                "session.starting_level must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.width, 8);
        assert_eq!(config.board.height, 8);
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [board]
            width = 9

            [session]
            starting_gold = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.board.width, 9);
        assert_eq!(config.board.height, 8);
        assert_eq!(config.session.starting_gold, 500);
        assert_eq!(config.session.starting_level, 1);
    }

    #[test]
    fn test_parse_speed() {
        let config: AppConfig = toml::from_str(
            r#"
            [session]
            speed = "Turbo"
            "#,
        )
        .unwrap();
        assert_eq!(config.session.speed, GameSpeed::Turbo);
    }

    #[test]
    fn test_undersized_board_rejected() {
        let mut config = AppConfig::default();
        config.board.width = 2;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_oversized_board_rejected() {
        let mut config = AppConfig::default();
        config.board.width = 200;
        config.board.height = 200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_huge_board_dimensions_do_not_overflow() {
        // Area computation must reject, not wrap or panic
        let mut config = AppConfig::default();
        config.board.width = usize::MAX / 2;
        config.board.height = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_starting_level_rejected() {
        let mut config = AppConfig::default();
        config.session.starting_level = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = AppConfig::load_or_default(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.board.width, 8);
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[board\nwidth=").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
