#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::Rules;
    use crate::config::{Config, ConfigError, HardDropLock};
    use crate::game::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.board.width, 15);
        assert_eq!(config.board.height, 20);
        assert_eq!(config.timing.initial_drop_interval_ms, 1000);
        assert_eq!(config.timing.min_drop_interval_ms, 100);
        assert_eq!(config.timing.drop_interval_step_ms, 50);
        assert_eq!(config.timing.frame_interval_ms, 33);
        assert_eq!(config.scoring.points_per_line, 100);
        assert_eq!(config.gameplay.hard_drop_lock, HardDropLock::Deferred);
        assert_eq!(config.gameplay.seed, None);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let toml_string = toml::to_string_pretty(&config).expect("Failed to serialize config");
        assert!(toml_string.contains("[board]"));
        assert!(toml_string.contains("[timing]"));
        assert!(toml_string.contains("hard_drop_lock = \"deferred\""));

        let deserialized: Config = toml::from_str(&toml_string).expect("Failed to deserialize");
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: Config = toml::from_str("").expect("Failed to deserialize");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_board_size() {
        let mut config = Config::default();
        config.board.width = 3;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.board.width = 4;
        config.board.height = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.board.height = 2;
        assert!(config.validate().is_ok());

        // Oversized boards would not fit any terminal layout
        config.board.width = 40_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.board.width = MAX_BOARD_WIDTH;
        config.board.height = MAX_BOARD_HEIGHT + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.board.height = MAX_BOARD_HEIGHT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timing() {
        let mut config = Config::default();
        config.timing.min_drop_interval_ms = 1500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.timing.frame_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        // A flat speed is allowed
        let mut config = Config::default();
        config.timing.min_drop_interval_ms = 1000;
        config.timing.drop_interval_step_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rules_from_config() {
        let mut config = Config::default();
        config.board.width = 10;
        config.timing.drop_interval_step_ms = 25;
        config.gameplay.hard_drop_lock = HardDropLock::Immediate;

        let rules = Rules::from(&config);
        assert_eq!(rules.board_width, 10);
        assert_eq!(rules.board_height, 20);
        assert_eq!(rules.initial_drop_interval, Duration::from_secs(1));
        assert_eq!(rules.min_drop_interval, Duration::from_millis(100));
        assert_eq!(rules.drop_interval_step, Duration::from_millis(25));
        assert_eq!(rules.points_per_line, 100);
        assert_eq!(rules.hard_drop_lock, HardDropLock::Immediate);

        assert_eq!(Rules::default(), Rules::from(&Config::default()));
    }
}
