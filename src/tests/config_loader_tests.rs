#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::config::loader::{ConfigError, load_config_from_path, save_config_to_path};
    use crate::config::{Config, HardDropLock};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    // Helper function to create a test config path
    fn create_test_config_path() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("test_config.toml");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_config() {
        let (_temp_dir, config_path) = create_test_config_path();
        assert!(!config_path.exists());

        // Loading a non-existent config should create a default one
        let config = load_config_from_path(&config_path).expect("Failed to load default config");

        assert!(config_path.exists(), "Config file should have been created");
        assert_eq!(config, Config::default());

        // The written file reads back as the same defaults
        let reloaded = load_config_from_path(&config_path).expect("Failed to reload config");
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nested").join("dir").join("config.toml");

        save_config_to_path(&Config::default(), &config_path).expect("Failed to save config");
        assert!(config_path.exists());
    }

    #[test]
    fn test_save_and_load_config() {
        let (_temp_dir, config_path) = create_test_config_path();

        let mut config = Config::default();
        config.board.width = 10;
        config.timing.initial_drop_interval_ms = 800;
        config.scoring.points_per_line = 40;
        config.gameplay.hard_drop_lock = HardDropLock::Immediate;
        config.gameplay.seed = Some(42);

        save_config_to_path(&config, &config_path).expect("Failed to save config");
        let loaded_config = load_config_from_path(&config_path).expect("Failed to load config");

        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::write(
            &config_path,
            "[board]\nheight = 24\n\n[gameplay]\nhard_drop_lock = \"immediate\"\n",
        )
        .expect("Failed to write config");

        let config = load_config_from_path(&config_path).expect("Failed to load config");

        assert_eq!(config.board.height, 24);
        assert_eq!(config.board.width, 15);
        assert_eq!(config.timing, Config::default().timing);
        assert_eq!(config.gameplay.hard_drop_lock, HardDropLock::Immediate);
        assert_eq!(config.gameplay.seed, None);
    }

    #[test]
    fn test_invalid_config_parsing() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::write(&config_path, "this is not valid TOML").expect("Failed to write invalid config");

        let result = load_config_from_path(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_hard_drop_mode_rejected() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::write(&config_path, "[gameplay]\nhard_drop_lock = \"sometimes\"\n")
            .expect("Failed to write config");

        let result = load_config_from_path(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::write(&config_path, "[board]\nwidth = 3\n").expect("Failed to write config");

        let result = load_config_from_path(&config_path);
        match result {
            Err(ConfigError::Invalid(reason)) => assert!(reason.contains("3x20")),
            other => panic!("expected an invalid config error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::Invalid("board too small".to_string());
        assert_eq!(err.to_string(), "invalid config: board too small");

        let io_err = ConfigError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(io_err.to_string().starts_with("config I/O error"));
        assert!(std::error::Error::source(&io_err).is_some());
    }
}
