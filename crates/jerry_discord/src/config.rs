use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "jerry.toml";

/// Main configuration for Jerry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord bot configuration
    pub discord: DiscordConfig,
    /// Game engine settings
    pub games: GamesConfig,
    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token
    pub token: String,
    /// Discord application ID
    pub application_id: Option<u64>,
    /// Register commands in this guild only (instant updates while developing)
    pub guild_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    /// Seconds without activity before an unfinished game is cancelled
    pub timeout_secs: u64,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

impl GamesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily rolling log file
    pub directory: String,
    /// Filter directives used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            filter: "jerry=info,jerry_discord=info,jerry_games=info,serenity=warn".to_string(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "discord.token".to_string(),
                reason: "Set DISCORD_TOKEN or discord.token in the config file".to_string(),
            });
        }

        if self.games.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "games.timeout_secs".to_string(),
                reason: "Games need a timeout of at least one second".to_string(),
            });
        }

        Ok(())
    }

    /// Load configuration from a file (if present) and the environment.
    ///
    /// The file is `path`, else `$JERRY_CONFIG`, else `jerry.toml`. A missing
    /// file is not an error; defaults plus environment are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("JERRY_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = match Self::read_file(&config_path)? {
            Some(contents) => Self::from_toml(&contents)?,
            None => Self::default(),
        };
        Ok(config.override_from_env())
    }

    /// `None` when there is no file at `path`
    fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::ReadFailed {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseFailed { source: e })
    }

    /// Override config values with environment variables
    fn override_from_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Discord
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.discord.token = token;
        }
        if let Some(id) = lookup("DISCORD_APPLICATION_ID").and_then(|v| v.parse().ok()) {
            self.discord.application_id = Some(id);
        }
        if let Some(id) = lookup("DISCORD_GUILD_ID").and_then(|v| v.parse().ok()) {
            self.discord.guild_id = Some(id);
        }

        // Games
        if let Some(secs) = lookup("JERRY_GAME_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.games.timeout_secs = secs;
        }

        // Logging
        if let Some(dir) = lookup("JERRY_LOG_DIR") {
            self.logging.directory = dir;
        }
        if let Some(filter) = lookup("JERRY_LOG") {
            self.logging.filter = filter;
        }

        self
    }
}

/// Helper to load dotenv file if it exists
pub fn load_dotenv() {
    if let Ok(path) = env::var("DOTENV_PATH") {
        dotenvy::from_path(&path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [discord]
            token = "abc"
            guild_id = 1234
            "#,
        )
        .unwrap();

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.guild_id, Some(1234));
        assert_eq!(config.discord.application_id, None);
        assert_eq!(config.games.timeout(), Duration::from_secs(120));
        assert_eq!(config.logging.directory, "logs");
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml("[games]\ntimeout_secs = \"soon\""),
            Err(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("DISCORD_TOKEN", "from-env"),
            ("DISCORD_APPLICATION_ID", "42"),
            ("DISCORD_GUILD_ID", "not-a-number"),
            ("JERRY_GAME_TIMEOUT_SECS", "300"),
            ("JERRY_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_toml("[discord]\ntoken = \"from-file\"\nguild_id = 7")
            .unwrap()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.discord.token, "from-env");
        assert_eq!(config.discord.application_id, Some(42));
        assert_eq!(config.discord.guild_id, Some(7));
        assert_eq!(config.games.timeout_secs, 300);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_unreadable_config_is_a_read_error() {
        // A directory exists but cannot be read as a file
        let dir = std::env::temp_dir();
        assert!(matches!(
            Config::read_file(&dir),
            Err(ConfigError::ReadFailed { ref path, .. }) if *path == dir.display().to_string()
        ));

        let missing = dir.join("jerry-config-that-does-not-exist.toml");
        assert!(matches!(Config::read_file(&missing), Ok(None)));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "discord.token"
        ));

        config.discord.token = "token".to_string();
        assert!(config.validate().is_ok());

        config.games.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "games.timeout_secs"
        ));
    }
}
