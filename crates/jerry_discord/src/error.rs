use jerry_games::GameError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DiscordError {
    #[error("Discord authentication failed")]
    #[diagnostic(
        code(jerry::discord::auth_failed),
        help("Check that your Discord bot token is valid and has not been regenerated")
    )]
    AuthenticationFailed {
        #[source]
        cause: serenity::Error,
        token_preview: String, // First/last few chars of token for debugging
    },

    #[error("Gateway connection lost")]
    #[diagnostic(
        code(jerry::discord::gateway_connection_lost),
        help("Lost connection to the Discord gateway")
    )]
    GatewayConnectionLost {
        #[source]
        cause: serenity::Error,
    },

    #[error("Command registration failed")]
    #[diagnostic(
        code(jerry::discord::command_registration_failed),
        help("Failed to register slash commands {scope}")
    )]
    CommandRegistrationFailed {
        scope: String, // "globally" or "in guild <id>"
        #[source]
        cause: serenity::Error,
    },

    #[error("Interaction failed")]
    #[diagnostic(
        code(jerry::discord::interaction_failed),
        help("Failed to handle Discord interaction '{interaction_name}'")
    )]
    InteractionFailed {
        interaction_name: String,
        user_id: String,
        #[source]
        cause: serenity::Error,
        responded: bool,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Game(#[from] GameError),
}

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(
        code(jerry::config::read_failed),
        help("Check that {path} is a readable file")
    )]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration")]
    #[diagnostic(code(jerry::config::parse_failed))]
    ParseFailed {
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration value for {field}")]
    #[diagnostic(code(jerry::config::invalid), help("{reason}"))]
    Invalid { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DiscordError>;

// Helper functions for creating common errors
impl DiscordError {
    pub fn auth_failed(cause: serenity::Error, token: &str) -> Self {
        // Show first 6 and last 4 characters of token for debugging
        let token_preview = if token.len() > 10 && token.is_ascii() {
            format!("{}...{}", &token[..6], &token[token.len() - 4..])
        } else {
            "***".to_string()
        };

        Self::AuthenticationFailed {
            cause,
            token_preview,
        }
    }

    pub fn interaction_failed(
        interaction_name: impl Into<String>,
        user_id: impl ToString,
        cause: serenity::Error,
        responded: bool,
    ) -> Self {
        Self::InteractionFailed {
            interaction_name: interaction_name.into(),
            user_id: user_id.to_string(),
            cause,
            responded,
        }
    }
}
