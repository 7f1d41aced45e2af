//! Discord front end for the Jerry games.
//!
//! Registers the slash commands, posts each new game as a message, and feeds
//! button clicks into the [`jerry_games::GameRegistry`]. Every later state of
//! a game is drawn by editing that same message.

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;

pub use bot::{JerryBot, create_discord_client, run_discord_bot};
pub use config::{Config, DiscordConfig, GamesConfig, LoggingConfig};
pub use error::{ConfigError, DiscordError, Result};
pub use render::MessageRenderer;

// Re-export serenity for downstream users
pub use serenity;
