use jerry_games::{ActionId, GameError, GameRegistry};
use serenity::{
    all::{
        Command, CommandInteraction, ComponentInteraction, CreateInteractionResponse, GuildId,
        Interaction, Ready,
    },
    async_trait,
    client::{Context, EventHandler},
    prelude::*,
};
use tracing::{debug, error, info, warn};

use crate::{
    commands,
    config::Config,
    error::{DiscordError, Result},
};

/// Discord event handler hosting the games
pub struct JerryBot {
    registry: GameRegistry,
    guild_id: Option<GuildId>,
}

impl JerryBot {
    pub fn new(registry: GameRegistry, guild_id: Option<u64>) -> Self {
        Self {
            registry,
            guild_id: guild_id.map(GuildId::new),
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    async fn register_commands(&self, ctx: &Context) -> Result<()> {
        match self.guild_id {
            Some(guild_id) => {
                guild_id
                    .set_commands(&ctx.http, commands::create_commands())
                    .await
                    .map_err(|cause| DiscordError::CommandRegistrationFailed {
                        scope: format!("in guild {}", guild_id),
                        cause,
                    })?;
            }
            None => {
                Command::set_global_commands(&ctx.http, commands::create_commands())
                    .await
                    .map_err(|cause| DiscordError::CommandRegistrationFailed {
                        scope: "globally".to_string(),
                        cause,
                    })?;
            }
        }
        Ok(())
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        info!(
            "Received slash command: {} from user {}",
            command.data.name, command.user.name
        );

        let result = match command.data.name.as_str() {
            "rps" => commands::handle_rps_command(ctx, command, &self.registry).await,
            "tictactoe" => commands::handle_tictactoe_command(ctx, command, &self.registry).await,
            "ping-jerry" => commands::handle_ping_command(ctx, command).await,
            "help-jerry" => commands::handle_help_command(ctx, command).await,
            _ => {
                warn!("Unknown command: {}", command.data.name);
                Ok(())
            }
        };

        if let Err(e) = result {
            error!("Error handling /{}: {:?}", command.data.name, e);
        }
    }

    /// Button clicks. Always acknowledged, so stale or rejected clicks never
    /// show an error to the user.
    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        if let Err(why) = component
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await
        {
            warn!(
                "Cannot acknowledge component {}: {:?}",
                component.data.custom_id, why
            );
        }

        let action: ActionId = match component.data.custom_id.parse() {
            Ok(action) => action,
            Err(e) => {
                debug!("Ignoring component {}: {}", component.data.custom_id, e);
                return;
            }
        };

        let participant = commands::participant(
            &component.user,
            component.member.as_ref().and_then(|m| m.nick.as_deref()),
        );

        match self.registry.dispatch(&action, &participant).await {
            Ok(transition) => debug!(
                "{} on game {} by {}: {:?}",
                component.data.custom_id, action.game, participant.id, transition
            ),
            Err(GameError::UnknownGame { game_id }) => {
                debug!("Click on game {} which is no longer running", game_id)
            }
            Err(e) => warn!("Failed to dispatch {}: {:?}", component.data.custom_id, e),
        }
    }
}

#[async_trait]
impl EventHandler for JerryBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        if let Err(why) = self.register_commands(&ctx).await {
            error!("Cannot register slash commands: {:?}", why);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.handle_command(&ctx, &command).await,
            Interaction::Component(component) => self.handle_component(&ctx, &component).await,
            _ => {}
        }
    }
}

/// Create the Discord client (without starting it)
pub async fn create_discord_client(config: &Config, registry: GameRegistry) -> Result<Client> {
    let handler = JerryBot::new(registry, config.discord.guild_id);

    let intents = GatewayIntents::non_privileged();

    let mut client_builder = Client::builder(&config.discord.token, intents).event_handler(handler);

    if let Some(app_id) = config.discord.application_id {
        client_builder = client_builder.application_id(app_id.into());
    }

    client_builder
        .await
        .map_err(|e| DiscordError::auth_failed(e, &config.discord.token))
}

/// Create and run the Discord bot
pub async fn run_discord_bot(config: Config) -> Result<()> {
    let registry = GameRegistry::new(config.games.timeout());
    let mut client = create_discord_client(&config, registry).await?;

    info!("Starting Discord bot...");
    client
        .start()
        .await
        .map_err(|cause| DiscordError::GatewayConnectionLost { cause })?;

    Ok(())
}
