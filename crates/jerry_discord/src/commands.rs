//! Discord slash command implementations

use jerry_games::{Game, GameError, GameRegistry, Participant, RpsGame, TicTacToeGame};
use serenity::{
    all::{
        Colour, CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse, User,
    },
    client::Context,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::{
    error::{DiscordError, Result},
    render::{self, MessageRenderer},
};

/// Create all slash commands for registration
pub fn create_commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("rps")
            .description("Start a game of Rock, Paper, Scissors.")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "players",
                    "Number of players, 2 to 25 (default is 2)",
                )
                .required(false),
            ),
        CreateCommand::new("tictactoe").description("Start a game of Tic Tac Toe."),
        CreateCommand::new("ping-jerry").description("Is Jerry alive?"),
        CreateCommand::new("help-jerry").description("Get help with Jerry"),
    ]
}

/// Who clicked or typed, labelled by server nickname when there is one
pub fn participant(user: &User, nick: Option<&str>) -> Participant {
    let name = nick
        .or(user.global_name.as_deref())
        .unwrap_or(&user.name);
    Participant::new(user.id.get(), name)
}

fn command_participant(command: &CommandInteraction) -> Participant {
    participant(
        &command.user,
        command.member.as_ref().and_then(|m| m.nick.as_deref()),
    )
}

/// Handle the /rps command
pub async fn handle_rps_command(
    ctx: &Context,
    command: &CommandInteraction,
    registry: &GameRegistry,
) -> Result<()> {
    let players = command
        .data
        .options
        .iter()
        .find(|opt| opt.name == "players")
        .and_then(|opt| opt.value.as_i64())
        .unwrap_or(2);

    let game = match RpsGame::new(players, registry.timeout()) {
        Ok(game) => game,
        Err(GameError::InvalidPlayerCount {
            requested,
            minimum,
            maximum,
        }) => {
            let embed = CreateEmbed::new()
                .title("Rock, Paper, Scissors")
                .description(player_count_message(requested, minimum, maximum))
                .colour(Colour::RED);
            command
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .embed(embed)
                            .ephemeral(true),
                    ),
                )
                .await
                .map_err(|e| DiscordError::interaction_failed("rps", command.user.id, e, false))?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        "{} started rock, paper, scissors for {} players",
        command.user.name, players
    );
    host_game(ctx, command, registry, game).await
}

fn player_count_message(requested: i64, minimum: usize, maximum: usize) -> String {
    if requested < minimum as i64 {
        format!("Number of players must be {minimum} or more.")
    } else {
        format!("Number of players must be {maximum} or fewer.")
    }
}

/// Handle the /tictactoe command
pub async fn handle_tictactoe_command(
    ctx: &Context,
    command: &CommandInteraction,
    registry: &GameRegistry,
) -> Result<()> {
    let game = TicTacToeGame::new(command_participant(command));
    info!("{} started tic tac toe", command.user.name);
    host_game(ctx, command, registry, game).await
}

/// Register the game, then post its first view as the command response.
///
/// The session exists before the message does, so no click can reach the
/// bot ahead of its game. Renders go through the interaction response until
/// the posted message is bound to the renderer.
async fn host_game(
    ctx: &Context,
    command: &CommandInteraction,
    registry: &GameRegistry,
    game: impl Into<Game>,
) -> Result<()> {
    let game = game.into();
    let view = game.view();
    let name = command.data.name.as_str();

    let renderer = Arc::new(MessageRenderer::new(
        Arc::clone(&ctx.http),
        command.clone(),
    ));
    let game_id = registry.start(game, renderer.clone());

    if let Err(e) = command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(render::embed(&view))
                    .components(render::action_rows(&view)),
            ),
        )
        .await
    {
        registry.discard(game_id).await;
        return Err(DiscordError::interaction_failed(
            name,
            command.user.id,
            e,
            false,
        ));
    }

    match command.get_response(&ctx.http).await {
        Ok(message) => {
            renderer.bind(message.channel_id, message.id);
        }
        Err(e) => warn!(
            "Game {} keeps rendering through the interaction token: {:?}",
            game_id, e
        ),
    }
    Ok(())
}

/// Handle the /ping-jerry command
pub async fn handle_ping_command(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    let started = Instant::now();
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content("Pong! 🏓"),
            ),
        )
        .await
        .map_err(|e| DiscordError::interaction_failed("ping-jerry", command.user.id, e, false))?;

    let latency = started.elapsed().as_secs_f64() * 1000.0;
    command
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new().content(format!("Pong! 🏓\nLatency: {latency:.2}ms")),
        )
        .await
        .map_err(|e| DiscordError::interaction_failed("ping-jerry", command.user.id, e, true))?;

    Ok(())
}

pub fn help_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("Jerry Bot")
        .description(
            "I'm Jerry, a bot created by CubbScratchStudios. I'm designed as a server-specific \
             bot, meaning I have features that are unique to each server I'm in. However, I \
             also have some global features that are available in all servers.",
        )
        .colour(Colour::RED)
        .field(
            "Global Commands",
            "Here are some commands that are available in all servers:\n\
             - `/ping-jerry` - Check if Jerry is alive\n\
             - `/help-jerry` - This command\n\
             - `/rps [players]` - Play Rock, Paper, Scissors\n\
             - `/tictactoe` - Play Tic Tac Toe against another member",
            false,
        )
}

/// Handle the /help-jerry command
pub async fn handle_help_command(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().embed(help_embed()),
            ),
        )
        .await
        .map_err(|e| DiscordError::interaction_failed("help-jerry", command.user.id, e, false))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_names() {
        let json = serde_json::to_value(create_commands()).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|command| command["name"].as_str())
            .collect();
        assert_eq!(names, vec!["rps", "tictactoe", "ping-jerry", "help-jerry"]);
    }

    #[test]
    fn test_player_count_message() {
        assert_eq!(
            player_count_message(1, 2, 25),
            "Number of players must be 2 or more."
        );
        assert_eq!(
            player_count_message(9_007_199_254_740_991, 2, 25),
            "Number of players must be 25 or fewer."
        );
    }

    #[test]
    fn test_help_lists_games() {
        let json = serde_json::to_string(&help_embed()).unwrap();
        assert!(json.contains("/rps [players]"));
        assert!(json.contains("/tictactoe"));
    }
}
