//! Turns engine views into Discord messages.
//!
//! Text sections become the embed description, separators become blank
//! lines, and each button section becomes one action row whose buttons carry
//! the action id as their `custom_id`.

use async_trait::async_trait;
use jerry_games::{Accent, ButtonStyle, GameView, RenderError, Renderer, Section};
use serenity::all::{
    ButtonStyle as DiscordButtonStyle, ChannelId, Colour, CommandInteraction, CreateActionRow,
    CreateButton, CreateEmbed, EditInteractionResponse, EditMessage, Http, MessageId,
};
use std::sync::{Arc, OnceLock};

pub fn colour(accent: Accent) -> Colour {
    match accent {
        Accent::InPlay => Colour::BLUE,
        Accent::Settled => Colour::DARK_GREEN,
    }
}

/// Discord rejects embeds whose description is longer than this (in characters)
pub const DESCRIPTION_LIMIT: usize = 4096;

pub fn description(view: &GameView) -> String {
    let text = view
        .sections
        .iter()
        .filter_map(|section| match section {
            Section::Text(text) => Some(text.trim_end()),
            Section::Separator => Some(""),
            Section::Buttons(_) => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text;
    }
    let mut truncated: String = text.chars().take(DESCRIPTION_LIMIT - 1).collect();
    truncated.push('…');
    truncated
}

pub fn embed(view: &GameView) -> CreateEmbed {
    CreateEmbed::new()
        .title(&view.title)
        .description(description(view))
        .colour(colour(view.accent))
}

pub fn action_rows(view: &GameView) -> Vec<CreateActionRow> {
    view.sections
        .iter()
        .filter_map(|section| match section {
            Section::Buttons(row) => Some(CreateActionRow::Buttons(
                row.iter()
                    .map(|button| {
                        let style = match button.style {
                            ButtonStyle::Primary => DiscordButtonStyle::Primary,
                            ButtonStyle::Secondary => DiscordButtonStyle::Secondary,
                        };
                        CreateButton::new(button.action.to_string())
                            .label(&button.label)
                            .style(style)
                            .disabled(button.disabled)
                    })
                    .collect(),
            )),
            _ => None,
        })
        .collect()
}

/// Renders a game by editing the bot message that shows it.
///
/// Until the posted message is known, updates go through the command's
/// interaction response. Once bound, the message is edited directly, which
/// keeps working after the interaction token has expired.
pub struct MessageRenderer {
    http: Arc<Http>,
    command: CommandInteraction,
    target: OnceLock<(ChannelId, MessageId)>,
}

impl MessageRenderer {
    pub fn new(http: Arc<Http>, command: CommandInteraction) -> Self {
        Self {
            http,
            command,
            target: OnceLock::new(),
        }
    }

    /// Point later renders at the posted message. Only the first call counts.
    pub fn bind(&self, channel_id: ChannelId, message_id: MessageId) -> bool {
        self.target.set((channel_id, message_id)).is_ok()
    }
}

#[async_trait]
impl Renderer for MessageRenderer {
    async fn render(&self, view: GameView) -> Result<(), RenderError> {
        match self.target.get() {
            Some((channel_id, message_id)) => {
                let edit = EditMessage::new()
                    .embed(embed(&view))
                    .components(action_rows(&view));
                channel_id
                    .edit_message(&self.http, *message_id, edit)
                    .await
                    .map(|_| ())
                    .map_err(RenderError::new)
            }
            None => {
                let edit = EditInteractionResponse::new()
                    .embed(embed(&view))
                    .components(action_rows(&view));
                self.command
                    .edit_response(&self.http, edit)
                    .await
                    .map(|_| ())
                    .map_err(RenderError::new)
            }
        }
    }
}
