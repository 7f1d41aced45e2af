//! Declarative description of what a game currently looks like.
//!
//! Views are recomputed from scratch after every accepted action and handed
//! to the transport, which replaces whatever it showed before.

use serde::Serialize;

use crate::action::ActionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub title: String,
    pub accent: Accent,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Accent {
    /// Waiting on players
    InPlay,
    /// Result shown or game called off
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Section {
    Text(String),
    Separator,
    /// One row of controls
    Buttons(Vec<Button>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub action: ActionId,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonStyle {
    Primary,
    Secondary,
}

impl GameView {
    pub fn new(title: impl Into<String>, accent: Accent) -> Self {
        Self {
            title: title.into(),
            accent,
            sections: Vec::new(),
        }
    }

    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.sections.push(Section::Text(content.into()));
        self
    }

    pub fn separator(mut self) -> Self {
        self.sections.push(Section::Separator);
        self
    }

    pub fn buttons(mut self, row: Vec<Button>) -> Self {
        self.sections.push(Section::Buttons(row));
        self
    }

    /// All text sections, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|section| match section {
            Section::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// All controls, row by row
    pub fn controls(&self) -> impl Iterator<Item = &Button> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Buttons(row) => Some(row.iter()),
                _ => None,
            })
            .flatten()
    }
}

impl Button {
    pub fn new(action: ActionId, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            action,
            label: label.into(),
            style,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}
