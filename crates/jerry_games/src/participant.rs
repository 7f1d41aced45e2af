use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Platform user id of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Someone taking part in a game.
///
/// Two participants are the same person when their ids match; the name is
/// only a display label and may change between interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Mention markup that pings the participant when rendered
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_display_name() {
        let before = Participant::new(42, "jerry");
        let after = Participant::new(42, "Jerry (away)");
        assert_eq!(before, after);
        assert_ne!(before, Participant::new(43, "jerry"));
    }

    #[test]
    fn test_mention() {
        assert_eq!(Participant::new(1234, "tom").mention(), "<@1234>");
    }
}
