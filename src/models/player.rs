//! Player identity (persisted) and session state (not persisted).

use serde::{Deserialize, Serialize};

/// Unique identifier for a player. Opaque: club number, card id or a generated UUID.
pub type PlayerId = String;

/// Lowest valid playing level.
pub const MIN_LEVEL: u8 = 1;
/// Highest valid playing level.
pub const MAX_LEVEL: u8 = 5;

/// Gender as recorded in the club list: `m`, `v` or `g` (unspecified).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    M,
    V,
    #[default]
    G,
}

impl Gender {
    /// Parse the one-character form. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "m" => Some(Gender::M),
            "v" => Some(Gender::V),
            "g" => Some(Gender::G),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::M => "m",
            Gender::V => "v",
            Gender::G => "g",
        }
    }
}

/// True when `level` is an accepted playing level (1..=5).
pub fn is_valid_level(level: u8) -> bool {
    (MIN_LEVEL..=MAX_LEVEL).contains(&level)
}

/// Convert a level from untrusted input (may be fractional or out of range).
pub fn level_from_f64(value: f64) -> Option<u8> {
    if value.fract() != 0.0 || value < f64::from(MIN_LEVEL) || value > f64::from(MAX_LEVEL) {
        return None;
    }
    Some(value as u8)
}

/// Buddy state of a player.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Link {
    /// First player clicked in a link operation, waiting for the second one.
    Selected,
    /// Linked to another player through link number `n` (1-based).
    Linked(usize),
}

impl Link {
    /// Link number, or `None` while merely selected.
    pub fn number(self) -> Option<usize> {
        match self {
            Link::Selected => None,
            Link::Linked(n) => Some(n),
        }
    }

    /// Tag shown after a player's name: a pointer while selected, a circled digit for
    /// links 1..=20, a chain symbol beyond that.
    pub fn tag(self) -> String {
        match self {
            Link::Selected => "\u{25C4}".to_string(),
            Link::Linked(n) if n > 20 => "\u{1F517}".to_string(),
            Link::Linked(n) => char::from_u32(9311 + n as u32)
                .map(String::from)
                .unwrap_or_default(),
        }
    }
}

/// Player record as persisted in storage (identity only, no session state).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownPlayer {
    pub name: String,
    pub player_id: PlayerId,
    pub gender: Gender,
    pub level: u8,
}

/// A player in the registry: identity plus the state of the running session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub gender: Gender,
    pub level: u8,
    /// Present at the session.
    pub participating: bool,
    /// In the paused list, or on court and to be paused once the court clears.
    pub paused: bool,
    /// Court number, 0 when not on a court.
    pub on_court: usize,
    pub link: Option<Link>,
}

impl Player {
    /// Create a player who is not participating.
    pub fn new(
        player_id: impl Into<PlayerId>,
        name: impl Into<String>,
        gender: Gender,
        level: u8,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            gender,
            level,
            participating: false,
            paused: false,
            on_court: 0,
            link: None,
        }
    }

    /// Extract the identity record of this player.
    pub fn identity(&self) -> KnownPlayer {
        KnownPlayer {
            name: self.name.clone(),
            player_id: self.player_id.clone(),
            gender: self.gender,
            level: self.level,
        }
    }

    /// Link number when this player is linked to a buddy.
    pub fn link_number(&self) -> Option<usize> {
        self.link.and_then(Link::number)
    }

    /// Drop all session state (identity is kept).
    pub fn reset_state(&mut self) {
        self.participating = false;
        self.paused = false;
        self.on_court = 0;
        self.link = None;
    }
}

impl From<KnownPlayer> for Player {
    fn from(k: KnownPlayer) -> Self {
        Player::new(k.player_id, k.name, k.gender, k.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_session_state() {
        let mut p = Player::new("12345", "name", Gender::G, 3);
        p.on_court = 1;
        p.participating = true;
        assert_eq!(
            p.identity(),
            KnownPlayer {
                name: "name".into(),
                player_id: "12345".into(),
                gender: Gender::G,
                level: 3
            }
        );
    }

    #[test]
    fn identity_serializes_with_storage_field_names() {
        let p = Player::new("1000", "Wasser Al", Gender::M, 1);
        let json = serde_json::to_string(&p.identity()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Wasser Al","playerId":"1000","gender":"m","level":1}"#
        );
    }

    #[test]
    fn level_from_untrusted_numbers() {
        assert_eq!(level_from_f64(3.0), Some(3));
        assert_eq!(level_from_f64(2.5), None);
        assert_eq!(level_from_f64(0.0), None);
        assert_eq!(level_from_f64(6.0), None);
        assert_eq!(level_from_f64(f64::NAN), None);
    }

    #[test]
    fn link_tags() {
        assert_eq!(Link::Selected.tag(), "\u{25C4}");
        assert_eq!(Link::Linked(1).tag(), "\u{2460}");
        assert_eq!(Link::Linked(21).tag(), "\u{1F517}");
    }
}
