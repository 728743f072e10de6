//! Read-only view of the session, returned after every committed command.

use crate::models::admin::Admin;
use crate::models::player::{Gender, Player, PlayerId};
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub name: String,
    pub gender: Gender,
    pub level: u8,
    pub participating: bool,
    pub paused: bool,
    pub on_court: usize,
    /// Link tag shown after the name, empty when not linked.
    pub tag: String,
}

impl PlayerView {
    pub fn from_player(p: &Player) -> Self {
        Self {
            player_id: p.player_id.clone(),
            name: p.name.clone(),
            gender: p.gender,
            level: p.level,
            participating: p.participating,
            paused: p.paused,
            on_court: p.on_court,
            tag: p.link.map(|l| l.tag()).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CourtView {
    pub court_nr: usize,
    pub is_double: bool,
    pub paused: bool,
    pub last_game: bool,
    pub players: Vec<PlayerView>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SessionView {
    pub players: Vec<PlayerView>,
    pub waiting: Vec<PlayerView>,
    pub paused: Vec<PlayerView>,
    pub courts: Vec<CourtView>,
    pub can_undo: bool,
    pub mix_more: bool,
    pub three_level: bool,
    pub level_can_play: [bool; 5],
}

impl SessionView {
    pub fn from_admin(admin: &Admin) -> Self {
        let lookup = |ids: &[PlayerId]| -> Vec<PlayerView> {
            ids.iter()
                .filter_map(|id| admin.find_player(id))
                .map(PlayerView::from_player)
                .collect()
        };
        Self {
            players: admin.players.iter().map(PlayerView::from_player).collect(),
            waiting: lookup(&admin.waiting),
            paused: lookup(&admin.paused),
            courts: admin
                .courts
                .iter()
                .map(|c| CourtView {
                    court_nr: c.court_nr,
                    is_double: c.is_double,
                    paused: c.paused,
                    last_game: c.last_game,
                    players: lookup(&c.players),
                })
                .collect(),
            can_undo: admin.can_undo,
            mix_more: admin.mix_more(),
            three_level: admin.picker.three_level(),
            level_can_play: admin.level_can_play,
        }
    }
}
