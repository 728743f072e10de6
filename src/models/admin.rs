//! Admin: the session aggregate. Registry, waiting/paused lists, courts and links.

use crate::logic::picker::Picker;
use crate::models::court::Court;
use crate::models::error::InvariantError;
use crate::models::player::{Player, PlayerId};
use crate::models::storage::{AdminStorage, MemoryStorage};

/// Effect of a snapshot write on the undo slot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UndoOption {
    /// The previous state can no longer be restored.
    #[default]
    DoNothing,
    /// The previous snapshot becomes the undo state.
    Make,
    /// Leave the undo slot as it is.
    Keep,
}

/// Player and session state administration.
pub struct Admin {
    /// All known players, present or not.
    pub players: Vec<Player>,
    /// Present players waiting to play, in queue order.
    pub waiting: Vec<PlayerId>,
    /// Present players that currently do not want to play.
    pub paused: Vec<PlayerId>,
    pub courts: Vec<Court>,
    /// Link table. Entry `n - 1` holds the two players with link number `n`, or `None`
    /// when that number is free.
    pub player_links: Vec<Option<[PlayerId; 2]>>,
    /// First player clicked in a link operation.
    pub x_selected: Option<PlayerId>,
    pub can_undo: bool,
    /// Encoded current session state.
    pub state_string: String,
    /// Encoded previous session state.
    pub undo_string: String,
    pub picker: Picker,
    /// Per level (index `level - 1`): enough compatible players to fill a court.
    pub level_can_play: [bool; 5],
    /// Players held back after a court clear so they do not replay as the same group.
    pub mix_hold: Vec<PlayerId>,
    storage: Box<dyn AdminStorage>,
}

impl Admin {
    /// Create a controller with `nr_courts` open double courts and no players.
    pub fn new(nr_courts: usize, storage: Box<dyn AdminStorage>) -> Self {
        Self {
            players: Vec::new(),
            waiting: Vec::new(),
            paused: Vec::new(),
            courts: (1..=nr_courts).map(Court::new).collect(),
            player_links: Vec::new(),
            x_selected: None,
            can_undo: false,
            state_string: String::new(),
            undo_string: String::new(),
            picker: Picker::new(false),
            level_can_play: [false; 5],
            mix_hold: Vec::new(),
            storage,
        }
    }

    /// Controller backed by [`MemoryStorage`].
    pub fn in_memory(nr_courts: usize) -> Self {
        Self::new(nr_courts, Box::new(MemoryStorage::default()))
    }

    pub fn storage(&self) -> &dyn AdminStorage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn AdminStorage {
        self.storage.as_mut()
    }

    /// True while a group is held back waiting for other players to mix with.
    pub fn mix_more(&self) -> bool {
        !self.mix_hold.is_empty()
    }

    pub fn find_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id == id)
    }

    /// Registered player by id.
    pub fn player(&self, id: &str) -> Result<&Player, InvariantError> {
        self.find_player(id)
            .ok_or_else(|| InvariantError::UnknownPlayer(id.to_string()))
    }

    /// Mutable registered player by id.
    pub fn player_mut(&mut self, id: &str) -> Result<&mut Player, InvariantError> {
        self.players
            .iter_mut()
            .find(|p| p.player_id == id)
            .ok_or_else(|| InvariantError::UnknownPlayer(id.to_string()))
    }

    /// Court by 1-based number.
    pub fn court(&self, court_nr: usize) -> Result<&Court, InvariantError> {
        court_nr
            .checked_sub(1)
            .and_then(|idx| self.courts.get(idx))
            .ok_or(InvariantError::UnknownCourt(court_nr))
    }

    pub fn court_mut(&mut self, court_nr: usize) -> Result<&mut Court, InvariantError> {
        court_nr
            .checked_sub(1)
            .and_then(|idx| self.courts.get_mut(idx))
            .ok_or(InvariantError::UnknownCourt(court_nr))
    }

    /// Remove `id` from the waiting and paused lists.
    pub(crate) fn remove_from_lists(&mut self, id: &str) {
        self.waiting.retain(|w| w != id);
        self.paused.retain(|p| p != id);
    }
}
