//! Court: a single or double court and the players currently on it.

use crate::models::player::PlayerId;

/// Players on a double court.
pub const DOUBLE_CAPACITY: usize = 4;
/// Players on a single court.
pub const SINGLE_CAPACITY: usize = 2;

/// One court of the session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Court {
    /// 1-based, stable for the lifetime of the session controller.
    pub court_nr: usize,
    pub is_double: bool,
    /// Closed or used for training; never assigned.
    pub paused: bool,
    /// Pause the court once the current game has been cleared.
    pub last_game: bool,
    /// Players in assignment order. Either empty or exactly `capacity()` long.
    pub players: Vec<PlayerId>,
}

impl Court {
    /// Create an open, empty double court.
    pub fn new(court_nr: usize) -> Self {
        Self {
            court_nr,
            is_double: true,
            paused: false,
            last_game: false,
            players: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        if self.is_double {
            DOUBLE_CAPACITY
        } else {
            SINGLE_CAPACITY
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() == self.capacity()
    }

    /// Back to the open, empty double court created at startup.
    pub fn reset(&mut self) {
        self.is_double = true;
        self.paused = false;
        self.last_game = false;
        self.players.clear();
    }
}
