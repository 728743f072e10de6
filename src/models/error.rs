//! Error kinds of the session controller.
//!
//! `InvariantError` means the controller itself is inconsistent or was called with
//! something it never handed out; callers propagate it. `InputError` comes from
//! untrusted data (stored snapshots, imports, user edits) and is recoverable.

use crate::models::player::PlayerId;
use std::fmt;

/// Programming-error conditions. Never caught inside the library.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantError {
    /// Operation on a player that is not in the registry.
    UnknownPlayer(PlayerId),
    /// Court number outside the fixed court list.
    UnknownCourt(usize),
    /// Link number outside the link table.
    UnknownLink(usize),
    /// A player carries a link number whose table entry is empty or lacks the player.
    BrokenLink(usize),
    /// More than two players carry the same link number.
    LinkOverused { link: usize, count: usize },
    /// The winning picker bin did not collect exactly its capacity.
    PickerMismatch { expected: usize, collected: usize },
    /// The session snapshot could not be encoded.
    Encoding(String),
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::UnknownPlayer(id) => write!(f, "Unknown player '{}'", id),
            InvariantError::UnknownCourt(nr) => write!(f, "Unknown court {}", nr),
            InvariantError::UnknownLink(nr) => write!(f, "Unknown link number {}", nr),
            InvariantError::BrokenLink(nr) => write!(f, "Link {} not found", nr),
            InvariantError::LinkOverused { link, count } => {
                write!(f, "{} players have link number {}", count, link)
            }
            InvariantError::PickerMismatch {
                expected,
                collected,
            } => write!(
                f,
                "Picker bug: winning bin holds {} players, expected {}",
                collected, expected
            ),
            InvariantError::Encoding(msg) => write!(f, "Could not encode session state: {}", msg),
        }
    }
}

impl std::error::Error for InvariantError {}

/// Problems with untrusted data or rejected user edits.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputError {
    /// JSON that does not have the expected shape.
    Malformed(String),
    /// Snapshot decoded to `null`.
    MissingSnapshot,
    /// Snapshot references an id that is not in the registry.
    UnknownId(PlayerId),
    /// Snapshot references an id more than once.
    DuplicateId(PlayerId),
    CourtCountMismatch { expected: usize, found: usize },
    PausedCourtHasPlayers(usize),
    CourtOverfilled { court: usize, capacity: usize, found: usize },
    /// More than two references carry this link number.
    LinkOverused(usize),
    /// Link number larger than any link the registry could hold.
    LinkOutOfRange(usize),
    EmptyName,
    /// A player with this id is already registered.
    DuplicatePlayer(PlayerId),
    InvalidLevel(u8),
    /// The court has players; its mode cannot change now.
    CourtOccupied(usize),
    /// The import file could not be decoded at all.
    ImportDecode(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Malformed(msg) => write!(f, "Malformed data: {}", msg),
            InputError::MissingSnapshot => write!(f, "Old state not found"),
            InputError::UnknownId(id) => write!(f, "ID {} is not a known player", id),
            InputError::DuplicateId(id) => write!(f, "ID {} is used twice", id),
            InputError::CourtCountMismatch { expected, found } => write!(
                f,
                "Nr of courts doesn't match (expected {}, found {})",
                expected, found
            ),
            InputError::PausedCourtHasPlayers(nr) => {
                write!(f, "Paused court {} contained players", nr)
            }
            InputError::CourtOverfilled {
                court,
                capacity,
                found,
            } => write!(
                f,
                "Court {} holds {} players, capacity is {}",
                court, found, capacity
            ),
            InputError::LinkOverused(nr) => {
                write!(f, "More than 2 players have link number {}", nr)
            }
            InputError::LinkOutOfRange(nr) => write!(f, "Link number {} is out of range", nr),
            InputError::EmptyName => write!(f, "Player name is empty"),
            InputError::DuplicatePlayer(id) => {
                write!(f, "A player with ID {} already exists", id)
            }
            InputError::InvalidLevel(level) => write!(f, "Invalid level {}", level),
            InputError::CourtOccupied(nr) => write!(f, "Court {} is in use", nr),
            InputError::ImportDecode(msg) => write!(f, "Could not read import file: {}", msg),
        }
    }
}

impl std::error::Error for InputError {}

/// Either error kind, for operations that can raise both.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdminError {
    Invariant(InvariantError),
    Input(InputError),
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Invariant(e) => e.fmt(f),
            AdminError::Input(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<InvariantError> for AdminError {
    fn from(e: InvariantError) -> Self {
        AdminError::Invariant(e)
    }
}

impl From<InputError> for AdminError {
    fn from(e: InputError) -> Self {
        AdminError::Input(e)
    }
}
