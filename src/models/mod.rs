//! Data structures for the session: players, courts, the admin aggregate, collaborators.

mod admin;
mod court;
mod dialog;
mod error;
mod player;
mod storage;
mod view;

pub use admin::{Admin, UndoOption};
pub use court::{Court, DOUBLE_CAPACITY, SINGLE_CAPACITY};
pub use dialog::{Alert, ConfirmAction, DialogKind, DialogSlot, DialogView};
pub use error::{AdminError, InputError, InvariantError};
pub use player::{
    is_valid_level, level_from_f64, Gender, KnownPlayer, Link, Player, PlayerId, MAX_LEVEL,
    MIN_LEVEL,
};
pub use storage::{AdminStorage, FileStorage, MemoryStorage};
pub use view::{CourtView, PlayerView, SessionView};
