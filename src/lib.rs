//! Court rotation for club play sessions: library with the session engine and its
//! collaborators.

pub mod config;
pub mod logic;
pub mod models;

pub use logic::{
    add_player, assign_participants, clear_court, delete_player, handle_import_data,
    link_update, load_players, make_player_active, make_player_paused, recover_session,
    restore_session_state_to, toggle_player_presence, undo, update_session_state, Picker,
};
pub use models::{
    Admin, AdminError, AdminStorage, Alert, Court, DialogSlot, Gender, InputError,
    InvariantError, KnownPlayer, Link, MemoryStorage, Player, PlayerId, SessionView,
    UndoOption,
};
