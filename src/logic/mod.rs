//! Session business logic: picker, assignment, links, presence, snapshots, import.

mod assign;
mod courts;
mod import;
mod links;
pub mod picker;
mod presence;
mod registry;
mod session_state;

pub use assign::{assign_participants, count_levels, level_based_court_assignment};
pub use courts::{clear_court, set_court_double, set_court_last_game, set_court_paused};
pub use import::{
    decode_csv_rows, handle_import_data, map_import_fields, players_json_to_csv, ImportRow,
};
pub use links::{
    break_link, clear_selected_player, create_link, current_level, link_update, linked_player,
    rebuild_player_links,
};
pub use picker::{LevelBin, Picker};
pub use presence::{make_player_active, make_player_paused, toggle_player_presence};
pub use registry::{
    add_player, delete_player, export_players, load_players, players_to_storage,
    update_player_level,
};
pub use session_state::{
    preserve_old_state, recover_session, reset_session_state, restore_old_state,
    restore_session_state_to, undo, update_session_state, CourtRecord, CourtStatus,
    OnCourtState, PlayerRef, SessionSnapshot,
};
