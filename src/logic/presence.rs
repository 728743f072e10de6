//! Presence and pause state of players during a session.

use crate::logic::courts::release_mix_hold;
use crate::logic::links::break_link;
use crate::logic::session_state::update_session_state;
use crate::models::{Admin, InvariantError, Link, UndoOption};

/// Check a player in or out.
///
/// Checking out removes the player from the waiting and paused lists and breaks any link
/// or pending link selection. A player on court stays there until the court is cleared.
/// Checking in appends the player to the waiting list, unless it is still on a court
/// (then the check-out is simply undone).
pub fn toggle_player_presence(admin: &mut Admin, id: &str) -> Result<(), InvariantError> {
    let p = admin.player_mut(id)?;
    p.participating = !p.participating;
    let (participating, on_court, link) = (p.participating, p.on_court, p.link);
    if participating {
        p.paused = false;
        if on_court == 0 {
            admin.waiting.push(id.to_string());
        }
    } else {
        match link {
            Some(Link::Linked(nr)) => break_link(admin, nr)?,
            Some(Link::Selected) => {
                admin.player_mut(id)?.link = None;
                admin.x_selected = None;
            }
            None => {}
        }
        admin.remove_from_lists(id);
    }
    release_mix_hold(admin);
    update_session_state(admin, UndoOption::DoNothing)
}

/// Pause a participating player: from the waiting list to the paused list, or, when on
/// court, mark it to be paused once the court clears.
pub fn make_player_paused(admin: &mut Admin, id: &str) -> Result<(), InvariantError> {
    let on_court = admin.player(id)?.on_court;
    if on_court != 0 {
        admin.player_mut(id)?.paused = true;
    } else if let Some(idx) = admin.waiting.iter().position(|w| w == id) {
        let id = admin.waiting.remove(idx);
        admin.player_mut(&id)?.paused = true;
        admin.paused.push(id);
    }
    release_mix_hold(admin);
    update_session_state(admin, UndoOption::DoNothing)
}

/// Activate a participating player: from the paused list to the back of the waiting list,
/// or, when on court, drop the to-be-paused mark.
pub fn make_player_active(admin: &mut Admin, id: &str) -> Result<(), InvariantError> {
    let on_court = admin.player(id)?.on_court;
    if on_court != 0 {
        admin.player_mut(id)?.paused = false;
    } else if let Some(idx) = admin.paused.iter().position(|q| q == id) {
        let id = admin.paused.remove(idx);
        admin.player_mut(&id)?.paused = false;
        admin.waiting.push(id);
    }
    release_mix_hold(admin);
    update_session_state(admin, UndoOption::DoNothing)
}
