//! Court operations: clearing a finished game, court settings, and holding back a group
//! that would otherwise be put on court together again.

use crate::logic::session_state::update_session_state;
use crate::models::{Admin, AdminError, Court, InputError, InvariantError, PlayerId, UndoOption};
use rand::seq::SliceRandom;

/// Release a held group: interleave pairs of the held players with pairs of the other
/// waiting players, held players first, so the next games mix both.
pub(crate) fn release_mix_hold(admin: &mut Admin) {
    if admin.mix_hold.is_empty() {
        return;
    }
    let hold = std::mem::take(&mut admin.mix_hold);
    let (held, others): (Vec<PlayerId>, Vec<PlayerId>) = std::mem::take(&mut admin.waiting)
        .into_iter()
        .partition(|id| hold.contains(id));
    let mut held = held.chunks(2);
    let mut others = others.chunks(2);
    loop {
        match (held.next(), others.next()) {
            (None, None) => break,
            (h, o) => {
                admin.waiting.extend(h.into_iter().flatten().cloned());
                admin.waiting.extend(o.into_iter().flatten().cloned());
            }
        }
    }
    log::debug!("Released mix hold of {} players", hold.len());
}

/// Clear a court after a game. Players leave in random order; participating players go
/// back to the waiting or paused list, players that left the session are dropped. A
/// court flagged for a last game is paused.
///
/// When the waiting list then holds exactly the group that just played and another open
/// court exists, that group is held back (`mix_more`) until another court clears or the
/// set of present players changes. Clearing an empty court without a last game flag
/// changes nothing.
pub fn clear_court(admin: &mut Admin, court_nr: usize) -> Result<(), InvariantError> {
    let court = admin.court_mut(court_nr)?;
    if court.players.is_empty() && !court.last_game {
        return Ok(());
    }
    let mut leaving = std::mem::take(&mut court.players);
    let capacity = court.capacity();
    if court.last_game {
        court.paused = true;
        court.last_game = false;
    }
    leaving.shuffle(&mut rand::thread_rng());

    let mut back_waiting = Vec::with_capacity(leaving.len());
    for id in leaving {
        let p = admin.player_mut(&id)?;
        p.on_court = 0;
        if !p.participating {
            p.paused = false;
        } else if p.paused {
            admin.paused.push(id);
        } else {
            admin.waiting.push(id.clone());
            back_waiting.push(id);
        }
    }

    if admin.mix_more() {
        release_mix_hold(admin);
    } else {
        let same_group = !back_waiting.is_empty()
            && back_waiting.len() == capacity
            && admin.waiting.len() == back_waiting.len();
        let other_open = admin
            .courts
            .iter()
            .any(|c| c.court_nr != court_nr && !c.paused);
        if same_group && other_open {
            log::debug!("Court {} cleared, holding its players to mix", court_nr);
            admin.mix_hold = back_waiting;
        }
    }
    update_session_state(admin, UndoOption::Make)
}

fn empty_court_mut(admin: &mut Admin, court_nr: usize) -> Result<&mut Court, AdminError> {
    let court = admin.court_mut(court_nr)?;
    if !court.players.is_empty() {
        return Err(InputError::CourtOccupied(court_nr).into());
    }
    Ok(court)
}

/// Make a court double or single. Only while nobody is on it.
pub fn set_court_double(admin: &mut Admin, court_nr: usize, double: bool) -> Result<(), AdminError> {
    if admin.court(court_nr)?.is_double == double {
        return Ok(());
    }
    empty_court_mut(admin, court_nr)?.is_double = double;
    update_session_state(admin, UndoOption::DoNothing)?;
    Ok(())
}

/// Close a court (training) or open it again. Only while nobody is on it.
pub fn set_court_paused(admin: &mut Admin, court_nr: usize, paused: bool) -> Result<(), AdminError> {
    if admin.court(court_nr)?.paused == paused {
        return Ok(());
    }
    let court = empty_court_mut(admin, court_nr)?;
    court.paused = paused;
    court.last_game = false;
    update_session_state(admin, UndoOption::DoNothing)?;
    Ok(())
}

/// Flag a court to be paused once its current game is cleared.
pub fn set_court_last_game(
    admin: &mut Admin,
    court_nr: usize,
    last_game: bool,
) -> Result<(), InvariantError> {
    let court = admin.court_mut(court_nr)?;
    court.last_game = last_game && !court.paused;
    update_session_state(admin, UndoOption::DoNothing)
}
