//! Court assignment: fill open courts from the waiting list with the level picker.

use crate::logic::links::current_level;
use crate::logic::picker::Picker;
use crate::logic::session_state::update_session_state;
use crate::models::{Admin, InvariantError, PlayerId, UndoOption, MAX_LEVEL, MIN_LEVEL};

/// Switch between one level tier (everybody plays with everybody) and three overlapping
/// tiers.
pub fn level_based_court_assignment(admin: &mut Admin, enable: bool) -> Result<(), InvariantError> {
    admin.picker = Picker::new(enable);
    count_levels(admin)
}

/// Move players of a court that is not full back to the lists: active players to the
/// front of the waiting list, to-be-paused players to the paused list. Players that
/// left the session are dropped. Returns whether the court had players.
fn evacuate_partial_court(admin: &mut Admin, court_idx: usize) -> Result<bool, InvariantError> {
    let mut evacuated = false;
    while let Some(id) = admin.courts[court_idx].players.pop() {
        evacuated = true;
        let p = admin.player_mut(&id)?;
        p.on_court = 0;
        if !p.participating {
            p.paused = false;
        } else if p.paused {
            admin.paused.push(id);
        } else {
            admin.waiting.insert(0, id);
        }
    }
    Ok(evacuated)
}

/// Split the waiting list: `ready` holds unlinked players and complete buddy pairs (the
/// pair adjacent, in the order the second buddy was reached); `not_yet` holds linked
/// players whose buddy is not waiting.
fn sequence_waiting(admin: &mut Admin) -> Result<(Vec<PlayerId>, Vec<PlayerId>), InvariantError> {
    let mut ready = Vec::with_capacity(admin.waiting.len());
    let mut not_yet: Vec<PlayerId> = Vec::new();
    for id in std::mem::take(&mut admin.waiting) {
        match admin.player(&id)?.link_number() {
            Some(nr) => {
                let peer = not_yet.iter().position(|other| {
                    admin.find_player(other).and_then(|p| p.link_number()) == Some(nr)
                });
                match peer {
                    Some(idx) => {
                        ready.push(not_yet.remove(idx));
                        ready.push(id);
                    }
                    None => not_yet.push(id),
                }
            }
            None => ready.push(id),
        }
    }
    Ok((ready, not_yet))
}

/// Two-pass pick over `ready`: first require the tier of the longest waiting player, then
/// accept any complete group. Returns the selected indices into `ready`.
fn pick_group(
    admin: &mut Admin,
    ready: &[PlayerId],
    single: bool,
) -> Result<Option<Vec<usize>>, InvariantError> {
    let candidates = ready
        .iter()
        .map(|id| -> Result<(bool, u8), InvariantError> {
            let with_buddy = admin.player(id)?.link_number().is_some();
            Ok((with_buddy, current_level(admin, id)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let Some(&(_, first_level)) = candidates.first() else {
        return Ok(None);
    };

    for required in [Some(first_level), None] {
        admin.picker.start(single);
        let mut i = 0;
        while i < candidates.len() {
            let (with_buddy, level) = candidates[i];
            if admin.picker.check(i, with_buddy, level, required) {
                return admin.picker.result().map(Some);
            }
            i += if with_buddy { 2 } else { 1 };
        }
    }
    Ok(None)
}

/// Try to fill every open court that is not full. `on_assigned` is called with the
/// court number of each new game.
pub fn assign_participants(
    admin: &mut Admin,
    mut on_assigned: impl FnMut(usize),
) -> Result<(), InvariantError> {
    if admin.mix_more() {
        log::debug!(
            "Holding {} players back until they can be mixed",
            admin.mix_hold.len()
        );
        return Ok(());
    }
    let mut changed = false;
    for court_idx in 0..admin.courts.len() {
        let court = &admin.courts[court_idx];
        if court.paused || court.is_full() {
            continue;
        }
        let (court_nr, capacity, single) = (court.court_nr, court.capacity(), !court.is_double);

        changed |= evacuate_partial_court(admin, court_idx)?;
        let (mut ready, not_yet) = sequence_waiting(admin)?;

        if ready.len() >= capacity {
            if let Some(indices) = pick_group(admin, &ready, single)? {
                let mut selected = Vec::with_capacity(capacity);
                let mut rest = Vec::with_capacity(ready.len() - capacity);
                for (idx, id) in ready.into_iter().enumerate() {
                    if indices.contains(&idx) {
                        selected.push(id);
                    } else {
                        rest.push(id);
                    }
                }
                ready = rest;
                for id in &selected {
                    let p = admin.player_mut(id)?;
                    p.on_court = court_nr;
                    p.paused = false;
                }
                log::debug!("Court {}: {}", court_nr, selected.join(", "));
                admin.courts[court_idx].players = selected;
                changed = true;
                on_assigned(court_nr);
            }
        }
        ready.extend(not_yet);
        admin.waiting = ready;
    }
    if changed {
        update_session_state(admin, UndoOption::Keep)?;
    }
    Ok(())
}

/// Recompute `level_can_play`: for each level, whether enough players of compatible
/// levels are around to fill a court. Counts waiting players and active players on
/// court. Advisory only.
pub fn count_levels(admin: &mut Admin) -> Result<(), InvariantError> {
    let mut level_counts = [0usize; MAX_LEVEL as usize];
    let mut count = |id: &PlayerId| -> Result<(), InvariantError> {
        let level = current_level(admin, id)?.clamp(MIN_LEVEL, MAX_LEVEL);
        level_counts[usize::from(level - MIN_LEVEL)] += 1;
        Ok(())
    };
    for id in &admin.waiting {
        count(id)?;
    }
    for court in &admin.courts {
        for id in &court.players {
            let p = admin.player(id)?;
            if p.participating && !p.paused {
                count(id)?;
            }
        }
    }

    let can_single = admin.courts.iter().any(|c| !c.paused && !c.is_double);
    let required = if can_single { 2 } else { 4 };
    if admin.picker.nr_levels() == 1 {
        let can_play = level_counts.iter().sum::<usize>() >= required;
        admin.level_can_play = [can_play; 5];
    } else {
        let group = |from: usize| level_counts[from..from + 3].iter().sum::<usize>() >= required;
        let (low, mid, high) = (group(0), group(1), group(2));
        admin.level_can_play = [low, low || mid, low || mid || high, mid || high, high];
    }
    Ok(())
}
