//! Buddy links: players that must be assigned to a court together.

use crate::logic::session_state::update_session_state;
use crate::models::{Admin, Alert, InvariantError, Link, Player, PlayerId, UndoOption};

/// Link two players using the lowest free link number. Returns that number.
pub fn create_link(admin: &mut Admin, id1: &str, id2: &str) -> Result<usize, InvariantError> {
    admin.player(id1)?;
    admin.player(id2)?;
    let pair = [id1.to_string(), id2.to_string()];
    let idx = match admin.player_links.iter().position(Option::is_none) {
        Some(idx) => {
            admin.player_links[idx] = Some(pair);
            idx
        }
        None => {
            admin.player_links.push(Some(pair));
            admin.player_links.len() - 1
        }
    };
    let nr = idx + 1;
    admin.player_mut(id1)?.link = Some(Link::Linked(nr));
    admin.player_mut(id2)?.link = Some(Link::Linked(nr));
    Ok(nr)
}

/// Break link `link_nr` (1-based), clearing the link of both players.
pub fn break_link(admin: &mut Admin, link_nr: usize) -> Result<(), InvariantError> {
    if link_nr < 1 || link_nr > admin.player_links.len() {
        return Err(InvariantError::UnknownLink(link_nr));
    }
    if let Some(pair) = admin.player_links[link_nr - 1].take() {
        for id in &pair {
            admin.player_mut(id)?.link = None;
        }
    }
    Ok(())
}

/// Rebuild the link table from the `link` fields of the registry, e.g. after an import
/// or a restore. Numbers held by a single player are stripped.
pub fn rebuild_player_links(admin: &mut Admin) -> Result<(), InvariantError> {
    let max_link = admin
        .players
        .iter()
        .filter_map(Player::link_number)
        .max()
        .unwrap_or(0);
    let mut links = Vec::with_capacity(max_link);
    for nr in 1..=max_link {
        let holders: Vec<PlayerId> = admin
            .players
            .iter()
            .filter(|p| p.link_number() == Some(nr))
            .map(|p| p.player_id.clone())
            .collect();
        match holders.len() {
            2 => links.push(Some([holders[0].clone(), holders[1].clone()])),
            0 => links.push(None),
            1 => {
                log::warn!("Dropping link {} of '{}': no partner", nr, holders[0]);
                admin.player_mut(&holders[0])?.link = None;
                links.push(None);
            }
            count => return Err(InvariantError::LinkOverused { link: nr, count }),
        }
    }
    admin.player_links = links;
    Ok(())
}

/// Cancel a pending link selection.
pub fn clear_selected_player(admin: &mut Admin) {
    if let Some(id) = admin.x_selected.take() {
        if let Some(p) = admin.players.iter_mut().find(|p| p.player_id == id) {
            p.link = None;
        }
    }
}

/// A player was clicked while editing links.
///
/// First click on an unlinked player selects it; a click on a second unlinked player
/// links both; clicking the selected player again cancels. Clicking a linked player
/// breaks its link, unless another player is selected: that is a conflict, reported
/// through `alert`, and nothing changes. Every other click is persisted.
pub fn link_update(
    admin: &mut Admin,
    id: &str,
    alert: &mut impl Alert,
) -> Result<(), InvariantError> {
    let link = admin.player(id)?.link;
    match link {
        None => match admin.x_selected.take() {
            None => {
                admin.player_mut(id)?.link = Some(Link::Selected);
                admin.x_selected = Some(id.to_string());
            }
            Some(selected) => {
                create_link(admin, &selected, id)?;
            }
        },
        Some(Link::Selected) => {
            admin.x_selected = None;
            admin.player_mut(id)?.link = None;
        }
        Some(Link::Linked(nr)) => {
            if admin.x_selected.is_some() {
                let name = admin.player(id)?.name.clone();
                alert.display("Error", &format!("Player \"{}\" already has a link", name));
                return Ok(());
            }
            break_link(admin, nr)?;
        }
    }
    update_session_state(admin, UndoOption::DoNothing)
}

/// The buddy of `player`, if it is linked.
pub fn linked_player<'a>(
    admin: &'a Admin,
    player: &Player,
) -> Result<Option<&'a Player>, InvariantError> {
    let Some(nr) = player.link_number() else {
        return Ok(None);
    };
    let pair = admin
        .player_links
        .get(nr - 1)
        .and_then(Option::as_ref)
        .ok_or(InvariantError::BrokenLink(nr))?;
    let other = if pair[0] == player.player_id {
        &pair[1]
    } else if pair[1] == player.player_id {
        &pair[0]
    } else {
        return Err(InvariantError::BrokenLink(nr));
    };
    admin.player(other).map(Some)
}

/// Effective level: the lower of the player's own level and its buddy's level.
pub fn current_level(admin: &Admin, id: &str) -> Result<u8, InvariantError> {
    let player = admin.player(id)?;
    Ok(match linked_player(admin, player)? {
        Some(other) => player.level.min(other.level),
        None => player.level,
    })
}
