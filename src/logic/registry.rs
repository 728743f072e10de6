//! Known players: loading, storing, adding, deleting and editing registry entries.

use crate::logic::assign::count_levels;
use crate::logic::import::{gender_from_value, level_from_value, value_to_string};
use crate::logic::links::break_link;
use crate::logic::session_state::update_session_state;
use crate::models::{
    is_valid_level, Admin, AdminError, Gender, InputError, InvariantError, KnownPlayer, Link,
    Player, PlayerId, UndoOption,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

/// Field names used by older versions of the stored players list. `None` drops the field.
const LEGACY_FIELDS: &[(&str, Option<&str>)] = &[("speelNummer", Some("playerId")), ("ranking", None)];

/// Rename or drop legacy fields of one stored record.
fn migrate_record(mut record: Map<String, Value>) -> Map<String, Value> {
    for &(old, new) in LEGACY_FIELDS {
        if let Some(value) = record.remove(old) {
            if let Some(new) = new {
                record.entry(new).or_insert(value);
            }
        }
    }
    record
}

fn player_from_record(record: &Map<String, Value>) -> Option<Player> {
    let player_id = record.get("playerId").and_then(value_to_string)?;
    let Some(name) = record.get("name").and_then(value_to_string) else {
        log::warn!("Dropping stored player {}: no name", player_id);
        return None;
    };
    let gender = record
        .get("gender")
        .and_then(gender_from_value)
        .unwrap_or_default();
    let level = record.get("level").and_then(level_from_value).unwrap_or(1);
    Some(Player::new(player_id, name, gender, level))
}

/// Load the known players from storage. A missing list is initialized empty; a list that
/// cannot be decoded is replaced by an empty registry. Records without id or name are
/// skipped, and of several records with the same id only the first is kept.
pub fn load_players(admin: &mut Admin) -> Result<(), InvariantError> {
    let stored = match admin.storage().players() {
        Some(stored) if !stored.is_empty() => stored,
        _ => {
            admin.storage_mut().set_players("[]".to_string());
            "[]".to_string()
        }
    };
    let records: Vec<Map<String, Value>> = match serde_json::from_str(&stored) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Error decoding players list from storage '{}'", e);
            Vec::new()
        }
    };
    let mut seen = HashSet::new();
    admin.players = records
        .into_iter()
        .map(migrate_record)
        .filter_map(|r| player_from_record(&r))
        .filter(|p| {
            let first = seen.insert(p.player_id.clone());
            if !first {
                log::warn!("Dropping stored player '{}': duplicate id {}", p.name, p.player_id);
            }
            first
        })
        .collect();
    log::info!("Loaded {} known players", admin.players.len());
    count_levels(admin)
}

/// Store the identity of all known players.
pub fn players_to_storage(admin: &mut Admin) -> Result<(), InvariantError> {
    let identities: Vec<KnownPlayer> = admin.players.iter().map(Player::identity).collect();
    let encoded =
        serde_json::to_string(&identities).map_err(|e| InvariantError::Encoding(e.to_string()))?;
    admin.storage_mut().set_players(encoded);
    Ok(())
}

/// The stored players list as JSON, verbatim.
pub fn export_players(admin: &Admin) -> Option<String> {
    admin.storage().players()
}

/// Register a new player. Without `player_id` a fresh UUID is used.
pub fn add_player(
    admin: &mut Admin,
    name: &str,
    gender: Gender,
    level: u8,
    player_id: Option<&str>,
) -> Result<PlayerId, AdminError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::EmptyName.into());
    }
    if !is_valid_level(level) {
        return Err(InputError::InvalidLevel(level).into());
    }
    let player_id = match player_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };
    if admin.find_player(&player_id).is_some() {
        return Err(InputError::DuplicatePlayer(player_id).into());
    }
    admin
        .players
        .push(Player::new(player_id.clone(), name, gender, level));
    players_to_storage(admin)?;
    count_levels(admin)?;
    Ok(player_id)
}

/// Remove a player from the registry and from the session.
pub fn delete_player(admin: &mut Admin, id: &str) -> Result<(), InvariantError> {
    match admin.player(id)?.link {
        Some(Link::Linked(nr)) => break_link(admin, nr)?,
        Some(Link::Selected) => admin.x_selected = None,
        None => {}
    }
    admin.remove_from_lists(id);
    admin.mix_hold.retain(|h| h != id);
    for court in &mut admin.courts {
        court.players.retain(|p| p != id);
    }
    admin.players.retain(|p| p.player_id != id);
    players_to_storage(admin)?;
    update_session_state(admin, UndoOption::DoNothing)
}

/// Change a player's level. Invalid or unchanged levels are ignored.
pub fn update_player_level(admin: &mut Admin, id: &str, level: u8) -> Result<(), InvariantError> {
    let p = admin.player_mut(id)?;
    if !is_valid_level(level) || p.level == level {
        return Ok(());
    }
    p.level = level;
    players_to_storage(admin)?;
    count_levels(admin)
}
