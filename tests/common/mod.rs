//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use court_rotation::logic::level_based_court_assignment;
use court_rotation::{
    assign_participants, toggle_player_presence, Admin, Gender, Player, PlayerId,
};
use std::collections::HashSet;

/// Ten players per level; ids are `1000 * level + i`, genders alternate m/v.
pub fn make_test_players() -> Vec<Player> {
    let mut players = Vec::with_capacity(50);
    for level in 1..=5u8 {
        for i in 0..10usize {
            let gender = if i % 2 == 0 { Gender::M } else { Gender::V };
            players.push(Player::new(
                (1000 * usize::from(level) + i).to_string(),
                format!("Player {level}-{i}"),
                gender,
                level,
            ));
        }
    }
    players
}

pub fn make_admin(courts: usize, three_level: bool) -> Admin {
    let mut admin = Admin::in_memory(courts);
    admin.players = make_test_players();
    level_based_court_assignment(&mut admin, three_level).unwrap();
    admin
}

/// Check players in, in the given order.
pub fn present(admin: &mut Admin, ids: &[&str]) {
    for id in ids {
        toggle_player_presence(admin, id).unwrap();
    }
}

/// Run an assignment round and return the courts that got a game.
pub fn assign(admin: &mut Admin) -> Vec<usize> {
    let mut assigned = Vec::new();
    assign_participants(admin, |nr| assigned.push(nr)).unwrap();
    assigned
}

pub fn ids(list: &[PlayerId]) -> Vec<&str> {
    list.iter().map(String::as_str).collect()
}

pub fn court_ids(admin: &Admin, court_nr: usize) -> Vec<&str> {
    ids(&admin.courts[court_nr - 1].players)
}

/// Structural invariants that must hold after every committed operation.
pub fn assert_invariants(admin: &Admin) {
    let mut seen = HashSet::new();
    for id in admin.waiting.iter().chain(&admin.paused) {
        assert!(seen.insert(id.clone()), "{id} listed twice");
        let p = admin.player(id).unwrap();
        assert!(p.participating, "{id} listed but not present");
        assert_eq!(p.on_court, 0, "{id} listed while on court");
    }
    for id in &admin.paused {
        assert!(admin.player(id).unwrap().paused, "{id} in paused list not paused");
    }
    for court in &admin.courts {
        assert!(court.players.len() <= court.capacity());
        if court.paused {
            assert!(court.players.is_empty(), "paused court {} has players", court.court_nr);
        }
        for id in &court.players {
            assert!(seen.insert(id.clone()), "{id} listed twice");
            assert_eq!(admin.player(id).unwrap().on_court, court.court_nr);
        }
    }
    for p in &admin.players {
        if p.participating {
            assert!(seen.contains(&p.player_id), "{} present but nowhere", p.player_id);
        }
        if let Some(nr) = p.link_number() {
            let pair = admin.player_links[nr - 1].as_ref().unwrap();
            assert!(pair.contains(&p.player_id));
        }
    }
}
