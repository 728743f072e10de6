//! Integration tests for session snapshots: encoding, restore, undo and crash recovery.

mod common;

use common::{assert_invariants, assign, court_ids, ids, make_admin, make_test_players, present};
use court_rotation::logic::{players_to_storage, SessionSnapshot};
use court_rotation::{
    clear_court, link_update, load_players, make_player_paused, recover_session,
    restore_session_state_to, toggle_player_presence, undo, Admin, AdminStorage, Link,
    MemoryStorage,
};

#[derive(Default)]
struct Alerts(Vec<(String, String)>);

impl court_rotation::Alert for Alerts {
    fn display(&mut self, title: &str, message: &str) {
        self.0.push((title.to_string(), message.to_string()));
    }
}

fn restore(admin: &mut Admin, encoded: &str) -> (bool, Alerts) {
    let mut alerts = Alerts::default();
    let restored = restore_session_state_to(admin, encoded, &mut alerts).unwrap();
    (restored, alerts)
}

fn assert_empty_session(admin: &Admin) {
    assert!(admin.waiting.is_empty());
    assert!(admin.paused.is_empty());
    assert!(admin.courts.iter().all(|c| c.players.is_empty()));
    assert!(admin.players.iter().all(|p| !p.participating && p.link.is_none()));
}

#[test]
fn snapshot_format() {
    let mut admin = make_admin(2, false);
    present(&mut admin, &["1000", "1001", "1002", "1003", "1004", "1005"]);
    let mut alerts = Alerts::default();
    link_update(&mut admin, "1004", &mut alerts).unwrap();
    link_update(&mut admin, "1005", &mut alerts).unwrap();
    assign(&mut admin);
    make_player_paused(&mut admin, "1001").unwrap();
    court_rotation::logic::set_court_double(&mut admin, 2, false).unwrap();

    let expected = concat!(
        r#"{"w":[["1004",1],["1005",1]],"p":[],"c":["#,
        r#"{"s":"2","p":[["1000","-"],["1001","p"],["1002","-"],["1003","-"]]},"#,
        r#"{"s":"1","p":[]}]}"#
    );
    assert_eq!(admin.state_string, expected);
    assert_eq!(admin.storage().state().as_deref(), Some(expected));
    assert!(alerts.0.is_empty());
}

#[test]
fn snapshot_marks_gone_players_and_court_modes() {
    let mut admin = make_admin(3, false);
    present(&mut admin, &["1000", "1001", "1002", "1003"]);
    assign(&mut admin);
    toggle_player_presence(&mut admin, "1003").unwrap();
    court_rotation::logic::set_court_last_game(&mut admin, 1, true).unwrap();
    court_rotation::logic::set_court_paused(&mut admin, 2, true).unwrap();
    court_rotation::logic::set_court_double(&mut admin, 3, false).unwrap();
    court_rotation::logic::set_court_last_game(&mut admin, 3, true).unwrap();

    let snapshot = SessionSnapshot::capture(&admin);
    let encoded = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(encoded["c"][0]["s"], "L");
    assert_eq!(encoded["c"][0]["p"][3][1], "g");
    assert_eq!(encoded["c"][1]["s"], "p");
    assert_eq!(encoded["c"][2]["s"], "l");
}

#[test]
fn restore_round_trip() {
    let mut admin = make_admin(2, true);
    present(
        &mut admin,
        &["1000", "1001", "1002", "1003", "1004", "1005", "2000"],
    );
    let mut alerts = Alerts::default();
    link_update(&mut admin, "1005", &mut alerts).unwrap();
    link_update(&mut admin, "2000", &mut alerts).unwrap();
    assign(&mut admin);
    make_player_paused(&mut admin, "1004").unwrap();
    toggle_player_presence(&mut admin, "1000").unwrap();
    let encoded = admin.state_string.clone();

    let mut other = make_admin(2, true);
    let (restored, alerts) = restore(&mut other, &encoded);
    assert!(restored);
    assert!(alerts.0.is_empty());
    assert_eq!(other.waiting, admin.waiting);
    assert_eq!(other.paused, admin.paused);
    assert_eq!(other.courts, admin.courts);
    assert_eq!(other.players, admin.players);
    assert_eq!(other.player_links, admin.player_links);
    assert_eq!(SessionSnapshot::capture(&other), SessionSnapshot::capture(&admin));
    assert_eq!(other.state_string, encoded);
    assert_invariants(&other);
}

#[test]
fn duplicate_id_gives_empty_session_and_one_alert() {
    let mut admin = make_admin(1, false);
    present(&mut admin, &["1000"]);
    let (restored, alerts) = restore(
        &mut admin,
        r#"{"w":["1001","1002"],"p":["1001"],"c":[{"s":"2","p":[]}]}"#,
    );
    assert!(!restored);
    assert_eq!(alerts.0.len(), 1);
    assert_eq!(alerts.0[0].0, "Problem");
    assert!(alerts.0[0]
        .1
        .starts_with("The previous session state could not be restored\n'"));
    assert_empty_session(&admin);
}

#[test]
fn unknown_id_is_rejected() {
    let mut admin = make_admin(1, false);
    let (restored, alerts) = restore(&mut admin, r#"{"w":["42"],"p":[],"c":[{"s":"2","p":[]}]}"#);
    assert!(!restored);
    assert_eq!(alerts.0.len(), 1);
    assert_empty_session(&admin);
}

#[test]
fn court_count_mismatch_is_rejected() {
    let mut admin = make_admin(2, false);
    let (restored, alerts) = restore(&mut admin, r#"{"w":["1000"],"p":[],"c":[{"s":"2","p":[]}]}"#);
    assert!(!restored);
    assert_eq!(alerts.0.len(), 1);
    assert_empty_session(&admin);
}

#[test]
fn paused_court_with_players_is_rejected() {
    let mut admin = make_admin(1, false);
    let (restored, _) = restore(
        &mut admin,
        r#"{"w":[],"p":[],"c":[{"s":"p","p":[["1000","-"]]}]}"#,
    );
    assert!(!restored);
    assert_empty_session(&admin);
}

#[test]
fn overfilled_single_court_is_rejected() {
    let mut admin = make_admin(1, false);
    let (restored, _) = restore(
        &mut admin,
        r#"{"w":[],"p":[],"c":[{"s":"1","p":[["1000","-"],["1001","-"],["1002","-"]]}]}"#,
    );
    assert!(!restored);
    assert_empty_session(&admin);
}

#[test]
fn link_used_three_times_is_rejected() {
    let mut admin = make_admin(1, false);
    let (restored, _) = restore(
        &mut admin,
        r#"{"w":[["1000",1],["1001",1],["1002",1]],"p":[],"c":[{"s":"2","p":[]}]}"#,
    );
    assert!(!restored);
    assert_empty_session(&admin);
}

#[test]
fn malformed_and_missing_snapshots_are_rejected() {
    for encoded in ["", "null", "{\"w\":", "[]"] {
        let mut admin = make_admin(1, false);
        let (restored, alerts) = restore(&mut admin, encoded);
        assert!(!restored, "restored from {encoded:?}");
        assert_eq!(alerts.0.len(), 1);
    }
}

#[test]
fn restored_links_are_rebuilt() {
    let mut admin = make_admin(1, false);
    let (restored, _) = restore(
        &mut admin,
        r#"{"w":[["1000",2],"1001",["1002",2],["1003",1]],"p":[],"c":[{"s":"2","p":[]}]}"#,
    );
    assert!(restored);
    assert_eq!(admin.player("1000").unwrap().link, Some(Link::Linked(2)));
    assert_eq!(admin.player("1003").unwrap().link, None);
    assert_eq!(admin.player_links[0], None);
    assert_invariants(&admin);
}

#[test]
fn undo_after_clear_court() {
    let mut admin = make_admin(1, false);
    present(&mut admin, &["1000", "1001", "1002", "1003", "1004"]);
    assign(&mut admin);
    assert!(!admin.can_undo);
    clear_court(&mut admin, 1).unwrap();
    assert!(admin.can_undo);

    let mut alerts = Alerts::default();
    assert!(undo(&mut admin, &mut alerts).unwrap());
    assert!(alerts.0.is_empty());
    assert!(!admin.can_undo);
    assert_eq!(court_ids(&admin, 1), vec!["1000", "1001", "1002", "1003"]);
    assert_eq!(ids(&admin.waiting), vec!["1004"]);
    assert_invariants(&admin);
}

#[test]
fn undo_survives_assignment_but_not_presence_change() {
    let mut admin = make_admin(2, false);
    present(&mut admin, &["1000", "1001", "1002", "1003", "1004"]);
    assign(&mut admin);
    clear_court(&mut admin, 1).unwrap();
    assign(&mut admin);
    assert!(admin.can_undo);

    toggle_player_presence(&mut admin, "1005").unwrap();
    assert!(!admin.can_undo);
    let mut alerts = Alerts::default();
    assert!(!undo(&mut admin, &mut alerts).unwrap());
}

#[test]
fn recover_continues_previous_run() {
    let mut previous = make_admin(1, false);
    players_to_storage(&mut previous).unwrap();
    present(&mut previous, &["1000", "1001", "1002", "1003", "3000"]);
    assign(&mut previous);
    let state = previous.storage().state();

    let storage = MemoryStorage {
        players: previous.storage().players(),
        state: state.clone(),
        old_state: None,
    };
    let mut admin = Admin::new(1, Box::new(storage));
    load_players(&mut admin).unwrap();
    assert_eq!(admin.players.len(), make_test_players().len());

    let mut alerts = Alerts::default();
    assert!(recover_session(&mut admin, &mut alerts).unwrap());
    assert!(alerts.0.is_empty());
    assert_eq!(admin.storage().old_state(), state);
    assert_eq!(court_ids(&admin, 1), vec!["1000", "1001", "1002", "1003"]);
    assert_eq!(ids(&admin.waiting), vec!["3000"]);
    assert_invariants(&admin);
}

#[test]
fn recover_without_previous_run_starts_empty() {
    let mut admin = make_admin(2, false);
    let mut alerts = Alerts::default();
    assert!(!recover_session(&mut admin, &mut alerts).unwrap());
    assert!(alerts.0.is_empty());
    assert_empty_session(&admin);
}
