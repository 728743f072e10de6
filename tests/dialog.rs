//! Integration tests for the single dialog slot.

use court_rotation::models::{DialogKind, DialogSlot};
use court_rotation::Alert;
use std::sync::{Arc, Mutex};

fn recorder() -> (Arc<Mutex<Vec<bool>>>, Box<dyn FnOnce(bool) + Send + Sync>) {
    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&results);
    (results, Box::new(move |ok| sink.lock().unwrap().push(ok)))
}

#[test]
fn second_alert_is_not_shown() {
    let mut slot = DialogSlot::new();
    slot.display("Problem", "first");
    slot.display("Problem", "second");
    let active = slot.active().unwrap();
    assert_eq!(active.kind, DialogKind::Alert);
    assert_eq!(active.message, "first");
    assert!(slot.dismiss(false));
    assert!(!slot.is_open());
    assert!(!slot.dismiss(false));
}

#[test]
fn confirm_passes_result_on_dismiss() {
    let mut slot = DialogSlot::new();
    let (results, action) = recorder();
    slot.confirm("Delete", "Delete player?", action);
    assert_eq!(slot.active().unwrap().kind, DialogKind::Confirm);
    assert!(results.lock().unwrap().is_empty());
    slot.dismiss(true);
    assert_eq!(*results.lock().unwrap(), vec![true]);
}

#[test]
fn confirm_while_open_fails_immediately() {
    let mut slot = DialogSlot::new();
    slot.display("Import", "3 rows contain no player ID");
    let (results, action) = recorder();
    slot.confirm("Delete", "Delete player?", action);
    assert_eq!(*results.lock().unwrap(), vec![false]);
    assert_eq!(slot.active().unwrap().title, "Import");
}
