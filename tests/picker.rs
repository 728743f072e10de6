//! Integration tests for the level picker.

use court_rotation::logic::picker::{LevelBin, Picker};
use court_rotation::InvariantError;

fn offer(picker: &mut Picker, levels: &[u8]) -> Option<Vec<usize>> {
    for (idx, &level) in levels.iter().enumerate() {
        if picker.check(idx, false, level, None) {
            return Some(picker.result().unwrap());
        }
    }
    None
}

#[test]
fn single_tier_takes_first_four() {
    let mut picker = Picker::new(false);
    assert_eq!(picker.nr_levels(), 1);
    picker.start(false);
    assert_eq!(offer(&mut picker, &[1, 5, 3, 2, 4]), Some(vec![0, 1, 2, 3]));
}

#[test]
fn single_court_needs_two() {
    let mut picker = Picker::new(false);
    picker.start(true);
    assert!(picker.check(0, true, 3, None));
    assert_eq!(picker.result().unwrap(), vec![0, 1]);
}

#[test]
fn three_tiers_rotate_between_tied_bins() {
    // Level 1 fits only the low tier, level 5 only the high tier; the level 3 players
    // fill low and high at the same offer.
    let levels = [1, 5, 3, 3, 3];
    let mut picker = Picker::new(true);
    assert_eq!(picker.nr_levels(), 3);

    picker.start(false);
    assert_eq!(offer(&mut picker, &levels), Some(vec![0, 2, 3, 4]));

    picker.start(false);
    assert_eq!(offer(&mut picker, &levels), Some(vec![1, 2, 3, 4]));

    picker.start(false);
    assert_eq!(offer(&mut picker, &levels), Some(vec![0, 2, 3, 4]));
}

#[test]
fn no_tier_fills_with_spread_levels() {
    let mut picker = Picker::new(true);
    picker.start(false);
    assert_eq!(offer(&mut picker, &[1, 1, 5, 5, 1, 5]), None);
}

#[test]
fn required_level_limits_tiers() {
    let mut picker = Picker::new(true);
    picker.start(false);
    // Level 4 players would fill mid and high, but level 1 is required.
    for idx in 0..4 {
        assert!(!picker.check(idx, false, 4, Some(1)));
    }
    assert!(!picker.check(4, false, 3, Some(1)));
}

#[test]
fn result_without_winner_is_an_error() {
    let mut picker = Picker::new(false);
    picker.start(false);
    picker.check(0, false, 2, None);
    assert!(matches!(
        picker.result(),
        Err(InvariantError::PickerMismatch {
            expected: 4,
            collected: 1
        })
    ));
}

#[test]
fn buddy_pair_is_not_split() {
    let mut bin = LevelBin::new(2, 1, 5);
    assert!(!bin.check(0, false, 2, None));
    assert!(!bin.check(1, true, 2, None));
    assert!(bin.check(3, false, 2, None));
    assert_eq!(bin.indices, vec![0, 3]);
}
