//! Session snapshot: encoding, crash recovery and undo.
//!
//! Format: `{"w": [...], "p": [...], "c": [{"s": "2", "p": [[ref, "-"], ...]}, ...]}`.
//! A player reference is `"id"`, or `["id", link]` when linked. Court status is one of
//! `p` (paused), `2`/`L` (double, L = last game), `1`/`l` (single, l = last game). The
//! on-court player state is `g` (gone), `p` (to be paused) or `-` (active).

use crate::logic::assign::count_levels;
use crate::logic::links::rebuild_player_links;
use crate::models::{
    Admin, Alert, InputError, InvariantError, Link, PlayerId, UndoOption, DOUBLE_CAPACITY,
    SINGLE_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerRef {
    Id(PlayerId),
    Linked(PlayerId, usize),
}

impl PlayerRef {
    fn new(id: &str, link: Option<usize>) -> Self {
        match link {
            Some(nr) => PlayerRef::Linked(id.to_string(), nr),
            None => PlayerRef::Id(id.to_string()),
        }
    }

    fn parts(&self) -> (&str, Option<usize>) {
        match self {
            PlayerRef::Id(id) => (id.as_str(), None),
            PlayerRef::Linked(id, 0) => (id.as_str(), None),
            PlayerRef::Linked(id, nr) => (id.as_str(), Some(*nr)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CourtStatus {
    #[serde(rename = "p")]
    Paused,
    #[serde(rename = "2")]
    Double,
    #[serde(rename = "L")]
    DoubleLastGame,
    #[serde(rename = "1")]
    Single,
    #[serde(rename = "l")]
    SingleLastGame,
}

impl CourtStatus {
    fn is_double(self) -> bool {
        !matches!(self, CourtStatus::Single | CourtStatus::SingleLastGame)
    }

    fn is_last_game(self) -> bool {
        matches!(self, CourtStatus::DoubleLastGame | CourtStatus::SingleLastGame)
    }

    fn capacity(self) -> usize {
        if self.is_double() {
            DOUBLE_CAPACITY
        } else {
            SINGLE_CAPACITY
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OnCourtState {
    /// No longer participating, shown until the court clears.
    #[serde(rename = "g")]
    Gone,
    #[serde(rename = "p")]
    ToBePaused,
    #[serde(rename = "-")]
    Active,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CourtRecord {
    pub s: CourtStatus,
    pub p: Vec<(PlayerRef, OnCourtState)>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub w: Vec<PlayerRef>,
    pub p: Vec<PlayerRef>,
    pub c: Vec<CourtRecord>,
}

impl SessionSnapshot {
    /// Capture the current session aggregate.
    pub fn capture(admin: &Admin) -> Self {
        let to_ref = |id: &PlayerId| {
            let link = admin.find_player(id).and_then(|p| p.link_number());
            PlayerRef::new(id, link)
        };
        let c = admin
            .courts
            .iter()
            .map(|court| {
                let s = match (court.paused, court.last_game, court.is_double) {
                    (true, _, _) => CourtStatus::Paused,
                    (false, true, true) => CourtStatus::DoubleLastGame,
                    (false, true, false) => CourtStatus::SingleLastGame,
                    (false, false, true) => CourtStatus::Double,
                    (false, false, false) => CourtStatus::Single,
                };
                let p = court
                    .players
                    .iter()
                    .map(|id| {
                        let state = match admin.find_player(id) {
                            Some(p) if !p.participating => OnCourtState::Gone,
                            Some(p) if p.paused => OnCourtState::ToBePaused,
                            _ => OnCourtState::Active,
                        };
                        (to_ref(id), state)
                    })
                    .collect();
                CourtRecord { s, p }
            })
            .collect();
        Self {
            w: admin.waiting.iter().map(to_ref).collect(),
            p: admin.paused.iter().map(to_ref).collect(),
            c,
        }
    }
}

/// Encode the session, update the undo slot and write the snapshot to storage.
pub fn update_session_state(admin: &mut Admin, undo: UndoOption) -> Result<(), InvariantError> {
    let encoded = serde_json::to_string(&SessionSnapshot::capture(admin))
        .map_err(|e| InvariantError::Encoding(e.to_string()))?;
    match undo {
        UndoOption::DoNothing => admin.can_undo = false,
        UndoOption::Make => {
            admin.undo_string = std::mem::take(&mut admin.state_string);
            admin.can_undo = true;
        }
        UndoOption::Keep => {}
    }
    admin.state_string = encoded.clone();
    admin.storage_mut().set_state(encoded);
    count_levels(admin)
}

/// Empty session: nobody present, all courts open and double, no links.
pub fn reset_session_state(admin: &mut Admin) -> Result<(), InvariantError> {
    admin.x_selected = None;
    admin.waiting.clear();
    admin.paused.clear();
    admin.mix_hold.clear();
    admin.courts.iter_mut().for_each(|c| c.reset());
    admin.players.iter_mut().for_each(|p| p.reset_state());
    admin.player_links.clear();
    count_levels(admin)
}

struct RestoredCourt {
    status: CourtStatus,
    players: Vec<(PlayerId, Option<usize>, OnCourtState)>,
}

/// Validated snapshot, ready to be applied.
struct RestorePlan {
    waiting: Vec<(PlayerId, Option<usize>)>,
    paused: Vec<(PlayerId, Option<usize>)>,
    courts: Vec<RestoredCourt>,
}

struct RefResolver<'a> {
    admin: &'a Admin,
    used: HashSet<PlayerId>,
    link_counts: HashMap<usize, usize>,
}

impl RefResolver<'_> {
    fn resolve(&mut self, r: &PlayerRef) -> Result<(PlayerId, Option<usize>), InputError> {
        let (id, link) = r.parts();
        if !self.used.insert(id.to_string()) {
            return Err(InputError::DuplicateId(id.to_string()));
        }
        if self.admin.find_player(id).is_none() {
            return Err(InputError::UnknownId(id.to_string()));
        }
        if let Some(nr) = link {
            if nr > self.admin.players.len() {
                return Err(InputError::LinkOutOfRange(nr));
            }
            let count = self.link_counts.entry(nr).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Err(InputError::LinkOverused(nr));
            }
        }
        Ok((id.to_string(), link))
    }
}

fn decode_snapshot(admin: &Admin, encoded: &str) -> Result<RestorePlan, InputError> {
    let snapshot: Option<SessionSnapshot> =
        serde_json::from_str(encoded).map_err(|e| InputError::Malformed(e.to_string()))?;
    let snapshot = snapshot.ok_or(InputError::MissingSnapshot)?;
    let mut resolver = RefResolver {
        admin,
        used: HashSet::new(),
        link_counts: HashMap::new(),
    };
    let waiting = snapshot
        .w
        .iter()
        .map(|r| resolver.resolve(r))
        .collect::<Result<Vec<_>, _>>()?;
    let paused = snapshot
        .p
        .iter()
        .map(|r| resolver.resolve(r))
        .collect::<Result<Vec<_>, _>>()?;
    if snapshot.c.len() != admin.courts.len() {
        return Err(InputError::CourtCountMismatch {
            expected: admin.courts.len(),
            found: snapshot.c.len(),
        });
    }
    let mut courts = Vec::with_capacity(snapshot.c.len());
    for (idx, record) in snapshot.c.iter().enumerate() {
        let court_nr = idx + 1;
        if record.s == CourtStatus::Paused && !record.p.is_empty() {
            return Err(InputError::PausedCourtHasPlayers(court_nr));
        }
        if record.p.len() > record.s.capacity() {
            return Err(InputError::CourtOverfilled {
                court: court_nr,
                capacity: record.s.capacity(),
                found: record.p.len(),
            });
        }
        let players = record
            .p
            .iter()
            .map(|(r, state)| resolver.resolve(r).map(|(id, link)| (id, link, *state)))
            .collect::<Result<Vec<_>, _>>()?;
        courts.push(RestoredCourt {
            status: record.s,
            players,
        });
    }
    Ok(RestorePlan {
        waiting,
        paused,
        courts,
    })
}

fn apply_plan(admin: &mut Admin, plan: RestorePlan) -> Result<(), InvariantError> {
    for (id, link) in plan.waiting {
        let p = admin.player_mut(&id)?;
        p.participating = true;
        p.link = link.map(Link::Linked);
        admin.waiting.push(id);
    }
    for (id, link) in plan.paused {
        let p = admin.player_mut(&id)?;
        p.participating = true;
        p.paused = true;
        p.link = link.map(Link::Linked);
        admin.paused.push(id);
    }
    for (idx, restored) in plan.courts.into_iter().enumerate() {
        let court_nr = idx + 1;
        for (id, link, state) in &restored.players {
            let p = admin.player_mut(id)?;
            p.participating = *state != OnCourtState::Gone;
            p.paused = *state == OnCourtState::ToBePaused;
            p.on_court = court_nr;
            p.link = link.map(Link::Linked);
        }
        let court = admin.court_mut(court_nr)?;
        court.paused = restored.status == CourtStatus::Paused;
        court.is_double = restored.status.is_double();
        court.last_game = restored.status.is_last_game();
        court.players = restored.players.into_iter().map(|(id, _, _)| id).collect();
    }
    rebuild_player_links(admin)
}

/// Restore the session to an encoded snapshot (undo or crash recovery).
///
/// All or nothing: on any problem with the snapshot the session is left empty and the
/// problem is reported through `alert`. Returns whether the snapshot was restored.
pub fn restore_session_state_to(
    admin: &mut Admin,
    encoded: &str,
    alert: &mut impl Alert,
) -> Result<bool, InvariantError> {
    reset_session_state(admin)?;
    match decode_snapshot(admin, encoded) {
        Ok(plan) => {
            apply_plan(admin, plan)?;
            log::info!("Restored previous session state");
            update_session_state(admin, UndoOption::DoNothing)?;
            Ok(true)
        }
        Err(e) => {
            log::warn!("Session state not restored: {}", e);
            reset_session_state(admin)?;
            alert.display(
                "Problem",
                &format!("The previous session state could not be restored\n'{}'", e),
            );
            Ok(false)
        }
    }
}

/// Go back to the state before the last undoable operation.
pub fn undo(admin: &mut Admin, alert: &mut impl Alert) -> Result<bool, InvariantError> {
    if !admin.can_undo || admin.undo_string.is_empty() {
        return Ok(false);
    }
    let previous = admin.undo_string.clone();
    restore_session_state_to(admin, &previous, alert)
}

/// Keep the stored session state of the previous run as "old state".
pub fn preserve_old_state(admin: &mut Admin) {
    if let Some(state) = admin.storage().state().filter(|s| !s.is_empty()) {
        admin.storage_mut().set_old_state(state);
    }
}

/// Restore the session recorded as "old state".
pub fn restore_old_state(admin: &mut Admin, alert: &mut impl Alert) -> Result<bool, InvariantError> {
    let old = admin.storage().old_state().unwrap_or_default();
    restore_session_state_to(admin, &old, alert)
}

/// Startup: continue the session of the previous run, if there was one.
pub fn recover_session(admin: &mut Admin, alert: &mut impl Alert) -> Result<bool, InvariantError> {
    if admin.storage().state().filter(|s| !s.is_empty()).is_none() {
        reset_session_state(admin)?;
        return Ok(false);
    }
    preserve_old_state(admin);
    restore_old_state(admin, alert)
}
