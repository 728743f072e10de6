//! Import of a club player list and CSV export of the stored players.

use crate::logic::links::{clear_selected_player, rebuild_player_links};
use crate::logic::registry::players_to_storage;
use crate::logic::session_state::update_session_state;
use crate::models::{
    level_from_f64, Admin, Gender, InputError, InvariantError, Link, Player, PlayerId,
    UndoOption,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// One decoded row of an import file: column label to cell value.
pub type ImportRow = Map<String, Value>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Name,
    PlayerId,
    Gender,
    Level,
}

/// Column labels understood by the import, English and Dutch variants.
const LABEL_MAP: &[(&str, Field)] = &[
    ("name", Field::Name),
    ("Name", Field::Name),
    ("Naam", Field::Name),
    ("playerId", Field::PlayerId),
    ("PlayerId", Field::PlayerId),
    ("speelNummer", Field::PlayerId),
    ("Spelernummer", Field::PlayerId),
    ("Speler nummer", Field::PlayerId),
    ("gender", Field::Gender),
    ("Gender", Field::Gender),
    ("level", Field::Level),
    ("Level", Field::Level),
];

fn field_for_label(label: &str) -> Option<Field> {
    LABEL_MAP
        .iter()
        .find(|(l, _)| *l == label)
        .map(|&(_, field)| field)
}

/// Text of a cell; numbers are formatted without a fractional part when integral.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Valid gender of a cell, if any.
pub(crate) fn gender_from_value(value: &Value) -> Option<Gender> {
    value.as_str().and_then(|s| Gender::parse(s.trim()))
}

/// Valid level of a cell, if any. Accepts numbers and numeric text.
pub(crate) fn level_from_value(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    level_from_f64(number)
}

/// Map imported rows to players. Unknown columns are skipped (logged once per label),
/// rows without an id are counted, duplicate ids are reported, rows with an empty name
/// are dropped. Invalid genders become `g`, invalid levels 1.
pub fn map_import_fields(rows: &[ImportRow]) -> (Vec<Player>, Vec<String>) {
    let mut players = Vec::new();
    let mut warnings = Vec::new();
    let mut seen: HashMap<PlayerId, String> = HashMap::new();
    let mut ignored: HashSet<String> = HashSet::new();
    let mut no_id_count = 0;

    for (idx, row) in rows.iter().enumerate() {
        let mut name = None;
        let mut player_id = None;
        let mut gender = None;
        let mut level = None;
        for (label, value) in row {
            let label = label.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
            match field_for_label(label) {
                Some(Field::Name) => name = value_to_string(value),
                Some(Field::PlayerId) => player_id = value_to_string(value),
                Some(Field::Gender) => gender = Some(value),
                Some(Field::Level) => level = Some(value),
                None => {
                    if ignored.insert(label.to_string()) {
                        log::info!("Ignoring field '{}'", label);
                    }
                }
            }
        }
        let Some(player_id) = player_id else {
            no_id_count += 1;
            continue;
        };
        let name = name.unwrap_or_default();
        if let Some(existing) = seen.get(&player_id) {
            warnings.push(format!(
                "Row {}: DUPLICATE ({}) {} = '{}'",
                idx + 1,
                name,
                player_id,
                existing
            ));
            continue;
        }
        if name.is_empty() {
            log::debug!("Row {}: player {} has no name, skipped", idx + 1, player_id);
            continue;
        }
        let gender = gender.and_then(gender_from_value).unwrap_or_default();
        let level = level.and_then(level_from_value).unwrap_or(1);
        seen.insert(player_id.clone(), name.clone());
        players.push(Player::new(player_id, name, gender, level));
    }
    if no_id_count > 0 {
        warnings.push(format!("{} rows contain no player ID", no_id_count));
    }
    (players, warnings)
}

/// Replace the registry with imported rows.
///
/// Players still present keep their session state; players that disappeared are
/// removed from the waiting/paused lists and the courts. Warnings go to `reporter`.
pub fn handle_import_data(
    admin: &mut Admin,
    rows: &[ImportRow],
    reporter: impl FnOnce(&[String]),
) -> Result<(), InvariantError> {
    clear_selected_player(admin);
    admin.mix_hold.clear();
    let (imported, warnings) = map_import_fields(rows);
    let old_players = std::mem::replace(&mut admin.players, imported);
    for old in old_players.iter().filter(|p| p.participating || p.on_court != 0) {
        if let Some(p) = admin.players.iter_mut().find(|p| p.player_id == old.player_id) {
            p.participating = old.participating;
            p.paused = old.paused;
            p.on_court = old.on_court;
            p.link = old.link.filter(|l| matches!(l, Link::Linked(_)));
        }
    }

    let known: HashSet<PlayerId> = admin.players.iter().map(|p| p.player_id.clone()).collect();
    admin.waiting.retain(|id| known.contains(id));
    admin.paused.retain(|id| known.contains(id));
    for court in &mut admin.courts {
        court.players.retain(|id| known.contains(id));
    }

    players_to_storage(admin)?;
    rebuild_player_links(admin)?;
    log::info!(
        "Imported {} players, {} warnings",
        admin.players.len(),
        warnings.len()
    );
    if !warnings.is_empty() {
        reporter(&warnings);
    }
    update_session_state(admin, UndoOption::DoNothing)
}

/// Import collaborator for CSV files: decode into rows keyed by the header labels.
pub fn decode_csv_rows(bytes: &[u8]) -> Result<Vec<ImportRow>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| InputError::ImportDecode(e.to_string()))?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InputError::ImportDecode(e.to_string()))?;
        let row: ImportRow = headers
            .iter()
            .zip(record.iter())
            .map(|(label, cell)| (label.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// CSV export of a stored players list: `"Name","PlayerId","Gender","Level"`, every field
/// quoted. Absent values default to empty name, id 0, empty gender and level 1.
pub fn players_json_to_csv(json: &str) -> Result<String, InputError> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_str(json).map_err(|e| InputError::Malformed(e.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    let io_error = |e: csv::Error| InputError::Malformed(e.to_string());
    writer
        .write_record(["Name", "PlayerId", "Gender", "Level"])
        .map_err(io_error)?;
    for record in &records {
        let text = |key: &str, default: &str| {
            record
                .get(key)
                .and_then(value_to_string)
                .unwrap_or_else(|| default.to_string())
        };
        writer
            .write_record([
                text("name", ""),
                text("playerId", "0"),
                text("gender", ""),
                text("level", "1"),
            ])
            .map_err(io_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| InputError::Malformed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| InputError::Malformed(e.to_string()))
}
