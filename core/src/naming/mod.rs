//! Letter names for circles.
//!
//! Circle id `n` is displayed as the `n`th uppercase Latin letter, starting
//! with id 0 as `A`. Only ids `0..NAMEABLE_IDS` have a letter; anything at or
//! past the boundary is displayed as [`NO_MORE_LETTERS`] and never maps back
//! to an id.

use crate::diagram::CircleId;
use crate::error::{EngineError, EngineResult};

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of ids that have a single-letter name.
pub const NAMEABLE_IDS: u32 = 26;

/// Shown in place of a name for ids outside the nameable range.
pub const NO_MORE_LETTERS: &str = "No more letters available";

pub fn is_nameable(id: CircleId) -> bool {
    id.0 < NAMEABLE_IDS
}

pub fn try_id_to_name(id: CircleId) -> Option<char> {
    ALPHABET.get(id.index()).map(|b| *b as char)
}

/// Letter for `id`, or [`NO_MORE_LETTERS`] once the alphabet runs out.
pub fn id_to_name(id: CircleId) -> String {
    match try_id_to_name(id) {
        Some(letter) => letter.to_string(),
        None => NO_MORE_LETTERS.to_string(),
    }
}

/// Case-insensitive reverse lookup. `None` unless `name` is exactly one known letter.
pub fn name_to_id(name: &str) -> Option<CircleId> {
    let mut chars = name.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let upper = letter.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|b| *b as char == upper)
        .map(|i| CircleId(i as u32))
}

pub fn id_list_to_name_list(lists: &[Vec<CircleId>]) -> Vec<Vec<String>> {
    lists
        .iter()
        .map(|ids| ids.iter().map(|id| id_to_name(*id)).collect())
        .collect()
}

pub fn name_list_to_id_list<S: AsRef<str>>(lists: &[Vec<S>]) -> Vec<Vec<Option<CircleId>>> {
    lists
        .iter()
        .map(|names| names.iter().map(|name| name_to_id(name.as_ref())).collect())
        .collect()
}

/// Compact label for a run of ids, e.g. `[0, 2]` -> `"AC"`.
///
/// Once any id is past the alphabet the label falls back to a comma-separated
/// list with those ids written as `#n`, e.g. `[0, 26]` -> `"A, #26"`. Such
/// labels are for display only and do not parse.
pub fn format_label(ids: &[CircleId]) -> String {
    if ids.iter().all(|id| is_nameable(*id)) {
        return ids.iter().map(|id| id_to_name(*id)).collect();
    }
    ids.iter()
        .map(|id| match try_id_to_name(*id) {
            Some(letter) => letter.to_string(),
            None => format!("#{}", id),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a compact label such as `"AB"` or `"a, c"` into ids, in label order.
/// Whitespace and commas are ignored; any other non-letter fails.
pub fn parse_label(label: &str) -> EngineResult<Vec<CircleId>> {
    if label.contains(NO_MORE_LETTERS) {
        return Err(EngineError::UnknownLabel(label.to_string()));
    }
    let mut ids = Vec::new();
    for ch in label.chars().filter(|c| !c.is_whitespace() && *c != ',') {
        let mut buf = [0u8; 4];
        match name_to_id(ch.encode_utf8(&mut buf)) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => return Err(EngineError::UnknownLabel(label.to_string())),
        }
    }
    if ids.is_empty() {
        return Err(EngineError::UnknownLabel(label.to_string()));
    }
    Ok(ids)
}
