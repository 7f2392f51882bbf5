//! Projection of raw skill leaves into `SkillRecord`s

use compskill_types::SkillRecord;
use serde_json::Value;
use tracing::debug;

use crate::flatten::RawSkillEntry;

/// Name used when a leaf has no name
pub const UNKNOWN_SKILL: &str = "Unknown Skill";
/// Category used when a leaf has no category
pub const UNKNOWN_CATEGORY: &str = "Unknown";
/// Base name of the skill whose ranks become the group-task leadership bonus
pub const LEADERSHIP: &str = "Leadership";

const NAME: &str = "name";
const SPECIALIZATION: &str = "specialization";
const CATEGORY: &str = "category";
const TOTAL_RANKS: &str = "_totalRanks";
const BONUS: &str = "_bonus";
const DISABLE_ROLL: &str = "_disableSkillRoll";

/// Project a raw leaf into a `SkillRecord`, defaulting missing fields
pub fn project(entry: &RawSkillEntry) -> SkillRecord {
    let base = entry
        .field(NAME)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_SKILL);

    let name = match entry.field(SPECIALIZATION).and_then(Value::as_str) {
        Some(spec) if !spec.trim().is_empty() => format!("{base} ({spec})"),
        _ => base.to_string(),
    };

    let category = entry
        .field(CATEGORY)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_CATEGORY)
        .to_string();

    SkillRecord {
        ranks: read_count(entry.field(TOTAL_RANKS), &name, TOTAL_RANKS),
        bonus: read_count(entry.field(BONUS), &name, BONUS),
        eligible: entry.field(DISABLE_ROLL).and_then(Value::as_bool) != Some(true),
        name,
        category,
    }
}

/// Total ranks of the first skill whose base name is exactly `Leadership`
pub fn leadership_ranks(entries: &[RawSkillEntry]) -> u32 {
    entries
        .iter()
        .find(|e| e.field(NAME).and_then(Value::as_str) == Some(LEADERSHIP))
        .map_or(0, |e| read_count(e.field(TOTAL_RANKS), LEADERSHIP, TOTAL_RANKS))
}

/// Read a non-negative integer field
///
/// Accepts integers, floats (truncated) and numeric strings. Anything else
/// reads as 0; negative values clamp to 0.
fn read_count(value: Option<&Value>, skill: &str, field: &str) -> u32 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64),
        _ => None,
    };

    match raw {
        Some(v) if v < 0 => {
            debug!("Clamping negative {} ({}) on '{}' to 0", field, v, skill);
            0
        }
        Some(v) => u32::try_from(v).unwrap_or(u32::MAX),
        None => 0,
    }
}
