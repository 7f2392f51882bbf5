//! Canonical ordering and grouping of skill records
//!
//! Every skill dropdown lists records by category, then name. Comparison
//! follows the usual locale collation levels: base letters first, then
//! accents, then case (lowercase first). A final code-point comparison makes
//! the order total, so two strings only compare equal when identical.

use compskill_types::{SkillGroup, SkillRecord};
use std::cmp::Ordering;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Label of the bucket for records with an empty category
pub const FALLBACK_GROUP: &str = "Other";

/// Locale-style string comparison
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let base = |s: &str| {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect::<Vec<_>>()
    };
    let accents = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();

    base(a)
        .cmp(&base(b))
        .then_with(|| accents(a).cmp(&accents(b)))
        .then_with(|| case(a).cmp(&case(b)))
        .then_with(|| a.cmp(b))
}

/// Sort key of a record: (category, name)
pub fn sort_key(record: &SkillRecord) -> (&str, &str) {
    (&record.category, &record.name)
}

/// Compare two records by category, then name
pub fn compare_records(a: &SkillRecord, b: &SkillRecord) -> Ordering {
    let (a_cat, a_name) = sort_key(a);
    let (b_cat, b_name) = sort_key(b);
    locale_cmp(a_cat, b_cat).then_with(|| locale_cmp(a_name, b_name))
}

/// Sort records into canonical order (stable)
pub fn sort_records(records: &mut [SkillRecord]) {
    records.sort_by(compare_records);
}

/// Partition records into category buckets, buckets ordered by label
///
/// Records keep their relative order inside a bucket, so a sorted input
/// yields sorted buckets.
pub fn group_by_category(records: &[SkillRecord]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let label = if record.category.is_empty() {
            FALLBACK_GROUP
        } else {
            record.category.as_str()
        };

        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(SkillGroup {
                category: label.to_string(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record.clone());
    }

    groups.sort_by(|a, b| locale_cmp(&a.category, &b.category));
    groups
}
