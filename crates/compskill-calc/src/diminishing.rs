//! Diminishing-returns reduction of complementary contributions
//!
//! Contributions are ranked by ranks, descending. The contribution at
//! position `i` adds `floor(ranks / 2^i)`.

use compskill_skills::locale_cmp;
use compskill_types::{BreakdownEntry, Contribution};

use crate::config::TieBreak;

/// Bonus of a contribution at sorted position `index`
#[must_use]
pub fn diminished(ranks: u32, index: usize) -> u32 {
    u32::try_from(index)
        .ok()
        .and_then(|i| ranks.checked_shr(i))
        .unwrap_or(0)
}

/// Reduce contributions to a complement bonus and its breakdown
///
/// Zero-rank contributions are dropped before ranking.
#[must_use]
pub fn reduce(contributions: Vec<Contribution>, tie_break: TieBreak) -> (u32, Vec<BreakdownEntry>) {
    let mut ranked: Vec<Contribution> = contributions.into_iter().filter(|c| c.ranks > 0).collect();

    match tie_break {
        TieBreak::SourceLabel => ranked.sort_by(|a, b| {
            b.ranks
                .cmp(&a.ranks)
                .then_with(|| locale_cmp(&a.source_label, &b.source_label))
        }),
        TieBreak::Insertion => ranked.sort_by(|a, b| b.ranks.cmp(&a.ranks)),
    }

    let breakdown: Vec<BreakdownEntry> = ranked
        .into_iter()
        .enumerate()
        .map(|(i, c)| BreakdownEntry {
            bonus: diminished(c.ranks, i),
            source_label: c.source_label,
            ranks: c.ranks,
        })
        .collect();

    let total = breakdown.iter().fold(0u32, |acc, e| acc.saturating_add(e.bonus));
    (total, breakdown)
}
