//! Plain-text summaries of calculation results
//!
//! Used as the content of published messages. Each summary starts with a
//! header line, followed by one line per contribution and a total line.

use compskill_types::{BoostReport, GroupTaskReport};

/// Render a boost result
///
/// ```text
/// Complementary Boost: Aldric - Climbing
/// Primary bonus: +50
///   Aldric's Rope Mastery (8 ranks): +8
///   Brenna's Climbing (4 ranks): +2
/// Complementary bonus: +10
/// Total: +60
/// ```
#[must_use]
pub fn boost_summary(actor_name: &str, skill_name: &str, report: &BoostReport) -> String {
    let mut lines = vec![
        format!("Complementary Boost: {actor_name} - {skill_name}"),
        format!("Primary bonus: +{}", report.primary_bonus),
    ];
    lines.extend(report.breakdown.iter().map(|entry| {
        format!(
            "  {} ({} ranks): +{}",
            entry.source_label, entry.ranks, entry.bonus
        )
    }));
    lines.push(format!("Complementary bonus: +{}", report.complement_bonus));
    lines.push(format!("Total: +{}", report.total));
    lines.join("\n")
}

/// Render a group task result
#[must_use]
pub fn group_task_summary(report: &GroupTaskReport) -> String {
    let skill = report.task_skill_name.as_deref().unwrap_or("-");
    let mut lines = vec![format!("Group Task: {skill}")];
    lines.extend(
        report
            .per_participant
            .iter()
            .map(|p| format!("  {}: +{}", p.name, p.bonus)),
    );
    lines.push(format!("Average bonus: +{}", report.average_bonus));
    lines.push(format!(
        "Leader: {} (Leadership +{})",
        report.leader_name, report.leadership_bonus
    ));
    lines.push(format!("Total: +{}", report.total));
    lines.join("\n")
}
