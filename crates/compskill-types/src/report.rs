use serde::{Deserialize, Serialize};

/// A complementary source gathered for one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// `"<participant name>'s <skill name>"`
    pub source_label: String,
    pub ranks: u32,
}

impl Contribution {
    pub fn new(participant: &str, skill: &str, ranks: u32) -> Self {
        Self {
            source_label: format!("{participant}'s {skill}"),
            ranks,
        }
    }
}

/// One line of the diminishing-returns audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub source_label: String,
    pub ranks: u32,
    pub bonus: u32,
}

/// Result of a complementary boost calculation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostReport {
    pub primary_bonus: u32,
    pub complement_bonus: u32,
    pub total: u32,
    pub breakdown: Vec<BreakdownEntry>,
}

/// A participant's bonus for the selected skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantBonus {
    pub name: String,
    pub bonus: u32,
}

/// Result of a group task calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTaskReport {
    pub task_skill_name: Option<String>,
    pub per_participant: Vec<ParticipantBonus>,
    /// Rounded half-up
    pub average_bonus: u32,
    /// `"None"` when no enabled leader is designated
    pub leader_name: String,
    pub leadership_bonus: u32,
    pub total: u32,
}
