use serde::{Deserialize, Serialize};

/// A normalized skill of one character
///
/// `name` already carries the specialization suffix, e.g. `"Lore (Heraldry)"`.
/// Records are immutable once projected from the raw sheet data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub category: String,
    pub ranks: u32,
    pub bonus: u32,
    /// False when the rule system marks the skill as non-rollable
    pub eligible: bool,
}

impl SkillRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        ranks: u32,
        bonus: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ranks,
            bonus,
            eligible: true,
        }
    }

    /// Mark the record as non-rollable
    pub fn ineligible(mut self) -> Self {
        self.eligible = false;
        self
    }
}

/// One category bucket of a grouped skill listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub records: Vec<SkillRecord>,
}

/// Permission level a user holds on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OwnershipLevel {
    None,
    Limited,
    Observer,
    Owner,
}

impl OwnershipLevel {
    /// Whether this level grants full control of the character
    #[must_use]
    pub fn is_owner(self) -> bool {
        self >= Self::Owner
    }
}

impl From<u8> for OwnershipLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => Self::None,
            1 => Self::Limited,
            2 => Self::Observer,
            _ => Self::Owner,
        }
    }
}

impl From<OwnershipLevel> for u8 {
    fn from(level: OwnershipLevel) -> Self {
        match level {
            OwnershipLevel::None => 0,
            OwnershipLevel::Limited => 1,
            OwnershipLevel::Observer => 2,
            OwnershipLevel::Owner => 3,
        }
    }
}
