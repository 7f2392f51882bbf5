//! Participants of a calculation

use compskill_skills::group_by_category;
use compskill_types::{
    CharacterId, ExtractWarning, OwnershipLevel, SkillGroup, SkillRecord, UserId,
};
use serde::Serialize;

/// A character included in a calculation
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: CharacterId,
    pub name: String,
    pub image_ref: Option<String>,
    /// Disabled participants stay registered but feed no calculation
    pub enabled: bool,
    pub leadership_ranks: u32,
    /// Every extracted skill, canonical order
    pub skills: Vec<SkillRecord>,
    /// Permission snapshot taken when the character was hydrated
    pub ownership: Vec<(UserId, OwnershipLevel)>,
    /// Diagnostics from extraction
    pub warnings: Vec<ExtractWarning>,
}

impl Participant {
    /// Skills grouped by category for presentation
    #[must_use]
    pub fn skills_by_category(&self) -> Vec<SkillGroup> {
        group_by_category(&self.skills)
    }

    /// Find a skill by display name
    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&SkillRecord> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Bonus for the named skill, 0 when absent or nothing is selected
    #[must_use]
    pub fn bonus_for(&self, name: Option<&str>) -> u32 {
        name.and_then(|n| self.skill(n)).map_or(0, |s| s.bonus)
    }

    /// Skills that may be rolled (primary skill options)
    pub fn rollable_skills(&self) -> impl Iterator<Item = &SkillRecord> {
        self.skills.iter().filter(|s| s.eligible)
    }

    /// Skills that may be offered as complementary sources
    pub fn complement_skills(&self, allow_ineligible: bool) -> impl Iterator<Item = &SkillRecord> {
        self.skills
            .iter()
            .filter(move |s| s.ranks > 0 && (allow_ineligible || s.eligible))
    }

    /// Find a complementary option by display name
    #[must_use]
    pub fn complement_skill(&self, name: &str, allow_ineligible: bool) -> Option<&SkillRecord> {
        self.complement_skills(allow_ineligible)
            .find(|s| s.name == name)
    }

    /// Whether `user` holds owner-level permission on this character
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.ownership
            .iter()
            .any(|(u, level)| u == user && level.is_owner())
    }

    /// Presentation row for this participant
    #[must_use]
    pub fn summary(&self, selected_skill: Option<&str>) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image_ref: self.image_ref.clone(),
            enabled: self.enabled,
            leadership_ranks: self.leadership_ranks,
            bonus_for_selected_skill: self.bonus_for(selected_skill),
        }
    }
}

/// A participant as listed in a calculator view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub id: CharacterId,
    pub name: String,
    pub image_ref: Option<String>,
    pub enabled: bool,
    pub leadership_ranks: u32,
    pub bonus_for_selected_skill: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn participant() -> Participant {
        Participant {
            id: CharacterId::new("p1"),
            name: "Aldric".into(),
            image_ref: None,
            enabled: true,
            leadership_ranks: 0,
            skills: vec![
                SkillRecord::new("Climbing", "Athletic", 5, 35),
                SkillRecord::new("Swimming", "Athletic", 0, 5),
                SkillRecord::new("Spell Mastery", "Arcane", 4, 20).ineligible(),
            ],
            ownership: vec![
                (UserId::new("u1"), OwnershipLevel::Owner),
                (UserId::new("u2"), OwnershipLevel::Observer),
            ],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_bonus_for() {
        let p = participant();
        assert_eq!(p.bonus_for(Some("Climbing")), 35);
        assert_eq!(p.bonus_for(Some("Flying")), 0);
        assert_eq!(p.bonus_for(None), 0);
        // Ineligible skills still report their bonus
        assert_eq!(p.bonus_for(Some("Spell Mastery")), 20);
    }

    #[test]
    fn test_complement_options() {
        let p = participant();
        let names: Vec<_> = p.complement_skills(false).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Climbing"]);

        let names: Vec<_> = p.complement_skills(true).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Climbing", "Spell Mastery"]);
    }

    #[test]
    fn test_rollable_skills() {
        let p = participant();
        assert_eq!(p.rollable_skills().count(), 2);
    }

    #[test]
    fn test_ownership() {
        let p = participant();
        assert!(p.is_owned_by(&UserId::new("u1")));
        assert!(!p.is_owned_by(&UserId::new("u2")));
        assert!(!p.is_owned_by(&UserId::new("u3")));
    }
}
