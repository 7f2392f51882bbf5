//! Group task calculator (shared skill, averaged, plus leadership)

use compskill_types::{CalcError, CharacterId, GroupTaskReport, ParticipantBonus, SkillGroup};
use serde::Serialize;
use tracing::debug;

use crate::participant::ParticipantSummary;
use crate::registry::ParticipantRegistry;

/// Leader name reported when no enabled leader is designated
pub const NO_LEADER: &str = "None";

/// State of the group task calculator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTaskState {
    leader: Option<CharacterId>,
    task_skill: Option<String>,
}

/// Everything the presentation layer needs to draw the group task calculator
#[derive(Debug, Clone, Serialize)]
pub struct GroupTaskView {
    pub participants: Vec<ParticipantSummary>,
    pub leader: Option<CharacterId>,
    pub task_skill_options: Vec<SkillGroup>,
    pub task_skill: Option<String>,
    pub calculation: GroupTaskReport,
}

impl GroupTaskState {
    /// Start with the default leader and no task skill
    #[must_use]
    pub fn new(registry: &ParticipantRegistry) -> Self {
        Self {
            leader: registry.default_leader().cloned(),
            task_skill: None,
        }
    }

    #[must_use]
    pub fn leader(&self) -> Option<&CharacterId> {
        self.leader.as_ref()
    }

    #[must_use]
    pub fn task_skill(&self) -> Option<&str> {
        self.task_skill.as_deref()
    }

    /// Designate a leader, or clear the designation
    pub fn set_leader(
        &mut self,
        leader: Option<CharacterId>,
        registry: &ParticipantRegistry,
    ) -> Result<(), CalcError> {
        if let Some(id) = &leader {
            if !registry.contains(id) {
                return Err(CalcError::UnknownParticipant(id.clone()));
            }
        }
        self.leader = leader;
        Ok(())
    }

    pub fn set_task_skill(&mut self, skill: Option<String>) {
        self.task_skill = skill.filter(|s| !s.is_empty());
    }

    /// Fall back to the default leader when the current one is unset,
    /// unknown or disabled
    pub fn reconcile(&mut self, registry: &ParticipantRegistry) {
        let valid = self
            .leader
            .as_ref()
            .and_then(|id| registry.get(id))
            .is_some_and(|p| p.enabled);
        if !valid {
            self.leader = registry.default_leader().cloned();
            debug!("Leader reset to {:?}", self.leader);
        }
    }

    /// Compute the group task bonus for the current selections
    #[must_use]
    pub fn calculate(&self, registry: &ParticipantRegistry) -> GroupTaskReport {
        let skill = self.task_skill.as_deref();
        let per_participant: Vec<ParticipantBonus> = registry
            .enabled_participants()
            .into_iter()
            .map(|p| ParticipantBonus {
                name: p.name.clone(),
                bonus: p.bonus_for(skill),
            })
            .collect();

        let average_bonus = rounded_average(per_participant.iter().map(|p| p.bonus));

        let leader = self
            .leader
            .as_ref()
            .and_then(|id| registry.get(id))
            .filter(|p| p.enabled);
        let leadership_bonus = leader.map_or(0, |p| p.leadership_ranks);

        GroupTaskReport {
            task_skill_name: self.task_skill.clone(),
            per_participant,
            average_bonus,
            leader_name: leader.map_or_else(|| NO_LEADER.to_string(), |p| p.name.clone()),
            leadership_bonus,
            total: average_bonus.saturating_add(leadership_bonus),
        }
    }

    /// Reconcile, then describe the calculator for presentation
    pub fn view(&mut self, registry: &ParticipantRegistry) -> GroupTaskView {
        self.reconcile(registry);
        GroupTaskView {
            participants: registry
                .iter()
                .map(|p| p.summary(self.task_skill.as_deref()))
                .collect(),
            leader: self.leader.clone(),
            task_skill_options: registry.task_skill_options(),
            task_skill: self.task_skill.clone(),
            calculation: self.calculate(registry),
        }
    }
}

/// Integer mean rounded half up, 0 for no values
#[must_use]
pub fn rounded_average(values: impl IntoIterator<Item = u32>) -> u32 {
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return 0;
    }
    let rounded = (2 * sum + count) / (2 * count);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use compskill_skills::SheetCharacter;
    use proptest::prelude::*;
    use serde_json::json;

    fn sheet(id: &str, name: &str, climbing: u32, leadership: u32) -> SheetCharacter {
        SheetCharacter::new(
            id,
            name,
            json!({
                "Athletic": [
                    { "system": { "name": "Climbing", "category": "Athletic", "_totalRanks": 2, "_bonus": climbing } }
                ],
                "Influence": [
                    { "system": { "name": "Leadership", "category": "Influence", "_totalRanks": leadership, "_bonus": 5 } }
                ]
            }),
        )
    }

    async fn registry(members: &[SheetCharacter]) -> ParticipantRegistry {
        let mut registry = ParticipantRegistry::default();
        for member in members {
            registry.add_or_update(member).await;
        }
        registry
    }

    #[test]
    fn test_rounded_average() {
        assert_eq!(rounded_average([10, 11]), 11);
        assert_eq!(rounded_average([10, 10, 11]), 10);
        assert_eq!(rounded_average([1, 2, 2, 2]), 2);
        assert_eq!(rounded_average(Vec::<u32>::new()), 0);
        assert_eq!(rounded_average([u32::MAX, u32::MAX]), u32::MAX);
    }

    #[tokio::test]
    async fn test_average_plus_leadership() {
        let registry = registry(&[sheet("a", "Aldric", 10, 0), sheet("b", "Brenna", 11, 3)]).await;
        let mut state = GroupTaskState::new(&registry);
        assert_eq!(state.leader(), Some(&CharacterId::new("b")));
        state.set_task_skill(Some("Climbing".into()));

        let report = state.calculate(&registry);
        assert_eq!(report.task_skill_name.as_deref(), Some("Climbing"));
        assert_eq!(report.average_bonus, 11);
        assert_eq!(report.leader_name, "Brenna");
        assert_eq!(report.leadership_bonus, 3);
        assert_eq!(report.total, 14);
    }

    #[tokio::test]
    async fn test_missing_skill_counts_as_zero() {
        let registry = registry(&[
            sheet("a", "Aldric", 10, 0),
            SheetCharacter::new("b", "Brenna", json!([])),
        ])
        .await;
        let mut state = GroupTaskState::new(&registry);
        state.set_task_skill(Some("Climbing".into()));

        let report = state.calculate(&registry);
        let bonuses: Vec<_> = report.per_participant.iter().map(|p| p.bonus).collect();
        assert_eq!(bonuses, vec![10, 0]);
        assert_eq!(report.average_bonus, 5);
    }

    #[tokio::test]
    async fn test_disabled_leader_contributes_nothing() {
        let sheets = [sheet("a", "Aldric", 10, 0), sheet("b", "Brenna", 20, 4)];
        let mut registry = registry(&sheets).await;
        let mut state = GroupTaskState::new(&registry);
        state.set_task_skill(Some("Climbing".into()));

        registry.set_enabled(&CharacterId::new("b"), false).unwrap();
        let report = state.calculate(&registry);
        assert_eq!(report.per_participant.len(), 1);
        assert_eq!(report.leader_name, NO_LEADER);
        assert_eq!(report.leadership_bonus, 0);
        assert_eq!(report.total, 10);

        state.reconcile(&registry);
        assert_eq!(state.leader(), Some(&CharacterId::new("a")));
    }

    #[tokio::test]
    async fn test_no_enabled_participants() {
        let mut registry = registry(&[sheet("a", "Aldric", 10, 2)]).await;
        registry.set_enabled(&CharacterId::new("a"), false).unwrap();

        let mut state = GroupTaskState::new(&registry);
        assert_eq!(state.leader(), None);
        let view = state.view(&registry);
        assert_eq!(view.calculation.average_bonus, 0);
        assert_eq!(view.calculation.total, 0);
        assert_eq!(view.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_set_leader() {
        let registry = registry(&[sheet("a", "Aldric", 10, 0), sheet("b", "Brenna", 11, 3)]).await;
        let mut state = GroupTaskState::new(&registry);

        state.set_leader(Some(CharacterId::new("a")), &registry).unwrap();
        assert_eq!(state.calculate(&registry).leader_name, "Aldric");

        let err = state
            .set_leader(Some(CharacterId::new("zz")), &registry)
            .unwrap_err();
        assert_eq!(err, CalcError::UnknownParticipant(CharacterId::new("zz")));
        assert_eq!(state.leader(), Some(&CharacterId::new("a")));

        state.set_leader(None, &registry).unwrap();
        assert_eq!(state.calculate(&registry).leader_name, NO_LEADER);
        state.reconcile(&registry);
        assert_eq!(state.leader(), Some(&CharacterId::new("b")));
    }

    #[tokio::test]
    async fn test_view_options() {
        let registry = registry(&[sheet("a", "Aldric", 10, 1)]).await;
        let mut state = GroupTaskState::new(&registry);
        state.set_task_skill(Some("Climbing".into()));
        let view = state.view(&registry);

        let categories: Vec<_> = view
            .task_skill_options
            .iter()
            .map(|g| g.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Athletic", "Influence"]);
        assert_eq!(view.participants[0].bonus_for_selected_skill, 10);
        assert_eq!(view.calculation.total, 11);
    }

    proptest! {
        #[test]
        fn prop_average_within_bounds(values in prop::collection::vec(0u32..1000, 1..20)) {
            let avg = rounded_average(values.iter().copied());
            let min = values.iter().copied().min().unwrap_or(0);
            let max = values.iter().copied().max().unwrap_or(0);
            prop_assert!(avg >= min && avg <= max);
        }
    }
}
