//! Complementary boost calculator (single primary actor)

use compskill_skills::group_by_category;
use compskill_types::{BoostReport, CalcError, CharacterId, Contribution, SkillGroup, SkillRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::diminishing::reduce;
use crate::participant::{Participant, ParticipantSummary};
use crate::registry::ParticipantRegistry;

/// A complementary skill the primary actor adds to their own check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplementRow {
    pub skill: Option<String>,
    pub ranks: u32,
}

/// State of the boost calculator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoostState {
    primary_actor: Option<CharacterId>,
    primary_skill: Option<String>,
    primary_complements: Vec<ComplementRow>,
    other_complements: HashMap<CharacterId, String>,
}

/// Another enabled participant and their complementary choice
#[derive(Debug, Clone, Serialize)]
pub struct OtherParticipantView {
    pub id: CharacterId,
    pub name: String,
    pub options: Vec<SkillGroup>,
    pub selected: Option<String>,
}

/// Everything the presentation layer needs to draw the boost calculator
#[derive(Debug, Clone, Serialize)]
pub struct BoostView {
    pub participants: Vec<ParticipantSummary>,
    pub primary_actor: Option<CharacterId>,
    pub primary_skill_options: Vec<SkillGroup>,
    pub primary_skill: Option<String>,
    pub primary_complement_options: Vec<SkillGroup>,
    pub primary_complements: Vec<ComplementRow>,
    pub others: Vec<OtherParticipantView>,
    pub calculation: BoostReport,
}

impl BoostState {
    /// Start with the first registered participant as primary actor
    #[must_use]
    pub fn new(registry: &ParticipantRegistry) -> Self {
        Self {
            primary_actor: registry.iter().next().map(|p| p.id.clone()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn primary_actor(&self) -> Option<&CharacterId> {
        self.primary_actor.as_ref()
    }

    #[must_use]
    pub fn primary_skill(&self) -> Option<&str> {
        self.primary_skill.as_deref()
    }

    #[must_use]
    pub fn primary_complements(&self) -> &[ComplementRow] {
        &self.primary_complements
    }

    #[must_use]
    pub fn other_complement(&self, id: &CharacterId) -> Option<&str> {
        self.other_complements.get(id).map(String::as_str)
    }

    /// Change the primary actor, clearing every selection
    pub fn select_primary_actor(
        &mut self,
        id: &CharacterId,
        registry: &ParticipantRegistry,
    ) -> Result<(), CalcError> {
        if !registry.contains(id) {
            return Err(CalcError::UnknownParticipant(id.clone()));
        }
        self.primary_actor = Some(id.clone());
        self.primary_skill = None;
        self.primary_complements.clear();
        self.other_complements.clear();
        Ok(())
    }

    pub fn select_primary_skill(&mut self, skill: Option<String>) {
        self.primary_skill = skill.filter(|s| !s.is_empty());
    }

    /// Append an empty complementary row for the primary actor
    pub fn add_complement_row(&mut self) {
        self.primary_complements.push(ComplementRow::default());
    }

    /// Choose the skill of a complementary row
    ///
    /// Ranks come from the primary actor's complementary options, 0 when the
    /// skill is not among them.
    pub fn set_complement_row(
        &mut self,
        index: usize,
        skill: Option<String>,
        registry: &ParticipantRegistry,
    ) {
        let allow = registry.config().allow_ineligible_complements;
        let ranks = skill
            .as_deref()
            .zip(self.primary(registry))
            .and_then(|(name, p)| p.complement_skill(name, allow))
            .map_or(0, |s| s.ranks);

        if let Some(row) = self.primary_complements.get_mut(index) {
            *row = ComplementRow { skill, ranks };
        } else {
            debug!("Ignoring update of missing complement row {}", index);
        }
    }

    pub fn remove_complement_row(&mut self, index: usize) {
        if index < self.primary_complements.len() {
            self.primary_complements.remove(index);
        }
    }

    /// Choose (or clear) another participant's complementary skill
    pub fn set_other_complement(&mut self, id: &CharacterId, skill: Option<String>) {
        match skill.filter(|s| !s.is_empty()) {
            Some(skill) => {
                self.other_complements.insert(id.clone(), skill);
            }
            None => {
                self.other_complements.remove(id);
            }
        }
    }

    /// Replace a missing or disabled primary actor by the first enabled one
    pub fn reconcile(&mut self, registry: &ParticipantRegistry) {
        if self.primary(registry).is_some() {
            return;
        }
        let next = registry.enabled_participants().first().map(|p| p.id.clone());
        debug!("Primary actor reset to {:?}", next);
        self.primary_actor = next;
        self.primary_skill = None;
        self.primary_complements.clear();
    }

    /// Gather complementary contributions, zero ranks already dropped
    #[must_use]
    pub fn contributions(&self, registry: &ParticipantRegistry) -> Vec<Contribution> {
        let Some(primary) = self.primary(registry) else {
            return Vec::new();
        };
        let allow = registry.config().allow_ineligible_complements;

        let own = self.primary_complements.iter().filter_map(|row| {
            let skill = row.skill.as_deref()?;
            (row.ranks > 0).then(|| Contribution::new(&primary.name, skill, row.ranks))
        });

        let others = registry
            .enabled_participants()
            .into_iter()
            .filter(|p| p.id != primary.id)
            .filter_map(|p| {
                let name = self.other_complements.get(&p.id)?;
                let skill = p.complement_skill(name, allow)?;
                (skill.ranks > 0).then(|| Contribution::new(&p.name, name, skill.ranks))
            });

        own.chain(others).collect()
    }

    /// Compute the boost for the current selections
    #[must_use]
    pub fn calculate(&self, registry: &ParticipantRegistry) -> BoostReport {
        let Some(primary) = self.primary(registry) else {
            return BoostReport::default();
        };

        let primary_bonus = self
            .primary_skill
            .as_deref()
            .and_then(|name| primary.rollable_skills().find(|s| s.name == name))
            .map_or(0, |s| s.bonus);

        let (complement_bonus, breakdown) =
            reduce(self.contributions(registry), registry.config().tie_break);

        BoostReport {
            primary_bonus,
            complement_bonus,
            total: primary_bonus.saturating_add(complement_bonus),
            breakdown,
        }
    }

    /// Reconcile, then describe the calculator for presentation
    pub fn view(&mut self, registry: &ParticipantRegistry) -> BoostView {
        self.reconcile(registry);
        let allow = registry.config().allow_ineligible_complements;
        let primary = self.primary(registry);

        let primary_skill_options = primary.map_or_else(Vec::new, |p| {
            group_by_category(&p.rollable_skills().cloned().collect::<Vec<_>>())
        });
        let primary_complement_options =
            primary.map_or_else(Vec::new, |p| complement_groups(p, allow));

        let others = registry
            .enabled_participants()
            .into_iter()
            .filter(|p| Some(&p.id) != self.primary_actor.as_ref())
            .map(|p| OtherParticipantView {
                id: p.id.clone(),
                name: p.name.clone(),
                options: complement_groups(p, allow),
                selected: self.other_complements.get(&p.id).cloned(),
            })
            .collect();

        BoostView {
            participants: registry
                .iter()
                .map(|p| p.summary(self.primary_skill.as_deref()))
                .collect(),
            primary_actor: self.primary_actor.clone(),
            primary_skill_options,
            primary_skill: self.primary_skill.clone(),
            primary_complement_options,
            primary_complements: self.primary_complements.clone(),
            others,
            calculation: self.calculate(registry),
        }
    }

    fn primary<'r>(&self, registry: &'r ParticipantRegistry) -> Option<&'r Participant> {
        self.primary_actor
            .as_ref()
            .and_then(|id| registry.get(id))
            .filter(|p| p.enabled)
    }
}

fn complement_groups(participant: &Participant, allow_ineligible: bool) -> Vec<SkillGroup> {
    let records: Vec<SkillRecord> = participant
        .complement_skills(allow_ineligible)
        .cloned()
        .collect();
    group_by_category(&records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CalcConfig;
    use compskill_skills::{SheetCharacter, SkillExtractor};
    use serde_json::json;

    async fn registry(config: CalcConfig) -> ParticipantRegistry {
        let mut registry = ParticipantRegistry::new(SkillExtractor::new(), config);
        registry
            .add_or_update(&SheetCharacter::new(
                "a",
                "Aldric",
                json!([
                    { "system": { "name": "Climbing", "category": "Athletic", "_totalRanks": 10, "_bonus": 50 } },
                    { "system": { "name": "Rope Mastery", "category": "Athletic", "_totalRanks": 8, "_bonus": 40 } },
                    { "system": { "name": "Spell Mastery", "category": "Arcane", "_totalRanks": 6, "_bonus": 30, "_disableSkillRoll": true } }
                ]),
            ))
            .await;
        registry
            .add_or_update(&SheetCharacter::new(
                "b",
                "Brenna",
                json!([
                    { "system": { "name": "Climbing", "category": "Athletic", "_totalRanks": 4, "_bonus": 20 } },
                    { "system": { "name": "Swimming", "category": "Athletic", "_totalRanks": 0, "_bonus": 5 } }
                ]),
            ))
            .await;
        registry
            .add_or_update(&SheetCharacter::new(
                "c",
                "Corwin",
                json!([
                    { "system": { "name": "Perception", "category": "Awareness", "_totalRanks": 8, "_bonus": 45 } }
                ]),
            ))
            .await;
        registry
    }

    fn id(s: &str) -> CharacterId {
        CharacterId::new(s)
    }

    #[tokio::test]
    async fn test_primary_bonus_only() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Climbing".into()));

        let report = state.calculate(&registry);
        assert_eq!(report.primary_bonus, 50);
        assert_eq!(report.complement_bonus, 0);
        assert_eq!(report.total, 50);
        assert!(report.breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_full_boost() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Climbing".into()));
        state.add_complement_row();
        state.set_complement_row(0, Some("Rope Mastery".into()), &registry);
        state.set_other_complement(&id("b"), Some("Climbing".into()));
        state.set_other_complement(&id("c"), Some("Perception".into()));

        let report = state.calculate(&registry);
        // 8, 8, 4 ranked: 8 + 4 + 1
        let labels: Vec<_> = report.breakdown.iter().map(|e| e.source_label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Aldric's Rope Mastery", "Corwin's Perception", "Brenna's Climbing"]
        );
        let bonuses: Vec<_> = report.breakdown.iter().map(|e| e.bonus).collect();
        assert_eq!(bonuses, vec![8, 4, 1]);
        assert_eq!(report.complement_bonus, 13);
        assert_eq!(report.total, 63);
    }

    #[tokio::test]
    async fn test_zero_rank_and_missing_sources_are_dropped() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.add_complement_row();
        state.add_complement_row();
        state.set_complement_row(0, Some("Climbing".into()), &registry);
        state.set_other_complement(&id("b"), Some("Swimming".into()));
        state.set_other_complement(&id("c"), Some("Climbing".into()));

        let report = state.calculate(&registry);
        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(report.primary_bonus, 0);
        assert_eq!(report.total, 10);
    }

    #[tokio::test]
    async fn test_disabled_helper_excluded() {
        let mut registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.set_other_complement(&id("c"), Some("Perception".into()));
        assert_eq!(state.calculate(&registry).complement_bonus, 8);

        registry.set_enabled(&id("c"), false).unwrap();
        assert_eq!(state.calculate(&registry).complement_bonus, 0);
    }

    #[tokio::test]
    async fn test_ineligible_complement_flag() {
        let strict = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&strict);
        state.add_complement_row();
        state.set_complement_row(0, Some("Spell Mastery".into()), &strict);
        assert_eq!(state.primary_complements()[0].ranks, 0);

        let lenient = registry(CalcConfig {
            allow_ineligible_complements: true,
            ..CalcConfig::default()
        })
        .await;
        let mut state = BoostState::new(&lenient);
        state.add_complement_row();
        state.set_complement_row(0, Some("Spell Mastery".into()), &lenient);
        assert_eq!(state.calculate(&lenient).complement_bonus, 6);
    }

    #[tokio::test]
    async fn test_ineligible_primary_skill_has_no_bonus() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Spell Mastery".into()));
        assert_eq!(state.calculate(&registry).primary_bonus, 0);
    }

    #[tokio::test]
    async fn test_changing_primary_actor_clears_selections() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Climbing".into()));
        state.add_complement_row();
        state.set_other_complement(&id("c"), Some("Perception".into()));

        state.select_primary_actor(&id("b"), &registry).unwrap();
        assert_eq!(state.primary_actor(), Some(&id("b")));
        assert_eq!(state.primary_skill(), None);
        assert!(state.primary_complements().is_empty());
        assert_eq!(state.other_complement(&id("c")), None);

        let err = state.select_primary_actor(&id("zz"), &registry).unwrap_err();
        assert_eq!(err, CalcError::UnknownParticipant(id("zz")));
    }

    #[tokio::test]
    async fn test_reconcile_disabled_primary() {
        let mut registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Climbing".into()));
        state.set_other_complement(&id("c"), Some("Perception".into()));

        registry.set_enabled(&id("a"), false).unwrap();
        state.reconcile(&registry);
        assert_eq!(state.primary_actor(), Some(&id("b")));
        assert_eq!(state.primary_skill(), None);
        // Helpers keep their choice
        assert_eq!(state.other_complement(&id("c")), Some("Perception"));
    }

    #[tokio::test]
    async fn test_disabled_primary_counts_nothing_before_reconcile() {
        let mut registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Climbing".into()));
        state.add_complement_row();
        state.set_complement_row(0, Some("Rope Mastery".into()), &registry);
        state.set_other_complement(&id("b"), Some("Climbing".into()));
        // 50 + 8 + 4/2
        assert_eq!(state.calculate(&registry).total, 60);

        registry.set_enabled(&id("a"), false).unwrap();
        assert!(state.contributions(&registry).is_empty());
        assert_eq!(state.calculate(&registry), BoostReport::default());
        // Selections survive until reconciled
        assert_eq!(state.primary_actor(), Some(&id("a")));
        assert_eq!(state.primary_complements().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_complement_row() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.add_complement_row();
        state.add_complement_row();
        state.set_complement_row(1, Some("Climbing".into()), &registry);
        state.remove_complement_row(0);
        state.remove_complement_row(7);
        assert_eq!(
            state.primary_complements(),
            &[ComplementRow {
                skill: Some("Climbing".into()),
                ranks: 10
            }]
        );
    }

    #[tokio::test]
    async fn test_view() {
        let registry = registry(CalcConfig::default()).await;
        let mut state = BoostState::new(&registry);
        state.select_primary_skill(Some("Climbing".into()));
        let view = state.view(&registry);

        assert_eq!(view.participants.len(), 3);
        let bonuses: Vec<_> = view
            .participants
            .iter()
            .map(|p| p.bonus_for_selected_skill)
            .collect();
        assert_eq!(bonuses, vec![50, 20, 0]);

        // Spell Mastery is not rollable
        let primary_labels: Vec<_> = view
            .primary_skill_options
            .iter()
            .map(|g| g.category.as_str())
            .collect();
        assert_eq!(primary_labels, vec!["Athletic"]);

        let others: Vec<_> = view.others.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(others, vec!["Brenna", "Corwin"]);
        // Brenna's Swimming has no ranks to offer
        assert_eq!(view.others[0].options[0].records.len(), 1);
        assert_eq!(view.calculation.total, 50);
    }
}
