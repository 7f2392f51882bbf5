//! Participant registry for one calculation session
//!
//! Owns the participants in insertion order. Calculators only read it,
//! apart from toggling `enabled`.

use compskill_skills::{group_by_category, sort_records, CharacterSource, SkillExtractor};
use compskill_types::{CalcError, CharacterId, SkillGroup, SkillRecord};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::CalcConfig;
use crate::participant::Participant;

/// Registry of the characters considered in a calculation
#[derive(Debug)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
    extractor: SkillExtractor,
    config: CalcConfig,
}

impl ParticipantRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(extractor: SkillExtractor, config: CalcConfig) -> Self {
        Self {
            participants: Vec::new(),
            extractor,
            config,
        }
    }

    /// Calculator configuration
    #[must_use]
    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    /// Hydrate a character into a participant
    ///
    /// Returns `true` when a new participant was added. Re-adding a known
    /// character is a no-op unless `force_reload` is configured, in which
    /// case its skills are refreshed and its `enabled` flag is kept.
    pub async fn add_or_update<C: CharacterSource + ?Sized>(&mut self, character: &C) -> bool {
        let existing = self.position(character.id());
        if existing.is_some() && !self.config.force_reload {
            debug!("{} is already a participant", character.name());
            return false;
        }

        let extraction = self
            .extractor
            .extract(character, self.config.extract_options())
            .await;

        let participant = Participant {
            id: character.id().clone(),
            name: character.name().to_string(),
            image_ref: character.image_ref().map(str::to_string),
            enabled: true,
            leadership_ranks: extraction.leadership_ranks,
            skills: extraction.records,
            ownership: character.ownership(),
            warnings: extraction.warnings,
        };

        if let Some(index) = existing {
            let enabled = self.participants[index].enabled;
            self.participants[index] = Participant {
                enabled,
                ..participant
            };
            debug!("Reloaded participant {}", character.name());
            false
        } else {
            info!(
                "Added participant {} ({} skills, leadership {})",
                participant.name,
                participant.skills.len(),
                participant.leadership_ranks
            );
            self.participants.push(participant);
            true
        }
    }

    /// Include or exclude a participant without dropping its data
    pub fn set_enabled(&mut self, id: &CharacterId, enabled: bool) -> Result<(), CalcError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CalcError::UnknownParticipant(id.clone()))?;
        participant.enabled = enabled;
        debug!("{} enabled={}", participant.name, enabled);
        Ok(())
    }

    /// Get a participant by id
    #[must_use]
    pub fn get(&self, id: &CharacterId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Check whether a character is registered
    #[must_use]
    pub fn contains(&self, id: &CharacterId) -> bool {
        self.position(id).is_some()
    }

    /// All participants, enabled or not, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// The participants calculations consume
    #[must_use]
    pub fn enabled_participants(&self) -> Vec<&Participant> {
        self.participants.iter().filter(|p| p.enabled).collect()
    }

    /// Characters that could still be added
    ///
    /// Characters without an actor are never offered.
    pub fn available_candidates<'a, C, I>(&self, all_known: I) -> Vec<&'a C>
    where
        C: CharacterSource + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        all_known
            .into_iter()
            .filter(|c| c.has_actor() && !self.contains(c.id()))
            .collect()
    }

    /// Leader chosen when none is valid
    ///
    /// First enabled participant with leadership ranks, otherwise the first
    /// enabled participant, otherwise none.
    #[must_use]
    pub fn default_leader(&self) -> Option<&CharacterId> {
        self.participants
            .iter()
            .filter(|p| p.enabled)
            .find(|p| p.leadership_ranks > 0)
            .or_else(|| self.participants.iter().find(|p| p.enabled))
            .map(|p| &p.id)
    }

    /// Union of every participant's rollable skills, grouped by category
    ///
    /// A name seen on an earlier participant is not replaced by a later one.
    #[must_use]
    pub fn task_skill_options(&self) -> Vec<SkillGroup> {
        let mut seen = HashSet::new();
        let mut records: Vec<SkillRecord> = self
            .participants
            .iter()
            .flat_map(|p| p.rollable_skills())
            .filter(|s| seen.insert(s.name.clone()))
            .cloned()
            .collect();
        sort_records(&mut records);
        group_by_category(&records)
    }

    /// Get number of participants
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn position(&self, id: &CharacterId) -> Option<usize> {
        self.participants.iter().position(|p| &p.id == id)
    }
}

impl Default for ParticipantRegistry {
    fn default() -> Self {
        Self::new(SkillExtractor::new(), CalcConfig::default())
    }
}
