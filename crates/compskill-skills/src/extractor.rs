//! Skill extractor: hydration, flattening and projection per character

use compskill_types::{CharacterId, ExtractWarning, SkillRecord};
use std::collections::HashSet;
use tracing::{debug, error, warn};

use crate::flatten::{flatten, is_container};
use crate::ordering::sort_records;
use crate::skill::{leadership_ranks, project};
use crate::source::CharacterSource;

/// Extraction options
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Re-check hydration for characters already extracted once
    pub force_reload: bool,
}

/// Skills extracted from one character
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// De-duplicated by name (first occurrence wins), canonical order
    pub records: Vec<SkillRecord>,
    pub leadership_ranks: u32,
    pub warnings: Vec<ExtractWarning>,
}

/// Turns character sources into normalized skill records
#[derive(Debug, Default)]
pub struct SkillExtractor {
    /// Characters whose hydration step already ran
    hydrated: HashSet<CharacterId>,
}

impl SkillExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the hydration step already ran for `id`
    pub fn is_hydrated(&self, id: &CharacterId) -> bool {
        self.hydrated.contains(id)
    }

    /// Refresh stale derived data once per character
    ///
    /// `Ok(Some(_))` carries a warning but extraction may proceed;
    /// `Err(_)` means the source could not be refreshed and yields no skills.
    pub async fn hydrate<C: CharacterSource + ?Sized>(
        &mut self,
        character: &C,
        options: ExtractOptions,
    ) -> Result<Option<ExtractWarning>, ExtractWarning> {
        if self.hydrated.contains(character.id()) && !options.force_reload {
            return Ok(None);
        }

        let mut warning = None;
        if !character.is_hydrated() {
            if character.supports_derive() {
                if let Err(e) = character.derive_extended_data().await {
                    error!("Deriving extended data failed for {}: {}", character.name(), e);
                    return Err(ExtractWarning::DeriveFailed {
                        name: character.name().to_string(),
                        reason: e.0,
                    });
                }
                debug!("Hydrated {}", character.name());
            } else {
                warn!(
                    "{} does not support deriving extended data; using stored values",
                    character.name()
                );
                warning = Some(ExtractWarning::DeriveUnsupported(
                    character.name().to_string(),
                ));
            }
        }

        self.hydrated.insert(character.id().clone());
        Ok(warning)
    }

    /// Extract the character's skills
    ///
    /// Never fails: every problem turns into a warning plus empty or
    /// defaulted data.
    pub async fn extract<C: CharacterSource + ?Sized>(
        &mut self,
        character: &C,
        options: ExtractOptions,
    ) -> Extraction {
        let mut extraction = Extraction::default();

        if !character.has_actor() {
            warn!("{} has no actor", character.name());
            extraction
                .warnings
                .push(ExtractWarning::MissingActor(character.name().to_string()));
            return extraction;
        }

        match self.hydrate(character, options).await {
            Ok(Some(w)) => extraction.warnings.push(w),
            Ok(None) => {}
            Err(w) => {
                extraction.warnings.push(w);
                return extraction;
            }
        }

        let Some(container) = character.skill_data().filter(|c| is_container(c)) else {
            warn!("{} has no usable skill data", character.name());
            extraction
                .warnings
                .push(ExtractWarning::MalformedSkillData(character.name().to_string()));
            return extraction;
        };

        let raw = flatten(container);
        extraction.leadership_ranks = leadership_ranks(&raw);

        let mut seen = HashSet::new();
        let mut records: Vec<SkillRecord> = raw
            .iter()
            .map(project)
            .filter(|r| seen.insert(r.name.clone()))
            .collect();
        sort_records(&mut records);

        debug!(
            "Extracted {} skills from {} (leadership {})",
            records.len(),
            character.name(),
            extraction.leadership_ranks
        );
        extraction.records = records;
        extraction
    }
}
