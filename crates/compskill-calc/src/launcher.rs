//! Calculator launch and participant addition

use compskill_skills::{CharacterSource, SkillExtractor};
use compskill_types::{CalcError, CharacterId};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::CalcConfig;
use crate::registry::ParticipantRegistry;

/// Which calculator to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    /// Single primary actor boosted by complementary skills
    Boost,
    /// Shared skill averaged over participants plus leadership
    GroupTask,
}

/// The host's view of the scene: what is selected, and what is present
pub trait SelectionSource {
    type Character: CharacterSource;

    /// Characters the user selected when launching, in selection order
    fn selected(&self) -> Vec<&Self::Character>;

    /// Every character present in the scene
    fn present(&self) -> Vec<&Self::Character>;
}

/// Build the registry for a new calculator from the current selection
pub async fn launch<S: SelectionSource>(
    selection: &S,
    extractor: SkillExtractor,
    config: CalcConfig,
) -> Result<ParticipantRegistry, CalcError> {
    let selected = selection.selected();
    if selected.is_empty() {
        warn!("Launch refused: no character selected");
        return Err(CalcError::NoParticipantsSelected);
    }

    let mut registry = ParticipantRegistry::new(extractor, config);
    for character in selected {
        registry.add_or_update(character).await;
    }

    info!("Launched calculator with {} participants", registry.len());
    Ok(registry)
}

/// Add the chosen characters after the add-participant selection is confirmed
///
/// Only candidates still available (present, with an actor, not yet
/// registered) are added. Returns how many were added.
pub async fn add_participants<S: SelectionSource>(
    registry: &mut ParticipantRegistry,
    selection: &S,
    chosen: &[CharacterId],
) -> usize {
    let present = selection.present();
    let candidates: Vec<&S::Character> = registry
        .available_candidates(present)
        .into_iter()
        .filter(|c| chosen.contains(c.id()))
        .collect();

    let mut added = 0;
    for character in candidates {
        if registry.add_or_update(character).await {
            added += 1;
        }
    }
    added
}
