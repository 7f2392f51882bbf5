//! Publication of calculation results
//!
//! A submission renders the current calculation, addresses it to the owners
//! of the enabled participants and the game masters, and hands it to a
//! [`ResultSink`]. Refused submissions publish nothing.

use async_trait::async_trait;
use compskill_types::{
    CalcError, CharacterId, MessageId, OutboundMessage, RollKind, RollMetadata, UserId,
};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::boost::BoostState;
use crate::group::GroupTaskState;
use crate::registry::ParticipantRegistry;
use crate::summary::{boost_summary, group_task_summary};

/// Destination of published results (a chat log, a terminal, a test buffer)
#[async_trait]
pub trait ResultSink: Send {
    /// Deliver one message
    async fn publish(&mut self, message: OutboundMessage) -> Result<(), CalcError>;
}

/// Who is submitting, and who always receives results
#[derive(Debug, Clone, Default)]
pub struct SubmitContext {
    pub author: Option<UserId>,
    pub game_masters: Vec<UserId>,
}

/// Owners of enabled participants, then game masters, without duplicates
#[must_use]
pub fn recipients(registry: &ParticipantRegistry, game_masters: &[UserId]) -> Vec<UserId> {
    let owners = registry.enabled_participants().into_iter().flat_map(|p| {
        p.ownership
            .iter()
            .filter(|(_, level)| level.is_owner())
            .map(|(user, _)| user.clone())
    });

    let mut seen = HashSet::new();
    owners
        .chain(game_masters.iter().cloned())
        .filter(|user| seen.insert(user.clone()))
        .collect()
}

/// Publish the current boost calculation
///
/// Refused with [`CalcError::NoSelection`] when no primary skill (or no
/// primary actor) is selected.
pub async fn submit_boost<S: ResultSink + ?Sized>(
    state: &BoostState,
    registry: &ParticipantRegistry,
    context: &SubmitContext,
    sink: &mut S,
) -> Result<MessageId, CalcError> {
    let Some(skill) = state.primary_skill() else {
        warn!("Boost submission refused: no primary skill");
        return Err(CalcError::NoSelection {
            what: "Primary Skill",
        });
    };
    let actor = state
        .primary_actor()
        .and_then(|id| registry.get(id))
        .filter(|p| p.enabled);
    let Some(actor) = actor else {
        warn!("Boost submission refused: no primary actor");
        return Err(CalcError::NoSelection {
            what: "Primary Actor",
        });
    };

    let report = state.calculate(registry);
    let metadata = RollMetadata {
        kind: RollKind::Boost,
        actor_id: Some(actor.id.clone()),
        skill_name: skill.to_string(),
        bonus: report.total,
    };
    let content = boost_summary(&actor.name, skill, &report);

    publish(registry, context, content, metadata, sink).await
}

/// Publish the current group task calculation
///
/// Refused with [`CalcError::NoSelection`] when no task skill is selected.
pub async fn submit_group_task<S: ResultSink + ?Sized>(
    state: &GroupTaskState,
    registry: &ParticipantRegistry,
    context: &SubmitContext,
    sink: &mut S,
) -> Result<MessageId, CalcError> {
    let Some(skill) = state.task_skill() else {
        warn!("Group task submission refused: no task skill");
        return Err(CalcError::NoSelection { what: "Task Skill" });
    };

    let report = state.calculate(registry);
    let leader = state
        .leader()
        .and_then(|id| registry.get(id))
        .filter(|p| p.enabled)
        .map(|p| p.id.clone());
    let metadata = RollMetadata {
        kind: RollKind::GroupTask,
        actor_id: leader,
        skill_name: skill.to_string(),
        bonus: report.total,
    };
    let content = group_task_summary(&report);

    publish(registry, context, content, metadata, sink).await
}

async fn publish<S: ResultSink + ?Sized>(
    registry: &ParticipantRegistry,
    context: &SubmitContext,
    content: String,
    metadata: RollMetadata,
    sink: &mut S,
) -> Result<MessageId, CalcError> {
    let whisper = recipients(registry, &context.game_masters);
    let message = OutboundMessage::new(context.author.clone(), content, whisper, metadata);
    let id = message.id;

    sink.publish(message).await?;
    info!("Published calculation {}", id);
    Ok(id)
}

/// Check that `user` may apply a published bonus to a live roll
///
/// Game masters always may. Otherwise the user must own the acting
/// character; a group task without leader accepts the owner of any enabled
/// participant.
pub fn authorize_roll_action(
    user: &UserId,
    is_game_master: bool,
    metadata: &RollMetadata,
    registry: &ParticipantRegistry,
) -> Result<(), CalcError> {
    if is_game_master {
        return Ok(());
    }

    let allowed = match (&metadata.actor_id, metadata.kind) {
        (Some(id), _) => registry.get(id).is_some_and(|p| p.is_owned_by(user)),
        (None, RollKind::GroupTask) => registry
            .enabled_participants()
            .iter()
            .any(|p| p.is_owned_by(user)),
        (None, RollKind::Boost) => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(CalcError::PermissionDenied {
            user: user.clone(),
            actor: actor_label(metadata.actor_id.as_ref(), registry),
        })
    }
}

fn actor_label(id: Option<&CharacterId>, registry: &ParticipantRegistry) -> String {
    match id {
        Some(id) => registry
            .get(id)
            .map_or_else(|| id.to_string(), |p| p.name.clone()),
        None => "the group".to_string(),
    }
}
