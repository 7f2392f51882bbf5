use crate::config::Config;
use crate::scene::{CalcRequest, SceneSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use compskill_calc::{
    add_participants, launch, submit_boost, submit_group_task, BoostState, CalculatorKind,
    GroupTaskState, ParticipantRegistry, ResultSink, SubmitContext,
};
use compskill_skills::SkillExtractor;
use compskill_types::{CalcError, OutboundMessage};
use tracing::{info, warn};

/// Prints published results to stdout
pub struct TerminalSink;

#[async_trait]
impl ResultSink for TerminalSink {
    async fn publish(&mut self, message: OutboundMessage) -> Result<(), CalcError> {
        let whisper: Vec<&str> = message.whisper.iter().map(|u| u.as_str()).collect();
        let flags = serde_json::to_string(&message.flags)
            .map_err(|e| CalcError::Publish(e.to_string()))?;

        println!("--- {} ---", message.timestamp.format("%Y-%m-%d %H:%M:%S"));
        println!("{}", message.content);
        println!("Whisper: {}", whisper.join(", "));
        println!("Flags: {flags}");
        Ok(())
    }
}

/// Console service - loads a scene and runs one calculation
pub struct ConsoleService {
    config: Config,
}

impl ConsoleService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        compskill_logging::init_logging(&self.config.logging)?;
        info!("Starting CompSkill console");

        let scene = SceneSnapshot::load(&self.config.scene.path).await?;
        info!(
            "Loaded scene {} ({} characters)",
            self.config.scene.path.display(),
            scene.characters.len()
        );

        let calculator = self.config.calculator.clone();
        let mut registry = launch(&scene, SkillExtractor::new(), calculator).await?;

        let added = add_participants(&mut registry, &scene, &scene.request.add).await;
        if added > 0 {
            info!("Added {} participants", added);
        }

        for id in &scene.request.disabled {
            if let Err(e) = registry.set_enabled(id, false) {
                warn!("{}", e);
            }
        }

        for participant in registry.iter() {
            for warning in &participant.warnings {
                warn!("{}: {}", participant.name, warning);
            }
        }

        let context = SubmitContext {
            author: scene.author.clone(),
            game_masters: scene.game_masters.clone(),
        };
        let mut sink = TerminalSink;

        let result = match scene.request.kind {
            CalculatorKind::Boost => {
                run_boost(&scene.request, &registry, &context, &mut sink).await
            }
            CalculatorKind::GroupTask => {
                run_group_task(&scene.request, &registry, &context, &mut sink).await
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(e @ CalcError::NoSelection { .. }) => {
                // A refusal is reported, not fatal
                warn!("{}", e);
                eprintln!("{e}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn run_boost(
    request: &CalcRequest,
    registry: &ParticipantRegistry,
    context: &SubmitContext,
    sink: &mut TerminalSink,
) -> Result<(), CalcError> {
    let mut state = BoostState::new(registry);
    if let Some(id) = &request.primary_actor {
        state.select_primary_actor(id, registry)?;
    }
    state.select_primary_skill(request.primary_skill.clone());

    for (index, skill) in request.complements.iter().enumerate() {
        state.add_complement_row();
        state.set_complement_row(index, Some(skill.clone()), registry);
    }
    for (id, skill) in &request.others {
        state.set_other_complement(id, Some(skill.clone()));
    }

    let view = state.view(registry);
    log_view(&view);

    submit_boost(&state, registry, context, sink).await?;
    Ok(())
}

async fn run_group_task(
    request: &CalcRequest,
    registry: &ParticipantRegistry,
    context: &SubmitContext,
    sink: &mut TerminalSink,
) -> Result<(), CalcError> {
    let mut state = GroupTaskState::new(registry);
    if request.leader.is_some() {
        state.set_leader(request.leader.clone(), registry)?;
    }
    state.set_task_skill(request.task_skill.clone());

    let view = state.view(registry);
    log_view(&view);

    submit_group_task(&state, registry, context, sink).await?;
    Ok(())
}

fn log_view<T: serde::Serialize>(view: &T) {
    match serde_json::to_string(view) {
        Ok(json) => tracing::debug!("Calculator view: {}", json),
        Err(e) => warn!("Failed to serialize view: {}", e),
    }
}
