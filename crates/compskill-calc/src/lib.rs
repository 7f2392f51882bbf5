//! `CompSkill` Calculators
//!
//! Participant registry and the two bonus calculators built on top of the
//! skill extractor.
//!
//! ## Features
//!
//! - Complementary boost: primary skill bonus plus complementary ranks under
//!   diminishing returns (the n-th largest contribution counts `1/2^n`)
//! - Group task: rounded average of the participants' bonuses plus the
//!   leader's Leadership ranks
//! - Publication of results to a pluggable sink, addressed to owners and
//!   game masters
//! - Zero unsafe code

#![deny(unsafe_code, unused_imports, unused_variables)]

pub mod boost;
pub mod config;
pub mod diminishing;
pub mod group;
pub mod launcher;
pub mod participant;
pub mod publish;
pub mod registry;
pub mod summary;

pub use boost::{BoostState, BoostView, ComplementRow, OtherParticipantView};
pub use config::{CalcConfig, TieBreak};
pub use diminishing::{diminished, reduce};
pub use group::{rounded_average, GroupTaskState, GroupTaskView, NO_LEADER};
pub use launcher::{add_participants, launch, CalculatorKind, SelectionSource};
pub use participant::{Participant, ParticipantSummary};
pub use publish::{
    authorize_roll_action, recipients, submit_boost, submit_group_task, ResultSink, SubmitContext,
};
pub use registry::ParticipantRegistry;
pub use summary::{boost_summary, group_task_summary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BoostState, CalcConfig, GroupTaskState, ParticipantRegistry, ResultSink, SelectionSource,
        SubmitContext,
    };
}
