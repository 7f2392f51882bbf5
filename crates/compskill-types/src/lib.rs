//! CompSkill Types - Core types shared by the complementary skills crates
//!
//! This module defines the data types exchanged between skill extraction,
//! the calculators and whatever presentation layer drives them.

pub mod error;
pub mod ids;
pub mod message;
pub mod report;
pub mod skill;

pub use error::{CalcError, ExtractWarning, HydrationError};
pub use ids::{CharacterId, MessageId, UserId};
pub use message::{MessageFlags, OutboundMessage, RollKind, RollMetadata};
pub use report::{BoostReport, BreakdownEntry, Contribution, GroupTaskReport, ParticipantBonus};
pub use skill::{OwnershipLevel, SkillGroup, SkillRecord};
