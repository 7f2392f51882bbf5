use crate::{CharacterId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which calculator produced a published result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollKind {
    Boost,
    GroupTask,
}

/// Machine-readable part of a published result, consumed by a later
/// "apply this bonus to a live roll" action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollMetadata {
    pub kind: RollKind,
    /// Primary participant for a boost, leader for a group task
    pub actor_id: Option<CharacterId>,
    pub skill_name: String,
    pub bonus: u32,
}

/// Flags attached to every message this library publishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFlags {
    pub is_calc: bool,
    pub roll: RollMetadata,
}

/// A rendered calculation result addressed to a set of users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub id: MessageId,
    pub author: Option<UserId>,
    pub content: String,
    pub whisper: Vec<UserId>,
    pub flags: MessageFlags,
    pub timestamp: DateTime<Utc>,
}

impl OutboundMessage {
    pub fn new(
        author: Option<UserId>,
        content: impl Into<String>,
        whisper: Vec<UserId>,
        roll: RollMetadata,
    ) -> Self {
        Self {
            id: MessageId::new(),
            author,
            content: content.into(),
            whisper,
            flags: MessageFlags {
                is_calc: true,
                roll,
            },
            timestamp: Utc::now(),
        }
    }
}
