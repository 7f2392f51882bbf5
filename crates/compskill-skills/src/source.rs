//! Character data source contract and a JSON-backed sheet adapter

use async_trait::async_trait;
use compskill_types::{CharacterId, HydrationError, OwnershipLevel, UserId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tracing::debug;

/// A character as seen by the skill extractor
///
/// Implemented by the host application. Hydration goes through `&self`:
/// sources own whatever state "derive extended data" refreshes.
#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Stable identity of this character instance
    fn id(&self) -> &CharacterId;

    /// Display name
    fn name(&self) -> &str;

    /// Portrait or token image
    fn image_ref(&self) -> Option<&str>;

    /// Whether an underlying actor (the combat-relevant data) exists
    fn has_actor(&self) -> bool;

    /// Whether computed fields (skill bonuses, total ranks) are current
    fn is_hydrated(&self) -> bool;

    /// Whether `derive_extended_data` is available on this source
    fn supports_derive(&self) -> bool;

    /// Recompute the character's derived fields
    async fn derive_extended_data(&self) -> Result<(), HydrationError>;

    /// The nested skill container, if the actor has one
    fn skill_data(&self) -> Option<&Value>;

    /// Users and their permission level on this character
    fn ownership(&self) -> Vec<(UserId, OwnershipLevel)>;
}

/// An actor document as exported by the game system
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorData {
    #[serde(default)]
    pub system: Value,
}

/// A character backed by an exported JSON sheet
#[derive(Debug, Deserialize)]
pub struct SheetCharacter {
    pub id: CharacterId,
    pub name: String,
    #[serde(default, alias = "img")]
    pub image: Option<String>,
    #[serde(default)]
    pub actor: Option<ActorData>,
    #[serde(default)]
    pub ownership: BTreeMap<UserId, OwnershipLevel>,
    /// Whether the sheet can recompute its derived data
    #[serde(default = "default_derivable")]
    pub derivable: bool,
    #[serde(skip)]
    derived: AtomicBool,
    #[serde(skip)]
    derive_calls: AtomicU32,
    #[serde(skip)]
    derive_failure: Option<String>,
}

fn default_derivable() -> bool {
    true
}

impl SheetCharacter {
    /// Create a sheet whose actor exposes `skills` as its skill container
    pub fn new(id: impl Into<String>, name: impl Into<String>, skills: Value) -> Self {
        Self {
            id: CharacterId::new(id),
            name: name.into(),
            image: None,
            actor: Some(ActorData {
                system: serde_json::json!({ "_hudInitialized": true, "_skills": skills }),
            }),
            ownership: BTreeMap::new(),
            derivable: true,
            derived: AtomicBool::new(false),
            derive_calls: AtomicU32::new(0),
            derive_failure: None,
        }
    }

    /// Create a sheet without an actor
    pub fn without_actor(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut sheet = Self::new(id, name, Value::Null);
        sheet.actor = None;
        sheet
    }

    /// Grant `user` a permission level
    pub fn with_owner(mut self, user: impl Into<String>, level: OwnershipLevel) -> Self {
        self.ownership.insert(UserId::new(user), level);
        self
    }

    /// Set the token image shown next to the participant
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Mark the derived data as stale
    pub fn stale(mut self) -> Self {
        if let Some(Value::Object(system)) = self.actor.as_mut().map(|a| &mut a.system) {
            system.insert("_hudInitialized".into(), Value::Bool(false));
        }
        self
    }

    /// Remove the ability to derive extended data
    pub fn underivable(mut self) -> Self {
        self.derivable = false;
        self
    }

    /// Make every derive attempt fail with `reason`
    pub fn with_derive_failure(mut self, reason: impl Into<String>) -> Self {
        self.derive_failure = Some(reason.into());
        self
    }

    /// Number of times derived data was recomputed
    pub fn derive_count(&self) -> u32 {
        self.derive_calls.load(Ordering::Relaxed)
    }

    fn system(&self) -> Option<&Value> {
        self.actor.as_ref().map(|a| &a.system)
    }
}

#[async_trait]
impl CharacterSource for SheetCharacter {
    fn id(&self) -> &CharacterId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image_ref(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn has_actor(&self) -> bool {
        self.actor.is_some()
    }

    fn is_hydrated(&self) -> bool {
        self.derived.load(Ordering::Relaxed)
            || self
                .system()
                .and_then(|s| s.get("_hudInitialized"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
    }

    fn supports_derive(&self) -> bool {
        self.derivable
    }

    async fn derive_extended_data(&self) -> Result<(), HydrationError> {
        self.derive_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(reason) = &self.derive_failure {
            return Err(HydrationError(reason.clone()));
        }
        debug!("Derived extended data for {}", self.name);
        self.derived.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn skill_data(&self) -> Option<&Value> {
        self.system().and_then(|s| s.get("_skills"))
    }

    fn ownership(&self) -> Vec<(UserId, OwnershipLevel)> {
        self.ownership
            .iter()
            .map(|(user, level)| (user.clone(), *level))
            .collect()
    }
}
