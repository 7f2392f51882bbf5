//! Scene snapshot: the characters on the table and the calculation to run

use anyhow::{Context, Result};
use compskill_calc::{CalculatorKind, SelectionSource};
use compskill_skills::SheetCharacter;
use compskill_types::{CharacterId, UserId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Selections made in the calculator before submitting
#[derive(Debug, Deserialize)]
pub struct CalcRequest {
    pub kind: CalculatorKind,
    /// Characters added after launch through the add-participant flow
    #[serde(default)]
    pub add: Vec<CharacterId>,
    /// Participants toggled off
    #[serde(default)]
    pub disabled: Vec<CharacterId>,

    // Boost
    #[serde(default)]
    pub primary_actor: Option<CharacterId>,
    #[serde(default)]
    pub primary_skill: Option<String>,
    #[serde(default)]
    pub complements: Vec<String>,
    #[serde(default)]
    pub others: BTreeMap<CharacterId, String>,

    // Group task
    #[serde(default)]
    pub task_skill: Option<String>,
    #[serde(default)]
    pub leader: Option<CharacterId>,
}

/// An exported scene
#[derive(Debug, Deserialize)]
pub struct SceneSnapshot {
    pub characters: Vec<SheetCharacter>,
    /// Characters selected when the calculator was launched
    #[serde(default)]
    pub selected: Vec<CharacterId>,
    #[serde(default)]
    pub author: Option<UserId>,
    #[serde(default)]
    pub game_masters: Vec<UserId>,
    pub request: CalcRequest,
}

impl SceneSnapshot {
    /// Read a snapshot from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid scene {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    fn find(&self, id: &CharacterId) -> Option<&SheetCharacter> {
        self.characters.iter().find(|c| &c.id == id)
    }
}

impl SelectionSource for SceneSnapshot {
    type Character = SheetCharacter;

    fn selected(&self) -> Vec<&SheetCharacter> {
        self.selected.iter().filter_map(|id| self.find(id)).collect()
    }

    fn present(&self) -> Vec<&SheetCharacter> {
        self.characters.iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "characters": [
            { "id": "t1", "name": "Aldric", "actor": { "system": { "_hudInitialized": true, "_skills": [] } } },
            { "id": "t2", "name": "Brenna" }
        ],
        "selected": ["t2", "missing", "t1"],
        "game_masters": ["gm"],
        "request": { "kind": "group_task", "task_skill": "Climbing" }
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneSnapshot::parse(SCENE).unwrap();
        assert_eq!(scene.request.kind, CalculatorKind::GroupTask);
        assert_eq!(scene.request.task_skill.as_deref(), Some("Climbing"));
        assert!(scene.request.others.is_empty());
        assert_eq!(scene.present().len(), 2);

        // Unknown ids are skipped, selection order is kept
        let names: Vec<_> = scene.selected().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Brenna", "Aldric"]);
    }

    #[test]
    fn test_request_kind_is_required() {
        let err = SceneSnapshot::parse(r#"{ "characters": [], "request": {} }"#);
        assert!(err.is_err());
    }
}
