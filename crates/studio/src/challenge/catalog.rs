use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::{Challenge, ChallengeId};

const BUILTIN_CHALLENGES: &str = include_str!("../../data/challenges.json");

/// Display info for a challenge category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Static challenge dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCatalog {
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryInfo>,
}

impl ChallengeCatalog {
    /// Dataset shipped with the application
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_CHALLENGES) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Built-in challenge dataset is invalid: {e}");
                Self::default()
            }
        }
    }

    /// Parse a `{ "challenges": [...], "categories": {...} }` document
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse challenges: {e}"))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} challenges from {}",
            catalog.len(),
            path.display()
        );
        let unruled = catalog
            .challenges
            .iter()
            .filter(|c| c.objectives.iter().any(|o| o.rule.is_none()));
        for challenge in unruled {
            tracing::warn!(
                challenge = challenge.id,
                "Challenge has objectives without a rule; they never complete"
            );
        }
        Ok(catalog)
    }

    /// Give plain objectives a rule by array position, for datasets written
    /// before objectives declared their rule
    pub fn with_positional_rules(mut self) -> Self {
        self.challenges = self
            .challenges
            .into_iter()
            .map(Challenge::with_positional_rules)
            .collect();
        self
    }

    pub fn get(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Challenges grouped by category key, in dataset order within each group
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&Challenge>> {
        let mut groups: BTreeMap<&str, Vec<&Challenge>> = BTreeMap::new();
        for challenge in &self.challenges {
            groups
                .entry(challenge.category.as_str())
                .or_default()
                .push(challenge);
        }
        groups
    }

    pub fn category(&self, key: &str) -> Option<&CategoryInfo> {
        self.categories.get(key)
    }

    /// Challenges flagged as assistive-technology projects
    pub fn assistive(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter().filter(|c| c.assistive_tech_focus)
    }
}
