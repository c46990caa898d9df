//! Challenge dataset types and the progress report produced by validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier of a challenge in the static dataset
pub type ChallengeId = u32;

/// Rule kinds understood by the progress validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    RequiredObjects,
    ScaleRequired,
    RotationRequired,
    MaterialColor,
    HandleDiameter,
    Connected,
}

impl RuleKind {
    /// Key of this rule inside `validationRules`
    pub fn key(&self) -> &'static str {
        match self {
            RuleKind::RequiredObjects => "requiredObjects",
            RuleKind::ScaleRequired => "scaleRequired",
            RuleKind::RotationRequired => "rotationRequired",
            RuleKind::MaterialColor => "materialColor",
            RuleKind::HandleDiameter => "handleDiameter",
            RuleKind::Connected => "connected",
        }
    }

    pub fn all() -> &'static [RuleKind] {
        &[
            RuleKind::RequiredObjects,
            RuleKind::ScaleRequired,
            RuleKind::RotationRequired,
            RuleKind::MaterialColor,
            RuleKind::HandleDiameter,
            RuleKind::Connected,
        ]
    }
}

/// One checklist item of a challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObjectiveRepr")]
pub struct Objective {
    pub text: String,
    /// Rule that decides this objective; `None` means it can never be completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleKind>,
}

impl Objective {
    pub fn new(text: impl Into<String>, rule: RuleKind) -> Self {
        Self {
            text: text.into(),
            rule: Some(rule),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rule: None,
        }
    }
}

/// Objectives are either plain text or `{ "text", "rule" }` on the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectiveRepr {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        rule: Option<RuleKind>,
    },
}

impl From<ObjectiveRepr> for Objective {
    fn from(repr: ObjectiveRepr) -> Self {
        match repr {
            ObjectiveRepr::Text(text) => Objective { text, rule: None },
            ObjectiveRepr::Detailed { text, rule } => Objective { text, rule },
        }
    }
}

fn empty_rules() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A challenge from the static dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    pub objectives: Vec<Objective>,
    /// Rule kind → parameters. Kept raw so malformed parameters surface
    /// as validation errors instead of load failures.
    #[serde(default = "empty_rules")]
    pub validation_rules: serde_json::Value,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(default)]
    pub assistive_tech_focus: bool,
}

impl Challenge {
    /// Positional rule table of the legacy dataset: objective index → candidate rules
    const POSITIONAL_RULES: [&'static [RuleKind]; 4] = [
        &[RuleKind::RequiredObjects],
        &[RuleKind::ScaleRequired],
        &[RuleKind::RotationRequired, RuleKind::Connected],
        &[RuleKind::MaterialColor, RuleKind::HandleDiameter],
    ];

    /// Whether `validationRules` carries the given rule key
    pub fn has_rule(&self, kind: RuleKind) -> bool {
        self.validation_rules
            .as_object()
            .map(|rules| rules.contains_key(kind.key()))
            .unwrap_or(false)
    }

    /// Migrate a legacy challenge whose objectives rely on array position.
    ///
    /// Objectives that already name a rule are left alone. Plain objectives at
    /// positions 0..4 get the first candidate rule present in `validationRules`.
    pub fn with_positional_rules(mut self) -> Self {
        for (index, objective) in self.objectives.iter_mut().enumerate() {
            if objective.rule.is_some() {
                continue;
            }
            let Some(candidates) = Self::POSITIONAL_RULES.get(index) else {
                continue;
            };
            objective.rule = candidates.iter().copied().find(|kind| {
                self.validation_rules
                    .as_object()
                    .map(|rules| rules.contains_key(kind.key()))
                    .unwrap_or(false)
            });
        }
        self
    }

    /// Hint aligned with the objective at `index`
    pub fn hint(&self, index: usize) -> Option<&str> {
        self.hints.get(index).map(String::as_str)
    }
}

/// Outcome of checking a scene against a challenge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub completed: usize,
    pub completed_objectives: BTreeSet<usize>,
    pub total: usize,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressReport {
    /// Build a report from the set of satisfied objective indices
    pub fn from_completed(completed_objectives: BTreeSet<usize>, total: usize) -> Self {
        let completed = completed_objectives.len();
        Self {
            completed,
            completed_objectives,
            total,
            is_complete: total > 0 && completed == total,
            error: None,
        }
    }

    /// Report for a challenge that could not be evaluated
    pub fn failed(total: usize, error: impl Into<String>) -> Self {
        Self {
            completed: 0,
            completed_objectives: BTreeSet::new(),
            total,
            is_complete: false,
            error: Some(error.into()),
        }
    }

    pub fn is_objective_complete(&self, index: usize) -> bool {
        self.completed_objectives.contains(&index)
    }

    /// First objective index not yet completed
    pub fn first_incomplete(&self) -> Option<usize> {
        (0..self.total).find(|i| !self.completed_objectives.contains(i))
    }

    /// Completion ratio in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Fired once when a challenge session reaches full completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub challenge_id: ChallengeId,
    /// Milliseconds since the session started
    pub completion_time: u64,
}
