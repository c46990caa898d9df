//! Factory functions for creating test data.
//!
//! Provides helpers to construct `SceneObject`, `Challenge` and
//! `SceneSnapshot` values used in tests and by the command interface.

use std::f64::consts::FRAC_PI_4;

use serde_json::json;
use shared::*;

// ── Object factories ──────────────────────────────────────────

/// Unit cube at the origin.
pub fn cube(id: &str) -> SceneObject {
    SceneObject::with_id(id, ShapeType::Cube)
}

pub fn sphere(id: &str) -> SceneObject {
    SceneObject::with_id(id, ShapeType::Sphere)
}

pub fn cylinder(id: &str) -> SceneObject {
    SceneObject::with_id(id, ShapeType::Cylinder)
}

/// Object of any shape at a position.
pub fn object_at(id: &str, kind: ShapeType, position: [f64; 3]) -> SceneObject {
    SceneObject::with_id(id, kind).at(position)
}

/// Cube that satisfies every objective of [`blue_cube_challenge`].
pub fn solved_blue_cube() -> SceneObject {
    cube("blue")
        .scaled([2.0, 2.0, 2.0])
        .rotated([0.0, FRAC_PI_4, 0.0])
        .colored("#0000ff")
}

/// Sphere resting on a thick cylinder: satisfies [`door_handle_challenge`].
pub fn door_handle_scene() -> Vec<SceneObject> {
    vec![
        cylinder("grip").scaled([1.6, 2.0, 1.6]),
        sphere("knob").at([0.0, 1.2, 0.0]),
    ]
}

// ── Challenge factories ───────────────────────────────────────

/// Four-step cube challenge: add, scale 2x, rotate 45° on Y, paint blue.
pub fn blue_cube_challenge() -> Challenge {
    Challenge {
        id: 1,
        title: "Blue Cube".to_string(),
        description: "Create, resize, rotate and paint a cube".to_string(),
        category: "basics".to_string(),
        difficulty: "beginner".to_string(),
        objectives: vec![
            Objective::new("Add a cube", RuleKind::RequiredObjects),
            Objective::new("Scale it to 2 x 2 x 2", RuleKind::ScaleRequired),
            Objective::new("Rotate it 45° around Y", RuleKind::RotationRequired),
            Objective::new("Paint it blue", RuleKind::MaterialColor),
        ],
        validation_rules: json!({
            "requiredObjects": ["cube"],
            "scaleRequired": [2, 2, 2],
            "rotationRequired": { "axis": "y", "degrees": 45 },
            "materialColor": "#0000ff"
        }),
        estimated_time: "5 min".to_string(),
        hints: vec![
            "Pick the cube from the shape library".to_string(),
            "Use the scale tool".to_string(),
            "Use the rotate tool".to_string(),
            "Open the material panel".to_string(),
        ],
        assistive_tech_focus: false,
    }
}

/// Sphere-on-cylinder handle with a minimum grip diameter.
pub fn door_handle_challenge() -> Challenge {
    Challenge {
        id: 2,
        title: "Accessible Door Handle".to_string(),
        description: "Build an easy-grip lever handle".to_string(),
        category: "assistive".to_string(),
        difficulty: "intermediate".to_string(),
        objectives: vec![
            Objective::new("Add a sphere and a cylinder", RuleKind::RequiredObjects),
            Objective::new("Connect them", RuleKind::Connected),
            Objective::new("Grip at least 1.5 thick", RuleKind::HandleDiameter),
        ],
        validation_rules: json!({
            "requiredObjects": ["sphere", "cylinder"],
            "connected": true,
            "handleDiameter": 1.5
        }),
        estimated_time: "10 min".to_string(),
        hints: vec![],
        assistive_tech_focus: true,
    }
}

// ── Snapshot factories ────────────────────────────────────────

/// Wrap objects into a snapshot with default settings.
pub fn snapshot(objects: Vec<SceneObject>) -> SceneSnapshot {
    SceneSnapshot {
        objects,
        ..SceneSnapshot::default()
    }
}

/// Snapshot with one of each basic shape lined up on X.
pub fn snapshot_basic_shapes() -> SceneSnapshot {
    snapshot(
        ShapeType::basic()
            .iter()
            .enumerate()
            .map(|(i, kind)| object_at(&format!("{kind}{i}"), kind.clone(), [i as f64 * 2.0, 0.0, 0.0]))
            .collect(),
    )
}
