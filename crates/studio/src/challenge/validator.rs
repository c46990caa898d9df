//! Progress validator: checks scene objects against a challenge.

use std::collections::BTreeSet;

use shared::{Challenge, ProgressReport, SceneObject};

use super::rules::ValidationRules;

/// Evaluate every objective of `challenge` against `objects`.
///
/// Pure and idempotent. An objective completes when its declared rule holds;
/// objectives without a rule never complete. Malformed `validationRules`
/// yield an empty report carrying the parse error.
pub fn check_progress(objects: &[SceneObject], challenge: &Challenge) -> ProgressReport {
    let total = challenge.objectives.len();

    let rules = match ValidationRules::parse(&challenge.validation_rules) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(challenge = challenge.id, "Malformed validation rules: {e}");
            return ProgressReport::failed(total, format!("Malformed validation rules: {e}"));
        }
    };

    let completed: BTreeSet<usize> = challenge
        .objectives
        .iter()
        .enumerate()
        .filter_map(|(index, objective)| {
            let kind = objective.rule?;
            rules.is_satisfied(kind, objects).then_some(index)
        })
        .collect();

    let report = ProgressReport::from_completed(completed, total);
    tracing::debug!(
        challenge = challenge.id,
        completed = report.completed,
        total,
        "progress checked"
    );
    report
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use serde_json::json;
    use shared::{Material, Objective, ObjectUpdate, RuleKind, ShapeType};

    use super::*;
    use crate::fixtures;

    fn cube() -> SceneObject {
        SceneObject::with_id("c", ShapeType::Cube)
    }

    #[test]
    fn test_empty_rules_with_plain_objectives() {
        let challenge = Challenge {
            objectives: vec![Objective::text("a"), Objective::text("b"), Objective::text("c")],
            validation_rules: json!({}),
            ..fixtures::blue_cube_challenge()
        };
        let report = check_progress(&[cube()], &challenge);
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 3);
        assert!(!report.is_complete);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_required_cube_with_only_sphere() {
        let challenge = fixtures::blue_cube_challenge();
        let report = check_progress(&[SceneObject::with_id("s", ShapeType::Sphere)], &challenge);
        assert!(!report.is_objective_complete(0));
    }

    #[test]
    fn test_blue_cube_progression() {
        let challenge = fixtures::blue_cube_challenge();
        let mut objects = vec![cube()];
        let report = check_progress(&objects, &challenge);
        assert_eq!(report.completed_objectives, [0].into_iter().collect());

        objects[0].apply(&ObjectUpdate::scale([2.0, 2.0, 2.0]));
        let report = check_progress(&objects, &challenge);
        assert!(report.is_objective_complete(1));

        objects[0].apply(&ObjectUpdate::rotation([0.0, FRAC_PI_4, 0.0]));
        let report = check_progress(&objects, &challenge);
        assert!(report.is_objective_complete(2));
        assert!(!report.is_complete);

        objects[0].apply(&ObjectUpdate::material(Material::with_color("#0000ff")));
        let report = check_progress(&objects, &challenge);
        assert_eq!(report.completed, 4);
        assert!(report.is_complete);
    }

    #[test]
    fn test_rotation_off_by_five_degrees() {
        let mut challenge = fixtures::blue_cube_challenge();
        challenge.validation_rules["rotationRequired"] = json!({"axis": "y", "degrees": 50});
        let objects = [cube().rotated([0.0, FRAC_PI_4, 0.0])];
        assert!(!check_progress(&objects, &challenge).is_objective_complete(2));
    }

    #[test]
    fn test_color_normalization() {
        let challenge = fixtures::blue_cube_challenge();
        for color in ["#0000ff", "#0000FF", "blue", "#00f"] {
            let report = check_progress(&[cube().colored(color)], &challenge);
            assert!(report.is_objective_complete(3), "{color} should match");
        }
        let report = check_progress(&[cube().colored("#3b82f6")], &challenge);
        assert!(!report.is_objective_complete(3));
    }

    #[test]
    fn test_malformed_rules_report_error() {
        let mut challenge = fixtures::blue_cube_challenge();
        challenge.validation_rules["scaleRequired"] = json!("huge");
        let report = check_progress(&[cube()], &challenge);
        assert_eq!(report.completed, 0);
        assert!(report.completed_objectives.is_empty());
        assert!(!report.is_complete);
        assert!(report.error.unwrap().starts_with("Malformed validation rules"));
    }

    #[test]
    fn test_non_object_rules_report_error() {
        let challenge = Challenge {
            validation_rules: json!("nope"),
            ..fixtures::blue_cube_challenge()
        };
        assert!(check_progress(&[], &challenge).error.is_some());
    }

    #[test]
    fn test_is_idempotent() {
        let challenge = fixtures::door_handle_challenge();
        let objects = fixtures::door_handle_scene();
        assert_eq!(
            check_progress(&objects, &challenge),
            check_progress(&objects, &challenge)
        );
    }

    #[test]
    fn test_door_handle_complete() {
        let challenge = fixtures::door_handle_challenge();
        let report = check_progress(&fixtures::door_handle_scene(), &challenge);
        assert!(report.is_complete, "{report:?}");
    }

    #[test]
    fn test_objective_with_absent_rule_holds() {
        let challenge = Challenge {
            objectives: vec![Objective::new("Connect", RuleKind::Connected)],
            validation_rules: json!({}),
            ..fixtures::blue_cube_challenge()
        };
        let report = check_progress(&[], &challenge);
        assert!(report.is_complete);
    }

    #[test]
    fn test_no_objectives_never_complete() {
        let challenge = Challenge {
            objectives: vec![],
            ..fixtures::blue_cube_challenge()
        };
        let report = check_progress(&[cube()], &challenge);
        assert_eq!(report.total, 0);
        assert!(!report.is_complete);
    }
}
