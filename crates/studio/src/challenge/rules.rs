//! Typed view of a challenge's `validationRules` and the predicates behind each rule kind.

use glam::DVec3;
use serde::Deserialize;
use shared::color::colors_equal;
use shared::{Axis, RuleKind, SceneObject, ShapeType};

/// Per-axis tolerance for `scaleRequired` (exclusive)
pub const SCALE_TOLERANCE: f64 = 0.1;
/// Tolerance in radians for `rotationRequired` (exclusive)
pub const ROTATION_TOLERANCE: f64 = 0.1;
/// Sphere and cylinder count as connected below this distance
pub const CONNECT_DISTANCE: f64 = 2.0;
/// Diameter of a cylinder at unit scale
const CYLINDER_UNIT_RADIUS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RotationRule {
    pub axis: String,
    pub degrees: f64,
}

/// Parsed `validationRules`. Absent keys are `None`; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    /// Shape whose first instance is checked by scale, rotation and color rules
    pub target: Option<ShapeType>,
    pub required_objects: Option<Vec<ShapeType>>,
    pub scale_required: Option<[f64; 3]>,
    pub rotation_required: Option<RotationRule>,
    pub material_color: Option<String>,
    pub handle_diameter: Option<f64>,
    pub connected: Option<bool>,
}

impl ValidationRules {
    /// Parse raw rules. Anything but a well-formed JSON object is an error.
    pub fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        if !raw.is_object() {
            return Err(format!("validationRules must be an object, got {raw}"));
        }
        serde_json::from_value(raw.clone()).map_err(|e| e.to_string())
    }

    fn target_kind(&self) -> ShapeType {
        self.target.clone().unwrap_or(ShapeType::Cube)
    }

    /// First object of the target type, in collection order
    fn target<'a>(&self, objects: &'a [SceneObject]) -> Option<&'a SceneObject> {
        let kind = self.target_kind();
        first_of(objects, &kind)
    }

    /// Whether the rule of the given kind holds. Rules absent from the challenge hold trivially.
    pub fn is_satisfied(&self, kind: RuleKind, objects: &[SceneObject]) -> bool {
        match kind {
            RuleKind::RequiredObjects => self
                .required_objects
                .as_ref()
                .map_or(true, |required| required_objects_present(objects, required)),
            RuleKind::ScaleRequired => self.scale_required.map_or(true, |scale| {
                self.target(objects)
                    .is_some_and(|o| scale_matches(o.scale, scale))
            }),
            RuleKind::RotationRequired => self.rotation_required.as_ref().map_or(true, |rule| {
                self.target(objects)
                    .is_some_and(|o| rotation_matches(o.rotation, rule))
            }),
            RuleKind::MaterialColor => self.material_color.as_ref().map_or(true, |color| {
                self.target(objects)
                    .is_some_and(|o| colors_equal(&o.material.color, color))
            }),
            RuleKind::HandleDiameter => self.handle_diameter.map_or(true, |minimum| {
                first_of(objects, &ShapeType::Cylinder)
                    .is_some_and(|handle| handle_diameter(handle) >= minimum)
            }),
            RuleKind::Connected => match self.connected {
                Some(true) => sphere_connected_to_cylinder(objects),
                Some(false) | None => true,
            },
        }
    }
}

fn first_of<'a>(objects: &'a [SceneObject], kind: &ShapeType) -> Option<&'a SceneObject> {
    objects.iter().find(|o| &o.kind == kind)
}

/// Every listed tag is present at least once
pub fn required_objects_present(objects: &[SceneObject], required: &[ShapeType]) -> bool {
    required
        .iter()
        .all(|kind| objects.iter().any(|o| &o.kind == kind))
}

pub fn scale_matches(actual: [f64; 3], expected: [f64; 3]) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| (a - e).abs() < SCALE_TOLERANCE)
}

/// Rotation in radians against a rule in degrees; unknown axis never matches
pub fn rotation_matches(rotation: [f64; 3], rule: &RotationRule) -> bool {
    let Some(axis) = Axis::parse(&rule.axis) else {
        return false;
    };
    (rotation[axis.index()] - rule.degrees.to_radians()).abs() < ROTATION_TOLERANCE
}

/// Diameter of a cylinder handle derived from its x scale
pub fn handle_diameter(handle: &SceneObject) -> f64 {
    handle.scale[0] * CYLINDER_UNIT_RADIUS * 2.0
}

fn sphere_connected_to_cylinder(objects: &[SceneObject]) -> bool {
    let (Some(sphere), Some(cylinder)) = (
        first_of(objects, &ShapeType::Sphere),
        first_of(objects, &ShapeType::Cylinder),
    ) else {
        return false;
    };
    DVec3::from_array(sphere.position).distance(DVec3::from_array(cylinder.position))
        < CONNECT_DISTANCE
}
