use serde::{Deserialize, Serialize};

pub mod challenge;
pub mod color;

pub use challenge::{
    Challenge, ChallengeId, CompletionEvent, Objective, ProgressReport, RuleKind,
};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Generate a fresh object id
pub fn new_object_id() -> ObjectId {
    uuid::Uuid::new_v4().to_string()
}

/// Kind of shape placed in the scene.
///
/// Unknown tags are kept verbatim in `Other` so the store never rejects an
/// object; renderers fall back to [`ShapeType::fallback_geometry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeType {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Plane,
    Pyramid,
    Octahedron,
    Tetrahedron,
    GripHandle,
    ButtonLarge,
    Ramp,
    Lever,
    Other(String),
}

impl ShapeType {
    /// Wire tag of this shape
    pub fn as_str(&self) -> &str {
        match self {
            ShapeType::Cube => "cube",
            ShapeType::Sphere => "sphere",
            ShapeType::Cylinder => "cylinder",
            ShapeType::Cone => "cone",
            ShapeType::Torus => "torus",
            ShapeType::Plane => "plane",
            ShapeType::Pyramid => "pyramid",
            ShapeType::Octahedron => "octahedron",
            ShapeType::Tetrahedron => "tetrahedron",
            ShapeType::GripHandle => "grip-handle",
            ShapeType::ButtonLarge => "button-large",
            ShapeType::Ramp => "ramp",
            ShapeType::Lever => "lever",
            ShapeType::Other(tag) => tag,
        }
    }

    /// Whether the tag is one of the known shape kinds
    pub fn is_known(&self) -> bool {
        !matches!(self, ShapeType::Other(_))
    }

    /// Geometry a renderer should draw for this shape
    pub fn fallback_geometry(&self) -> ShapeType {
        match self {
            ShapeType::Other(_) => ShapeType::Cube,
            known => known.clone(),
        }
    }

    /// Basic shapes of the shape library
    pub fn basic() -> &'static [ShapeType] {
        &[
            ShapeType::Cube,
            ShapeType::Sphere,
            ShapeType::Cylinder,
            ShapeType::Cone,
            ShapeType::Torus,
            ShapeType::Plane,
            ShapeType::Pyramid,
            ShapeType::Octahedron,
            ShapeType::Tetrahedron,
        ]
    }

    /// Assistive-technology shapes of the shape library
    pub fn assistive() -> &'static [ShapeType] {
        &[
            ShapeType::GripHandle,
            ShapeType::ButtonLarge,
            ShapeType::Ramp,
            ShapeType::Lever,
        ]
    }
}

impl From<String> for ShapeType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "cube" => ShapeType::Cube,
            "sphere" => ShapeType::Sphere,
            "cylinder" => ShapeType::Cylinder,
            "cone" => ShapeType::Cone,
            "torus" => ShapeType::Torus,
            "plane" => ShapeType::Plane,
            "pyramid" => ShapeType::Pyramid,
            "octahedron" => ShapeType::Octahedron,
            "tetrahedron" => ShapeType::Tetrahedron,
            "grip-handle" => ShapeType::GripHandle,
            "button-large" => ShapeType::ButtonLarge,
            "ramp" => ShapeType::Ramp,
            "lever" => ShapeType::Lever,
            _ => ShapeType::Other(tag),
        }
    }
}

impl From<&str> for ShapeType {
    fn from(tag: &str) -> Self {
        ShapeType::from(tag.to_string())
    }
}

impl From<ShapeType> for String {
    fn from(shape: ShapeType) -> Self {
        match shape {
            ShapeType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors the shape library picks from for new objects
pub const SHAPE_PALETTE: [&str; 6] = [
    "#6366f1", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4",
];

fn default_metalness() -> f64 {
    0.1
}

fn default_roughness() -> f64 {
    0.7
}

fn default_opacity() -> f64 {
    1.0
}

fn default_color() -> String {
    SHAPE_PALETTE[0].to_string()
}

/// Surface material of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Hex color, e.g. `#0000ff`
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_metalness")]
    pub metalness: f64,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: default_color(),
            metalness: default_metalness(),
            roughness: default_roughness(),
            transparent: false,
            opacity: default_opacity(),
        }
    }
}

impl Material {
    /// Default material with the given color
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// A placed shape instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ShapeType,
    #[serde(default)]
    pub position: [f64; 3],
    /// Euler angles in radians
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub material: Material,
}

impl SceneObject {
    /// New object at the origin with a fresh id, unit scale and default material
    pub fn new(kind: impl Into<ShapeType>) -> Self {
        Self::with_id(new_object_id(), kind)
    }

    /// New object with a caller-chosen id
    pub fn with_id(id: impl Into<ObjectId>, kind: impl Into<ShapeType>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
            material: Material::default(),
        }
    }

    pub fn at(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    pub fn colored(mut self, color: impl Into<String>) -> Self {
        self.material.color = color.into();
        self
    }

    /// Rotation converted to degrees, for display
    pub fn rotation_degrees(&self) -> [f64; 3] {
        self.rotation.map(f64::to_degrees)
    }

    /// Apply a partial update (shallow merge)
    pub fn apply(&mut self, update: &ObjectUpdate) {
        if let Some(kind) = &update.kind {
            self.kind = kind.clone();
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = update.scale {
            self.scale = scale;
        }
        if let Some(material) = &update.material {
            self.material = material.clone();
        }
    }
}

/// Partial update of a [`SceneObject`]. A provided material replaces the whole material.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectUpdate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
}

impl ObjectUpdate {
    pub fn position(position: [f64; 3]) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: [f64; 3]) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn scale(scale: [f64; 3]) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn material(material: Material) -> Self {
        Self {
            material: Some(material),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Active manipulation tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformMode {
    #[default]
    Select,
    Move,
    Rotate,
    Scale,
    Align,
    MeasureDistance,
    MeasureAngle,
    MeasureArea,
    Extrude,
    Revolve,
    Loft,
    Sweep,
}

impl TransformMode {
    /// All tool modes in toolbar order
    pub fn all() -> &'static [TransformMode] {
        &[
            TransformMode::Select,
            TransformMode::Move,
            TransformMode::Rotate,
            TransformMode::Scale,
            TransformMode::Align,
            TransformMode::MeasureDistance,
            TransformMode::MeasureAngle,
            TransformMode::MeasureArea,
            TransformMode::Extrude,
            TransformMode::Revolve,
            TransformMode::Loft,
            TransformMode::Sweep,
        ]
    }

    pub fn is_measurement(&self) -> bool {
        matches!(
            self,
            TransformMode::MeasureDistance | TransformMode::MeasureAngle | TransformMode::MeasureArea
        )
    }

    pub fn is_cad_operation(&self) -> bool {
        matches!(
            self,
            TransformMode::Extrude | TransformMode::Revolve | TransformMode::Loft | TransformMode::Sweep
        )
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index in a `[x, y, z]` vector
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Case-insensitive parse of `x`, `y` or `z`
    pub fn parse(name: &str) -> Option<Axis> {
        match name.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraType {
    #[default]
    Perspective,
    Orthographic,
}

/// Scene-level display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    pub background: String,
    pub grid_visible: bool,
    pub axes_visible: bool,
    pub wireframe: bool,
    pub camera_type: CameraType,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background: "#2a2a2a".to_string(),
            grid_visible: true,
            axes_visible: true,
            wireframe: false,
            camera_type: CameraType::Perspective,
        }
    }
}

/// Partial update of [`SceneSettings`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireframe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_type: Option<CameraType>,
}

impl SceneSettings {
    pub fn apply(&mut self, update: &SceneSettingsUpdate) {
        if let Some(background) = &update.background {
            self.background = background.clone();
        }
        if let Some(grid_visible) = update.grid_visible {
            self.grid_visible = grid_visible;
        }
        if let Some(axes_visible) = update.axes_visible {
            self.axes_visible = axes_visible;
        }
        if let Some(wireframe) = update.wireframe {
            self.wireframe = wireframe;
        }
        if let Some(camera_type) = update.camera_type {
            self.camera_type = camera_type;
        }
    }
}

/// Orbit camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: [f64; 3],
    pub target: [f64; 3],
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Partial update of [`CameraState`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<[f64; 3]>,
}

impl CameraState {
    pub fn apply(&mut self, update: &CameraUpdate) {
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(target) = update.target {
            self.target = target;
        }
    }
}

/// Serializable snapshot of the whole scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub objects: Vec<SceneObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<ObjectId>,
    #[serde(default)]
    pub transform_mode: TransformMode,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub camera: CameraState,
}

// ============================================================================
// Chat wire types
// ============================================================================

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single prompt message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: ChatRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Summary of the editor state sent along with a chat message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneContext {
    pub object_count: usize,
    pub object_types: Vec<ShapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_object: Option<ShapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ChallengeContext>,
}

/// Challenge the user is currently working on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeContext {
    pub id: ChallengeId,
    pub title: String,
    pub difficulty: String,
}

/// Chat request from the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<PromptMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SceneContext>,
}

/// Chat response, either from a provider or the local canned fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiChatResponse {
    pub content: String,
    pub provider: String,
    pub success: bool,
    pub response_time_ms: u64,
    #[serde(default)]
    pub tokens: u64,
    #[serde(default)]
    pub fallback_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_type_known_tags() {
        let shape: ShapeType = serde_json::from_str(r#""grip-handle""#).unwrap();
        assert_eq!(shape, ShapeType::GripHandle);
        assert_eq!(serde_json::to_string(&ShapeType::ButtonLarge).unwrap(), r#""button-large""#);
    }

    #[test]
    fn test_shape_type_unknown_tag_preserved() {
        let shape: ShapeType = serde_json::from_str(r#""gear""#).unwrap();
        assert_eq!(shape, ShapeType::Other("gear".into()));
        assert!(!shape.is_known());
        assert_eq!(shape.fallback_geometry(), ShapeType::Cube);
        assert_eq!(serde_json::to_string(&shape).unwrap(), r#""gear""#);
    }

    #[test]
    fn test_scene_object_defaults_from_json() {
        let json = r#"{"id": "a", "type": "cube"}"#;
        let obj: SceneObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.position, [0.0; 3]);
        assert_eq!(obj.rotation, [0.0; 3]);
        assert_eq!(obj.scale, [1.0; 3]);
        assert_eq!(obj.material.metalness, 0.1);
        assert_eq!(obj.material.roughness, 0.7);
        assert_eq!(obj.material.opacity, 1.0);
        assert!(!obj.material.transparent);
    }

    #[test]
    fn test_scene_object_type_field_name() {
        let obj = SceneObject::with_id("a", ShapeType::Sphere);
        let json = serde_json::to_string(&obj).unwrap();
        assert!(json.contains(r#""type":"sphere""#));
    }

    #[test]
    fn test_new_object_ids_are_unique() {
        let a = SceneObject::new(ShapeType::Cube);
        let b = SceneObject::new(ShapeType::Cube);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_object_update_shallow_merge() {
        let mut obj = SceneObject::with_id("a", ShapeType::Cube).at([1.0, 2.0, 3.0]);
        obj.apply(&ObjectUpdate::scale([2.0, 2.0, 2.0]));
        assert_eq!(obj.scale, [2.0, 2.0, 2.0]);
        assert_eq!(obj.position, [1.0, 2.0, 3.0]);

        obj.apply(&ObjectUpdate::material(Material::with_color("#0000ff")));
        assert_eq!(obj.material.color, "#0000ff");
        assert_eq!(obj.material.roughness, 0.7);
    }

    #[test]
    fn test_object_update_from_partial_json() {
        let update: ObjectUpdate = serde_json::from_str(r#"{"rotation": [0, 1.5, 0]}"#).unwrap();
        assert_eq!(update.rotation, Some([0.0, 1.5, 0.0]));
        assert!(update.position.is_none());
        assert!(!update.is_empty());
        assert!(ObjectUpdate::default().is_empty());
    }

    #[test]
    fn test_rotation_degrees() {
        let obj = SceneObject::with_id("a", ShapeType::Cube)
            .rotated([0.0, std::f64::consts::FRAC_PI_2, 0.0]);
        let deg = obj.rotation_degrees();
        assert!((deg[1] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_mode_serde() {
        let json = serde_json::to_string(&TransformMode::MeasureDistance).unwrap();
        assert_eq!(json, r#""measure-distance""#);
        let mode: TransformMode = serde_json::from_str(r#""sweep""#).unwrap();
        assert_eq!(mode, TransformMode::Sweep);
        assert_eq!(TransformMode::default(), TransformMode::Select);
        assert_eq!(TransformMode::all().len(), 12);
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!(Axis::parse("Y"), Some(Axis::Y));
        assert_eq!(Axis::parse(" z "), Some(Axis::Z));
        assert_eq!(Axis::parse("w"), None);
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Z.index(), 2);
    }

    #[test]
    fn test_scene_settings_partial_update() {
        let mut settings = SceneSettings::default();
        let update: SceneSettingsUpdate =
            serde_json::from_str(r#"{"wireframe": true, "cameraType": "orthographic"}"#).unwrap();
        settings.apply(&update);
        assert!(settings.wireframe);
        assert_eq!(settings.camera_type, CameraType::Orthographic);
        assert!(settings.grid_visible);
        assert_eq!(settings.background, "#2a2a2a");
    }

    #[test]
    fn test_camera_partial_update() {
        let mut camera = CameraState::default();
        camera.apply(&CameraUpdate {
            target: Some([1.0, 0.0, 0.0]),
            ..CameraUpdate::default()
        });
        assert_eq!(camera.position, [5.0, 5.0, 5.0]);
        assert_eq!(camera.target, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ai_chat_request_minimal() {
        let req: AiChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.conversation_history.is_empty());
        assert!(req.context.is_none());
    }

    #[test]
    fn test_prompt_message_role_serde() {
        let msg = PromptMessage::new(ChatRole::Assistant, "ok");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
