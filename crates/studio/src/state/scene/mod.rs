//! Scene store
//!
//! Single source of truth for placed objects, the selection and the active
//! tool. Every mutation goes through a named operation on [`SceneState`];
//! operations on unknown ids are silent no-ops.

mod display;
mod history;
mod object_ops;
mod transform_ops;

pub use display::{object_display_name, shape_display_name, shape_icon, short_id};

use shared::{
    CameraState, ObjectId, SceneObject, SceneSettings, SceneSnapshot, ShapeType, TransformMode,
};

/// Maximum number of undo entries kept
const UNDO_LIMIT: usize = 100;

/// Scene state with objects, selection, tool mode and undo/redo history
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    /// Objects in insertion order
    pub(crate) objects: Vec<SceneObject>,
    /// Selected object, resolved against `objects` on every read
    pub(crate) selected: Option<ObjectId>,
    pub(crate) transform_mode: TransformMode,
    pub(crate) settings: SceneSettings,
    pub(crate) camera: CameraState,
    /// Undo stack - previous object collections
    pub(crate) undo_stack: Vec<Vec<SceneObject>>,
    /// Redo stack - undone object collections
    pub(crate) redo_stack: Vec<Vec<SceneObject>>,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All objects in insertion order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get an object by ID
    pub fn get_object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Get mutable object by ID
    pub(crate) fn get_object_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_object(id).is_some()
    }

    /// First object of the given type in collection order
    pub fn first_of_type(&self, kind: &ShapeType) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.kind == kind)
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.transform_mode
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    // ── Selection ─────────────────────────────────────────────

    /// ID of the selected object, if it still exists
    pub fn selected_id(&self) -> Option<&ObjectId> {
        self.selected.as_ref().filter(|id| self.contains(id))
    }

    /// The selected object, resolved from the authoritative collection
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.as_deref().and_then(|id| self.get_object(id))
    }

    /// Select an object by ID. Selecting an unknown ID deselects.
    pub fn select_object(&mut self, id: &str) {
        if self.contains(id) {
            self.selected = Some(id.to_string());
        } else {
            tracing::debug!(id, "select of unknown object, clearing selection");
            self.selected = None;
        }
        self.version += 1;
    }

    /// Clear the selection
    pub fn deselect_object(&mut self) {
        if self.selected.take().is_some() {
            self.version += 1;
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id().map(|s| s == id).unwrap_or(false)
    }

    /// Drop a selection that points at an object no longer in the collection
    pub(crate) fn prune_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.objects.iter().any(|o| &o.id == id) {
                self.selected = None;
            }
        }
    }

    // ── Snapshots ─────────────────────────────────────────────

    /// Serializable copy of the current scene
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.objects.clone(),
            selected_id: self.selected_id().cloned(),
            transform_mode: self.transform_mode,
            scene: self.settings.clone(),
            camera: self.camera.clone(),
        }
    }

    /// Replace the whole scene (clears undo/redo history)
    pub fn load_snapshot(&mut self, snapshot: SceneSnapshot) {
        self.objects = snapshot.objects;
        self.selected = snapshot.selected_id;
        self.transform_mode = snapshot.transform_mode;
        self.settings = snapshot.scene;
        self.camera = snapshot.camera;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.prune_selection();
        self.version += 1;
    }

    /// Save current objects to undo stack
    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(self.objects.clone());
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(id: &str) -> SceneObject {
        SceneObject::with_id(id, ShapeType::Cube)
    }

    #[test]
    fn test_empty_by_default() {
        let s = SceneState::default();
        assert!(s.is_empty());
        assert!(s.selected_object().is_none());
        assert_eq!(s.transform_mode(), TransformMode::Select);
        assert_eq!(s.settings().background, "#2a2a2a");
        assert_eq!(s.camera().position, [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_select_resolves_by_id() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.select_object("a");
        assert_eq!(s.selected_object().unwrap().id, "a");
        assert!(s.is_selected("a"));
    }

    #[test]
    fn test_select_unknown_deselects() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.select_object("a");
        s.select_object("ghost");
        assert!(s.selected_object().is_none());
        assert!(s.selected_id().is_none());
    }

    #[test]
    fn test_deselect() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.select_object("a");
        s.deselect_object();
        assert!(s.selected_object().is_none());
    }

    #[test]
    fn test_selection_tracks_updates() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.select_object("a");
        s.update_object("a", &shared::ObjectUpdate::position([3.0, 0.0, 0.0]));
        assert_eq!(s.selected_object().unwrap().position, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_first_of_type_uses_collection_order() {
        let mut s = SceneState::default();
        s.add_object(SceneObject::with_id("s", ShapeType::Sphere));
        s.add_object(cube("c1"));
        s.add_object(cube("c2"));
        assert_eq!(s.first_of_type(&ShapeType::Cube).unwrap().id, "c1");
        assert!(s.first_of_type(&ShapeType::Torus).is_none());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.select_object("a");
        s.set_transform_mode(TransformMode::Rotate);

        let snap = s.snapshot();
        let json = serde_json::to_string(&snap).unwrap();

        let mut s2 = SceneState::default();
        s2.load_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(s2.object_count(), 1);
        assert_eq!(s2.selected_id().map(String::as_str), Some("a"));
        assert_eq!(s2.transform_mode(), TransformMode::Rotate);
        assert!(!s2.can_undo());
    }

    #[test]
    fn test_load_snapshot_drops_dangling_selection() {
        let mut s = SceneState::default();
        s.load_snapshot(SceneSnapshot {
            objects: vec![cube("a")],
            selected_id: Some("missing".into()),
            ..SceneSnapshot::default()
        });
        assert!(s.selected_id().is_none());
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let mut s = SceneState::default();
        for i in 0..(UNDO_LIMIT + 20) {
            s.add_object(cube(&format!("c{i}")));
        }
        assert_eq!(s.undo_stack.len(), UNDO_LIMIT);
    }
}
