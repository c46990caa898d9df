//! Object CRUD operations

use shared::{new_object_id, ObjectId, ObjectUpdate, SceneObject};

use super::SceneState;

/// Offset applied to a duplicate so it does not overlap its source
pub const DUPLICATE_OFFSET: [f64; 3] = [1.0, 0.0, 1.0];

impl SceneState {
    /// Append an object. Ids are not de-duplicated; the caller supplies a unique one.
    pub fn add_object(&mut self, object: SceneObject) {
        self.save_undo();
        self.redo_stack.clear();

        tracing::debug!(id = %object.id, kind = %object.kind, "add object");
        self.objects.push(object);
        self.version += 1;
    }

    /// Remove every object with this id; clears the selection if it pointed at it
    pub fn remove_object(&mut self, id: &str) {
        if !self.contains(id) {
            return;
        }

        self.save_undo();
        self.redo_stack.clear();

        self.objects.retain(|o| o.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        tracing::debug!(id, "remove object");
        self.version += 1;
    }

    /// Shallow-merge `update` into every object with this id. Unknown ids and
    /// no-op updates leave the scene (and its history) untouched.
    pub fn update_object(&mut self, id: &str, update: &ObjectUpdate) {
        let changes = |object: &SceneObject| {
            let mut updated = object.clone();
            updated.apply(update);
            &updated != object
        };
        if !self.objects.iter().any(|o| o.id == id && changes(o)) {
            return;
        }

        self.save_undo();
        self.redo_stack.clear();

        for object in self.objects.iter_mut().filter(|o| o.id == id) {
            object.apply(update);
        }
        tracing::debug!(id, "update object");
        self.version += 1;
    }

    /// Remove every object and clear the selection
    pub fn clear_scene(&mut self) {
        if !self.objects.is_empty() {
            self.save_undo();
            self.redo_stack.clear();
        }
        self.objects.clear();
        self.selected = None;
        self.version += 1;
    }

    /// Reset everything, including tool mode, display settings and history
    pub fn new_scene(&mut self) {
        let version = self.version + 1;
        *self = SceneState::default();
        self.version = version;
    }

    /// Copy the selected object with a fresh id, offset by [`DUPLICATE_OFFSET`].
    /// The copy becomes the selection. Returns its id.
    pub fn duplicate_object(&mut self) -> Option<ObjectId> {
        let source = self.selected_object()?.clone();

        let mut copy = source;
        copy.id = new_object_id();
        for (axis, offset) in DUPLICATE_OFFSET.iter().enumerate() {
            copy.position[axis] += offset;
        }

        let id = copy.id.clone();
        self.add_object(copy);
        self.selected = Some(id.clone());
        Some(id)
    }

    /// Remove the selected object, if any
    pub fn delete_selected_object(&mut self) {
        if let Some(id) = self.selected_id().cloned() {
            self.remove_object(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Material, ShapeType};

    fn cube(id: &str) -> SceneObject {
        SceneObject::with_id(id, ShapeType::Cube)
    }

    #[test]
    fn test_add_objects_are_retrievable() {
        let mut s = SceneState::default();
        for i in 0..5 {
            s.add_object(cube(&format!("c{i}")));
        }
        assert_eq!(s.object_count(), 5);
        for i in 0..5 {
            assert!(s.get_object(&format!("c{i}")).is_some());
        }
    }

    #[test]
    fn test_add_does_not_select() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        assert!(s.selected_object().is_none());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut s = SceneState::default();
        s.add_object(cube("b"));
        s.add_object(cube("a"));
        let ids: Vec<_> = s.objects().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_add_does_not_deduplicate() {
        let mut s = SceneState::default();
        s.add_object(cube("same"));
        s.add_object(cube("same"));
        assert_eq!(s.object_count(), 2);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.add_object(cube("b"));
        s.remove_object("a");
        assert_eq!(s.object_count(), 1);
        let version = s.version();
        s.remove_object("a");
        assert_eq!(s.object_count(), 1);
        assert_eq!(s.version(), version);
    }

    #[test]
    fn test_duplicate_ids_removed_and_updated_together() {
        let mut s = SceneState::default();
        s.add_object(cube("same"));
        s.add_object(cube("other"));
        s.add_object(cube("same"));

        s.update_object("same", &ObjectUpdate::position([0.0, 2.0, 0.0]));
        let moved = s.objects().iter().filter(|o| o.position == [0.0, 2.0, 0.0]).count();
        assert_eq!(moved, 2);

        s.remove_object("same");
        assert_eq!(s.object_count(), 1);
        let version = s.version();
        s.remove_object("same");
        assert_eq!(s.object_count(), 1);
        assert_eq!(s.version(), version);

        // One undo step restores both copies
        s.undo();
        assert_eq!(s.object_count(), 3);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.select_object("a");
        s.remove_object("a");
        assert!(s.selected_object().is_none());
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.add_object(cube("b"));
        s.select_object("a");
        s.remove_object("b");
        assert!(s.is_selected("a"));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        let update = ObjectUpdate {
            scale: Some([2.0, 2.0, 2.0]),
            material: Some(Material::with_color("#0000ff")),
            ..ObjectUpdate::default()
        };
        s.update_object("a", &update);
        let once = s.objects().to_vec();
        let version = s.version();

        s.update_object("a", &update);
        assert_eq!(s.objects(), once.as_slice());
        assert_eq!(s.version(), version);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        let before = s.objects().to_vec();
        s.update_object("ghost", &ObjectUpdate::scale([3.0; 3]));
        assert_eq!(s.objects(), before.as_slice());
    }

    #[test]
    fn test_update_can_change_type() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.update_object(
            "a",
            &ObjectUpdate {
                kind: Some(ShapeType::Sphere),
                ..ObjectUpdate::default()
            },
        );
        assert_eq!(s.get_object("a").unwrap().kind, ShapeType::Sphere);
    }

    #[test]
    fn test_clear_scene() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.add_object(cube("b"));
        s.select_object("a");
        s.clear_scene();
        assert!(s.is_empty());
        assert!(s.selected_object().is_none());
    }

    #[test]
    fn test_duplicate_without_selection_is_noop() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        assert!(s.duplicate_object().is_none());
        assert_eq!(s.object_count(), 1);
        assert!(s.selected_object().is_none());
    }

    #[test]
    fn test_duplicate_offsets_and_selects_copy() {
        let mut s = SceneState::default();
        s.add_object(cube("a").at([1.0, 2.0, 3.0]).colored("#ff0000"));
        s.select_object("a");

        let new_id = s.duplicate_object().unwrap();
        assert_eq!(s.object_count(), 2);
        assert_ne!(new_id, "a");

        let copy = s.get_object(&new_id).unwrap();
        assert_eq!(copy.position, [2.0, 2.0, 4.0]);
        assert_eq!(copy.material.color, "#ff0000");
        assert_eq!(copy.kind, ShapeType::Cube);
        assert!(s.is_selected(&new_id));
    }

    #[test]
    fn test_delete_selected() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.add_object(cube("b"));
        s.select_object("b");
        s.delete_selected_object();
        assert_eq!(s.object_count(), 1);
        assert!(s.get_object("b").is_none());
        assert!(s.selected_object().is_none());
    }

    #[test]
    fn test_delete_selected_without_selection_is_noop() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.delete_selected_object();
        assert_eq!(s.object_count(), 1);
    }

    #[test]
    fn test_new_scene_resets_everything() {
        let mut s = SceneState::default();
        s.add_object(cube("a"));
        s.set_transform_mode(shared::TransformMode::Scale);
        s.update_scene_settings(&shared::SceneSettingsUpdate {
            wireframe: Some(true),
            ..Default::default()
        });
        let version = s.version();
        s.new_scene();
        assert!(s.is_empty());
        assert_eq!(s.transform_mode(), shared::TransformMode::Select);
        assert!(!s.settings().wireframe);
        assert!(!s.can_undo());
        assert!(s.version() > version);
    }
}
