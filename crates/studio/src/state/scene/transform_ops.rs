//! Tool mode, display settings and transform/drag operations

use shared::{Axis, CameraUpdate, SceneSettingsUpdate, TransformMode};

use super::SceneState;
use crate::align::{self, Alignment};

impl SceneState {
    /// Switch the active tool. Any transition is allowed.
    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        if self.transform_mode != mode {
            tracing::debug!(?mode, "transform mode");
            self.transform_mode = mode;
            self.version += 1;
        }
    }

    pub fn update_scene_settings(&mut self, update: &SceneSettingsUpdate) {
        self.settings.apply(update);
        self.version += 1;
    }

    pub fn update_camera(&mut self, update: &CameraUpdate) {
        self.camera.apply(update);
        self.version += 1;
    }

    /// Save undo state once at the beginning of a drag operation
    pub fn begin_drag(&mut self) {
        self.save_undo();
        self.redo_stack.clear();
        self.version += 1;
    }

    /// Apply a translation delta to an object's position.
    /// Call [`Self::begin_drag`] first so the whole drag is one undo step.
    pub fn apply_translate_delta(&mut self, id: &str, delta: [f64; 3]) {
        if let Some(object) = self.get_object_mut(id) {
            for (axis, d) in delta.iter().enumerate() {
                object.position[axis] += d;
            }
            self.version += 1;
        }
    }

    /// Align the given objects on one axis. Unknown ids are skipped.
    pub fn align_objects(&mut self, ids: &[String], axis: Axis, alignment: Alignment) {
        self.rewrite_positions(ids, |positions| {
            align::align_positions(positions, axis, alignment)
        });
    }

    /// Space the given objects `spacing` apart along one axis, in current order on that axis
    pub fn distribute_objects(&mut self, ids: &[String], axis: Axis, spacing: f64) {
        self.rewrite_positions(ids, |positions| {
            align::distribute_positions(positions, axis, spacing)
        });
    }

    /// Snap an object's position to the grid
    pub fn snap_object_to_grid(&mut self, id: &str, grid: f64) {
        let Some(object) = self.get_object(id) else {
            return;
        };
        let snapped = align::snap_to_grid(object.position, grid);
        if snapped == object.position {
            return;
        }
        self.save_undo();
        self.redo_stack.clear();
        if let Some(object) = self.get_object_mut(id) {
            object.position = snapped;
        }
        self.version += 1;
    }

    fn rewrite_positions(
        &mut self,
        ids: &[String],
        f: impl FnOnce(&[[f64; 3]]) -> Vec<[f64; 3]>,
    ) {
        let known: Vec<&String> = ids.iter().filter(|id| self.contains(id)).collect();
        let positions: Vec<[f64; 3]> = known
            .iter()
            .filter_map(|id| self.get_object(id).map(|o| o.position))
            .collect();
        let updated = f(&positions);
        if updated == positions {
            return;
        }

        self.save_undo();
        self.redo_stack.clear();
        let changes: Vec<(String, [f64; 3])> = known
            .into_iter()
            .cloned()
            .zip(updated)
            .collect();
        for (id, position) in changes {
            if let Some(object) = self.get_object_mut(&id) {
                object.position = position;
            }
        }
        self.version += 1;
    }
}
