//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps the application state, the challenge catalog and a clock so tests
//! and the command protocol can drive the editor without a UI.

use std::time::Instant;

use shared::{
    Challenge, ChallengeId, CompletionEvent, ObjectId, ObjectUpdate, ProgressReport, SceneObject,
    SceneSnapshot, ShapeType, TransformMode,
};

use crate::challenge::{ChallengeCatalog, ChallengeSession};
use crate::measure::{MeasureSession, Measurement};
use crate::state::{AppSettings, AppState, SceneState};

/// Time source for challenge sessions
#[derive(Debug, Clone)]
pub enum Clock {
    /// Milliseconds advanced explicitly by the caller
    Manual(u64),
    /// Wall clock measured from harness creation
    System(Instant),
}

impl Clock {
    pub fn now_ms(&self) -> u64 {
        match self {
            Clock::Manual(ms) => *ms,
            Clock::System(start) => u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Headless harness: app state, catalog, clock and completion log
pub struct TestHarness {
    pub state: AppState,
    pub catalog: ChallengeCatalog,
    clock: Clock,
    completions: Vec<CompletionEvent>,
    shapes_created: usize,
}

impl TestHarness {
    /// Empty scene, built-in challenges, manual clock at 0
    pub fn new() -> Self {
        Self::with_catalog(ChallengeCatalog::builtin())
    }

    pub fn with_catalog(catalog: ChallengeCatalog) -> Self {
        Self {
            state: AppState::default(),
            catalog,
            clock: Clock::Manual(0),
            completions: Vec::new(),
            shapes_created: 0,
        }
    }

    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.state.settings = settings;
        self
    }

    /// Use the wall clock instead of the manual one
    pub fn with_system_clock(mut self) -> Self {
        self.clock = Clock::System(Instant::now());
        self
    }

    pub fn scene(&self) -> &SceneState {
        &self.state.scene
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Advance a manual clock; no effect on the system clock
    pub fn advance_clock(&mut self, ms: u64) {
        if let Clock::Manual(now) = &mut self.clock {
            *now += ms;
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Create a shape at the origin with the next palette color and return its ID
    pub fn create_shape(&mut self, kind: ShapeType) -> ObjectId {
        let object = self.palette_object(kind);
        self.add(object)
    }

    /// New object at the origin with the next palette color, not yet added
    pub fn palette_object(&mut self, kind: ShapeType) -> SceneObject {
        let color = self.state.settings.shape_color(self.shapes_created);
        self.shapes_created += 1;
        SceneObject::new(kind).colored(color)
    }

    pub fn create_cube(&mut self) -> ObjectId {
        self.create_shape(ShapeType::Cube)
    }

    pub fn create_sphere(&mut self) -> ObjectId {
        self.create_shape(ShapeType::Sphere)
    }

    pub fn create_cylinder(&mut self) -> ObjectId {
        self.create_shape(ShapeType::Cylinder)
    }

    /// Add a fully specified object
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id.clone();
        self.state.scene.add_object(object);
        id
    }

    pub fn select(&mut self, id: &str) {
        self.state.scene.select_object(id);
    }

    pub fn deselect(&mut self) {
        self.state.scene.deselect_object();
    }

    pub fn update(&mut self, id: &str, update: &ObjectUpdate) {
        self.state.scene.update_object(id, update);
    }

    pub fn delete(&mut self, id: &str) {
        self.state.scene.remove_object(id);
    }

    pub fn duplicate(&mut self) -> Option<ObjectId> {
        self.state.scene.duplicate_object()
    }

    /// Switch tool; entering a measure tool starts a fresh measure session
    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.state.scene.set_transform_mode(mode);
        self.state.measure = MeasureSession::for_mode(mode);
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        if self.state.scene.can_undo() {
            self.state.scene.undo();
            true
        } else {
            false
        }
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        if self.state.scene.can_redo() {
            self.state.scene.redo();
            true
        } else {
            false
        }
    }

    /// Clear the entire scene
    pub fn clear(&mut self) {
        self.state.scene.clear_scene();
        if let Some(measure) = &mut self.state.measure {
            measure.reset();
        }
    }

    /// Load a scene (replaces current)
    pub fn load_scene(&mut self, snapshot: SceneSnapshot) {
        let mode = snapshot.transform_mode;
        self.state.scene.load_snapshot(snapshot);
        self.state.measure = MeasureSession::for_mode(mode);
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let snapshot: SceneSnapshot =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.load_scene(snapshot);
        Ok(())
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.state.scene.snapshot())
            .map_err(|e| format!("Failed to serialize scene: {e}"))
    }

    pub fn object_count(&self) -> usize {
        self.state.scene.object_count()
    }

    // ── Measurement ───────────────────────────────────────────

    /// Feed a picked point to the active measure tool
    pub fn measure_point(&mut self, point: [f64; 3]) -> Result<Option<Measurement>, String> {
        let session = self
            .state
            .measure
            .as_mut()
            .ok_or("No measure tool active")?;
        Ok(session.add_point(point))
    }

    /// Close the polygon of the area tool
    pub fn measure_close(&mut self) -> Result<Option<Measurement>, String> {
        let session = self
            .state
            .measure
            .as_mut()
            .ok_or("No measure tool active")?;
        Ok(session.close())
    }

    // ── Challenges ────────────────────────────────────────────

    /// Start a challenge from the catalog
    pub fn start_challenge(&mut self, id: ChallengeId) -> Result<(), String> {
        let challenge = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| format!("Unknown challenge: {id}"))?;
        self.start_challenge_with(challenge);
        Ok(())
    }

    /// Start an arbitrary challenge
    pub fn start_challenge_with(&mut self, challenge: Challenge) {
        tracing::info!(challenge = challenge.id, title = %challenge.title, "challenge started");
        self.state.challenge = Some(ChallengeSession::new(challenge, self.clock.now_ms()));
    }

    pub fn exit_challenge(&mut self) {
        self.state.challenge = None;
    }

    /// Re-validate the active challenge against the scene.
    /// A completion event is logged the first time it completes.
    pub fn check_progress(&mut self) -> Option<ProgressReport> {
        let now = self.clock.now_ms();
        let session = self.state.challenge.as_mut()?;
        if let Some(event) = session.evaluate(self.state.scene.objects(), now) {
            self.completions.push(event);
        }
        Some(session.report().clone())
    }

    /// Hint for the first incomplete objective of the active challenge
    pub fn hint(&mut self) -> Option<String> {
        self.state
            .challenge
            .as_mut()
            .and_then(|session| session.next_hint().map(str::to_string))
    }

    /// Completion events fired so far, oldest first
    pub fn completions(&self) -> &[CompletionEvent] {
        &self.completions
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.object_count(), 0);
        assert!(!h.catalog.is_empty());
        assert_eq!(h.now_ms(), 0);
    }

    #[test]
    fn test_create_shapes_cycle_palette() {
        let mut h = TestHarness::new();
        let a = h.create_cube();
        let b = h.create_sphere();
        assert_ne!(a, b);
        assert_eq!(h.object_count(), 2);
        assert_eq!(h.scene().get_object(&a).unwrap().material.color, "#6366f1");
        assert_eq!(h.scene().get_object(&b).unwrap().material.color, "#10b981");
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut h = TestHarness::new();
        h.create_cube();
        assert!(h.undo());
        assert_eq!(h.object_count(), 0);
        assert!(h.redo());
        assert_eq!(h.object_count(), 1);
        assert!(!h.redo());
    }

    #[test]
    fn test_load_export_json() {
        let mut h = TestHarness::new();
        h.create_cube();
        let json = h.export_scene_json().unwrap();

        let mut h2 = TestHarness::new();
        h2.load_scene_json(&json).unwrap();
        assert_eq!(h2.object_count(), 1);
        assert!(h2.load_scene_json("{").is_err());
    }

    #[test]
    fn test_measure_requires_tool() {
        let mut h = TestHarness::new();
        assert!(h.measure_point([0.0; 3]).is_err());
        h.set_transform_mode(TransformMode::MeasureDistance);
        assert!(h.measure_point([0.0; 3]).unwrap().is_none());
        assert!(h.measure_point([1.0, 0.0, 0.0]).unwrap().is_some());
        h.set_transform_mode(TransformMode::Select);
        assert!(h.state.measure.is_none());
    }

    #[test]
    fn test_challenge_completion_logged_once() {
        let mut h = TestHarness::new();
        h.start_challenge(1).unwrap();
        h.advance_clock(2_000);
        h.add(crate::fixtures::solved_blue_cube());

        let report = h.check_progress().unwrap();
        assert!(report.is_complete);
        h.check_progress();
        assert_eq!(h.completions().len(), 1);
        assert_eq!(h.completions()[0].completion_time, 2_000);
    }

    #[test]
    fn test_unknown_challenge() {
        let mut h = TestHarness::new();
        assert!(h.start_challenge(999).is_err());
        assert!(h.check_progress().is_none());
        assert!(h.hint().is_none());
    }
}
