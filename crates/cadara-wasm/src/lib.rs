//! Browser binding: the scene store and challenge validator behind a JSON API.

use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

use cadara_studio::challenge::{check_progress, ChallengeCatalog, ChallengeSession};
use cadara_studio::state::SceneState;
use shared::{
    CameraUpdate, Challenge, ObjectUpdate, SceneObject, SceneSettingsUpdate, SceneSnapshot,
    TransformMode,
};

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {e}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {e}"))
}

fn parse_mode(mode: &str) -> Result<TransformMode, String> {
    serde_json::from_value(serde_json::Value::String(mode.to_string()))
        .map_err(|e| format!("Unknown transform mode {mode:?}: {e}"))
}

fn js_err(e: String) -> JsError {
    JsError::new(&e)
}

fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Validate a scene against a challenge, both given as JSON
fn progress_json(objects_json: &str, challenge_json: &str) -> Result<String, String> {
    let objects: Vec<SceneObject> = from_json(objects_json)?;
    let challenge: Challenge = from_json(challenge_json)?;
    to_json(&check_progress(&objects, &challenge))
}

/// Scene store handle owned by JavaScript
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmScene {
    scene: SceneState,
    session: Option<ChallengeSession>,
}

#[wasm_bindgen]
impl WasmScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmScene {
        WasmScene::default()
    }

    /// Changes on every mutation; lets the UI skip redundant redraws
    pub fn version(&self) -> f64 {
        self.scene.version() as f64
    }

    /// Add a new shape at the origin and return its id
    pub fn create_shape(&mut self, kind: &str) -> String {
        let object = SceneObject::new(kind);
        let id = object.id.clone();
        self.scene.add_object(object);
        id
    }

    /// Add a fully specified object (JSON) and return its id
    pub fn add_object(&mut self, object_json: &str) -> Result<String, JsError> {
        let object: SceneObject = from_json(object_json).map_err(js_err)?;
        let id = object.id.clone();
        self.scene.add_object(object);
        Ok(id)
    }

    pub fn remove_object(&mut self, id: &str) {
        self.scene.remove_object(id);
    }

    /// Apply a partial update (JSON) to an object
    pub fn update_object(&mut self, id: &str, update_json: &str) -> Result<(), JsError> {
        let update: ObjectUpdate = from_json(update_json).map_err(js_err)?;
        self.scene.update_object(id, &update);
        Ok(())
    }

    pub fn select_object(&mut self, id: &str) {
        self.scene.select_object(id);
    }

    pub fn deselect_object(&mut self) {
        self.scene.deselect_object();
    }

    pub fn selected_id(&self) -> Option<String> {
        self.scene.selected_id().cloned()
    }

    /// Set the tool by its wire name, e.g. `"measure-distance"`
    pub fn set_transform_mode(&mut self, mode: &str) -> Result<(), JsError> {
        let mode = parse_mode(mode).map_err(js_err)?;
        self.scene.set_transform_mode(mode);
        Ok(())
    }

    /// Merge a partial settings object (JSON) into the scene settings
    pub fn update_scene_settings(&mut self, update_json: &str) -> Result<(), JsError> {
        let update: SceneSettingsUpdate = from_json(update_json).map_err(js_err)?;
        self.scene.update_scene_settings(&update);
        Ok(())
    }

    /// Merge a partial camera object (JSON) into the camera state
    pub fn update_camera(&mut self, update_json: &str) -> Result<(), JsError> {
        let update: CameraUpdate = from_json(update_json).map_err(js_err)?;
        self.scene.update_camera(&update);
        Ok(())
    }

    /// Scene settings (background, grid, axes, wireframe, projection) as JSON
    pub fn scene_settings(&self) -> Result<String, JsError> {
        to_json(self.scene.settings()).map_err(js_err)
    }

    pub fn camera(&self) -> Result<String, JsError> {
        to_json(self.scene.camera()).map_err(js_err)
    }

    pub fn duplicate_object(&mut self) -> Option<String> {
        self.scene.duplicate_object()
    }

    pub fn delete_selected(&mut self) {
        self.scene.delete_selected_object();
    }

    pub fn undo(&mut self) -> bool {
        let can = self.scene.can_undo();
        self.scene.undo();
        can
    }

    pub fn redo(&mut self) -> bool {
        let can = self.scene.can_redo();
        self.scene.redo();
        can
    }

    pub fn clear_scene(&mut self) {
        self.scene.clear_scene();
    }

    pub fn new_scene(&mut self) {
        self.scene.new_scene();
        self.session = None;
    }

    /// Whole scene as JSON
    pub fn snapshot(&self) -> Result<String, JsError> {
        to_json(&self.scene.snapshot()).map_err(js_err)
    }

    /// Replace the scene with a JSON snapshot
    pub fn load_snapshot(&mut self, snapshot_json: &str) -> Result<(), JsError> {
        let snapshot: SceneSnapshot = from_json(snapshot_json).map_err(js_err)?;
        log(&format!("Loaded scene ({} objects)", snapshot.objects.len()));
        self.scene.load_snapshot(snapshot);
        Ok(())
    }

    /// Validate the current scene against a challenge (JSON); returns the report JSON
    pub fn check_progress(&self, challenge_json: &str) -> Result<String, JsError> {
        let challenge: Challenge = from_json(challenge_json).map_err(js_err)?;
        to_json(&check_progress(self.scene.objects(), &challenge)).map_err(js_err)
    }

    /// Start a challenge session (JSON challenge); timing uses `Date.now()`
    pub fn start_challenge(&mut self, challenge_json: &str) -> Result<(), JsError> {
        let challenge: Challenge = from_json(challenge_json).map_err(js_err)?;
        log(&format!("Challenge started: {}", challenge.title));
        self.session = Some(ChallengeSession::new(challenge, js_sys::Date::now() as u64));
        Ok(())
    }

    /// Re-validate the active session. Returns `{ report, completion }` JSON,
    /// where `completion` is set only the first time the challenge completes.
    pub fn evaluate_challenge(&mut self) -> Result<String, JsError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| JsError::new("No active challenge"))?;
        let completion = session.evaluate(self.scene.objects(), js_sys::Date::now() as u64);
        let result = serde_json::json!({
            "report": session.report(),
            "completion": completion,
        });
        Ok(result.to_string())
    }

    /// Hint for the first incomplete objective of the active session
    pub fn hint(&mut self) -> Option<String> {
        self.session
            .as_mut()
            .and_then(|session| session.next_hint().map(str::to_string))
    }
}

/// Built-in challenges and categories as JSON
#[wasm_bindgen]
pub fn builtin_challenges() -> Result<String, JsError> {
    let catalog = ChallengeCatalog::builtin();
    let value = serde_json::json!({
        "challenges": catalog.all(),
        "categories": catalog.categories,
    });
    Ok(value.to_string())
}

/// Stateless validation: objects array JSON and challenge JSON in, report JSON out
#[wasm_bindgen]
pub fn validate_scene(objects_json: &str, challenge_json: &str) -> Result<String, JsError> {
    progress_json(objects_json, challenge_json).map_err(js_err)
}
