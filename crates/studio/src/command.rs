//! JSON command protocol for driving the scene store headlessly.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{
    Axis, CameraUpdate, Challenge, ChallengeId, ObjectUpdate, SceneSettingsUpdate,
    SceneSnapshot, ShapeType, TransformMode,
};

use crate::align::Alignment;
use crate::challenge::check_progress;
use crate::harness::TestHarness;
use crate::state::object_display_name;

/// A command the agent can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Add a shape. Omitted id gets a fresh one; omitted color comes from the palette.
    AddObject {
        #[serde(rename = "type")]
        kind: ShapeType,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        position: Option<[f64; 3]>,
        #[serde(default)]
        rotation: Option<[f64; 3]>,
        #[serde(default)]
        scale: Option<[f64; 3]>,
        #[serde(default)]
        color: Option<String>,
    },
    RemoveObject {
        id: String,
    },
    SelectObject {
        id: String,
    },
    DeselectObject,
    UpdateObject {
        id: String,
        #[serde(flatten)]
        update: ObjectUpdate,
    },
    SetTransformMode {
        mode: TransformMode,
    },
    UpdateSceneSettings {
        #[serde(flatten)]
        update: SceneSettingsUpdate,
    },
    UpdateCamera {
        #[serde(flatten)]
        update: CameraUpdate,
    },
    ClearScene,
    NewScene,
    DuplicateObject,
    DeleteSelected,
    /// Move an object by a delta as one undo step
    Translate {
        id: String,
        delta: [f64; 3],
    },
    Align {
        ids: Vec<String>,
        axis: Axis,
        #[serde(default)]
        alignment: Alignment,
    },
    Distribute {
        ids: Vec<String>,
        axis: Axis,
        spacing: f64,
    },
    SnapToGrid {
        id: String,
        /// Defaults to the grid size from settings
        #[serde(default)]
        grid: Option<f64>,
    },
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Inspect the scene: list all objects.
    Inspect,
    /// Export the scene as JSON.
    ExportScene,
    /// Replace the scene with a snapshot.
    LoadScene {
        scene: SceneSnapshot,
    },
    /// Feed a point to the active measure tool.
    MeasurePoint {
        point: [f64; 3],
    },
    /// Close the area polygon of the measure tool.
    MeasureClose,
    StartChallenge {
        id: ChallengeId,
    },
    /// Check the scene against a catalog challenge, an inline challenge,
    /// or (with neither) the active challenge session.
    CheckProgress {
        #[serde(default)]
        challenge_id: Option<ChallengeId>,
        #[serde(default)]
        challenge: Option<Box<Challenge>>,
    },
    Hint,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result(result: Result<serde_json::Value, String>) -> Self {
        match result {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(e),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::AddObject {
            kind,
            id,
            position,
            rotation,
            scale,
            color,
        } => {
            let mut object = harness.palette_object(kind);
            if let Some(id) = id {
                object.id = id;
            }
            object.apply(&ObjectUpdate {
                kind: None,
                position,
                rotation,
                scale,
                material: None,
            });
            if let Some(color) = color {
                object.material.color = color;
            }
            let id = harness.add(object);
            CommandResponse::ok_with_data(json!({ "id": id }))
        }

        AgentCommand::RemoveObject { id } => {
            let existed = harness.scene().contains(&id);
            harness.delete(&id);
            CommandResponse::ok_with_data(json!({ "removed": existed }))
        }

        AgentCommand::SelectObject { id } => {
            harness.select(&id);
            CommandResponse::ok_with_data(json!({ "selected": harness.scene().selected_id() }))
        }

        AgentCommand::DeselectObject => {
            harness.deselect();
            CommandResponse::ok()
        }

        AgentCommand::UpdateObject { id, update } => {
            if !harness.scene().contains(&id) {
                return CommandResponse::ok_with_data(json!({ "updated": false }));
            }
            harness.update(&id, &update);
            CommandResponse::ok_with_data(json!({ "updated": true }))
        }

        AgentCommand::SetTransformMode { mode } => {
            harness.set_transform_mode(mode);
            CommandResponse::ok_with_data(json!({ "mode": mode }))
        }

        AgentCommand::UpdateSceneSettings { update } => {
            harness.state.scene.update_scene_settings(&update);
            CommandResponse::ok_with_data(json!({ "scene": harness.scene().settings() }))
        }

        AgentCommand::UpdateCamera { update } => {
            harness.state.scene.update_camera(&update);
            CommandResponse::ok_with_data(json!({ "camera": harness.scene().camera() }))
        }

        AgentCommand::ClearScene => {
            harness.clear();
            CommandResponse::ok()
        }

        AgentCommand::NewScene => {
            harness.state.scene.new_scene();
            harness.state.measure = None;
            CommandResponse::ok()
        }

        AgentCommand::DuplicateObject => match harness.duplicate() {
            Some(id) => CommandResponse::ok_with_data(json!({ "id": id })),
            None => CommandResponse::err("No object selected"),
        },

        AgentCommand::DeleteSelected => {
            let selected = harness.scene().selected_id().cloned();
            harness.state.scene.delete_selected_object();
            CommandResponse::ok_with_data(json!({ "removed": selected }))
        }

        AgentCommand::Translate { id, delta } => {
            if !harness.scene().contains(&id) {
                return CommandResponse::err(format!("Unknown object: {id}"));
            }
            harness.state.scene.begin_drag();
            harness.state.scene.apply_translate_delta(&id, delta);
            let position = harness.scene().get_object(&id).map(|o| o.position);
            CommandResponse::ok_with_data(json!({ "position": position }))
        }

        AgentCommand::Align {
            ids,
            axis,
            alignment,
        } => {
            harness.state.scene.align_objects(&ids, axis, alignment);
            CommandResponse::ok()
        }

        AgentCommand::Distribute { ids, axis, spacing } => {
            harness.state.scene.distribute_objects(&ids, axis, spacing);
            CommandResponse::ok()
        }

        AgentCommand::SnapToGrid { id, grid } => {
            let grid = grid.unwrap_or(harness.state.settings.grid.size);
            harness.state.scene.snap_object_to_grid(&id, grid);
            let position = harness.scene().get_object(&id).map(|o| o.position);
            CommandResponse::ok_with_data(json!({ "position": position }))
        }

        AgentCommand::Undo => {
            let success = harness.undo();
            CommandResponse::ok_with_data(json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = harness.redo();
            CommandResponse::ok_with_data(json!({ "redone": success }))
        }

        AgentCommand::Inspect => {
            let scene = harness.scene();
            let objects: Vec<serde_json::Value> = scene
                .objects()
                .iter()
                .map(|object| {
                    json!({
                        "id": object.id,
                        "name": object_display_name(object),
                        "type": object.kind,
                        "position": object.position,
                        "rotation_degrees": object.rotation_degrees(),
                        "scale": object.scale,
                        "color": object.material.color,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(json!({
                "object_count": objects.len(),
                "objects": objects,
                "selected": scene.selected_id(),
                "transform_mode": scene.transform_mode(),
                "can_undo": scene.can_undo(),
                "can_redo": scene.can_redo(),
            }))
        }

        AgentCommand::ExportScene => CommandResponse::from_result(
            harness
                .export_scene_json()
                .map(|scene_json| json!({ "scene_json": scene_json })),
        ),

        AgentCommand::LoadScene { scene } => {
            harness.load_scene(scene);
            CommandResponse::ok_with_data(json!({ "object_count": harness.object_count() }))
        }

        AgentCommand::MeasurePoint { point } => CommandResponse::from_result(
            harness
                .measure_point(point)
                .map(|measurement| json!({ "measurement": measurement })),
        ),

        AgentCommand::MeasureClose => CommandResponse::from_result(
            harness
                .measure_close()
                .map(|measurement| json!({ "measurement": measurement })),
        ),

        AgentCommand::StartChallenge { id } => match harness.start_challenge(id) {
            Ok(()) => CommandResponse::ok_with_data(json!({ "challenge_id": id })),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::CheckProgress {
            challenge_id,
            challenge,
        } => check_progress_command(harness, challenge_id, challenge.map(|c| *c)),

        AgentCommand::Hint => match harness.hint() {
            Some(hint) => CommandResponse::ok_with_data(json!({ "hint": hint })),
            None => CommandResponse::ok_with_data(json!({ "hint": null })),
        },
    }
}

fn check_progress_command(
    harness: &mut TestHarness,
    challenge_id: Option<ChallengeId>,
    challenge: Option<Challenge>,
) -> CommandResponse {
    let report = match (challenge, challenge_id) {
        (Some(challenge), _) => check_progress(harness.scene().objects(), &challenge),
        (None, Some(id)) => match harness.catalog.get(id) {
            Some(challenge) => check_progress(harness.scene().objects(), challenge),
            None => return CommandResponse::err(format!("Unknown challenge: {id}")),
        },
        (None, None) => match harness.check_progress() {
            Some(report) => report,
            None => return CommandResponse::err("No active challenge"),
        },
    };
    CommandResponse::ok_with_data(json!({ "report": report }))
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"command": "undo"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Undo));
    }

    #[test]
    fn test_command_serde_add_object() {
        let json = r#"{"command": "add_object", "type": "grip-handle", "position": [1, 0, 0]}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::AddObject { kind, position, id, .. } => {
                assert_eq!(kind, ShapeType::GripHandle);
                assert_eq!(position, Some([1.0, 0.0, 0.0]));
                assert!(id.is_none());
            }
            _ => panic!("Expected AddObject"),
        }
    }

    #[test]
    fn test_command_serde_update_object_flattened() {
        let json = r#"{"command": "update_object", "id": "a", "scale": [2, 2, 2]}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::UpdateObject { id, update } => {
                assert_eq!(id, "a");
                assert_eq!(update.scale, Some([2.0, 2.0, 2.0]));
                assert!(update.position.is_none());
            }
            _ => panic!("Expected UpdateObject"),
        }
    }

    #[test]
    fn test_command_serde_transform_mode() {
        let json = r#"{"command": "set_transform_mode", "mode": "measure-angle"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            AgentCommand::SetTransformMode {
                mode: TransformMode::MeasureAngle
            }
        ));
    }

    #[test]
    fn test_execute_add_object() {
        let mut h = TestHarness::new();
        let json = r##"{"command": "add_object", "type": "cube", "id": "c1", "scale": [2, 2, 2], "color": "#0000ff"}"##;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["id"], "c1");

        let cube = h.scene().get_object("c1").unwrap();
        assert_eq!(cube.scale, [2.0, 2.0, 2.0]);
        assert_eq!(cube.material.color, "#0000ff");
        assert_eq!(cube.material.roughness, 0.7);
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = TestHarness::new();
        h.create_cube();
        h.create_sphere();

        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["object_count"], 2);
        assert_eq!(data["objects"][1]["type"], "sphere");
        assert_eq!(data["transform_mode"], "select");
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut h = TestHarness::new();
        h.create_cube();

        let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["undone"], true);
        assert_eq!(h.object_count(), 0);

        let resp = execute_json(&mut h, r#"{"command": "redo"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["redone"], true);
        assert_eq!(h.object_count(), 1);
    }

    #[test]
    fn test_execute_duplicate_without_selection() {
        let mut h = TestHarness::new();
        h.create_cube();
        let resp = execute_json(&mut h, r#"{"command": "duplicate_object"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(h.object_count(), 1);
    }

    #[test]
    fn test_execute_export_scene() {
        let mut h = TestHarness::new();
        h.create_cube();

        let resp = execute_json(&mut h, r#"{"command": "export_scene"}"#).unwrap();
        let data = resp.data.unwrap();
        let scene_json = data["scene_json"].as_str().unwrap();
        assert!(scene_json.contains("objects"));
        assert!(scene_json.contains("\"type\": \"cube\""));
    }

    #[test]
    fn test_execute_check_progress_inline() {
        let mut h = TestHarness::new();
        h.add(crate::fixtures::cube("c"));
        let challenge = serde_json::to_value(crate::fixtures::blue_cube_challenge()).unwrap();
        let cmd = json!({ "command": "check_progress", "challenge": challenge }).to_string();

        let resp = execute_json(&mut h, &cmd).unwrap();
        let report = &resp.data.unwrap()["report"];
        assert_eq!(report["completed"], 1);
        assert_eq!(report["total"], 4);
    }

    #[test]
    fn test_execute_check_progress_unknown() {
        let mut h = TestHarness::new();
        let resp =
            execute_json(&mut h, r#"{"command": "check_progress", "challenge_id": 404}"#).unwrap();
        assert!(!resp.success);
        let resp = execute_json(&mut h, r#"{"command": "check_progress"}"#).unwrap();
        assert_eq!(resp.error.as_deref(), Some("No active challenge"));
    }

    #[test]
    fn test_execute_measure_without_tool() {
        let mut h = TestHarness::new();
        let resp =
            execute_json(&mut h, r#"{"command": "measure_point", "point": [0, 0, 0]}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        assert!(execute_json(&mut h, "not valid json").is_err());
        assert!(execute_json(&mut h, r#"{"command": "explode"}"#).is_err());
    }
}
