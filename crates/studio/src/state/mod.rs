pub mod chat;
pub mod scene;
pub mod settings;

use chat::ChatState;
pub use scene::{object_display_name, shape_display_name, shape_icon, short_id, SceneState};
pub use settings::{AppSettings, DimensionSettings, GridSettings, Theme};
use shared::{ChallengeContext, SceneContext};

use crate::challenge::ChallengeSession;
use crate::measure::MeasureSession;

/// Panel visibility flags
#[derive(Debug, Clone)]
pub struct PanelVisibility {
    pub scene_tree: bool,
    pub properties: bool,
    pub objectives: bool,
    pub chat: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            scene_tree: true,
            properties: true,
            objectives: true,
            chat: false,
        }
    }
}

/// Combined application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub scene: SceneState,
    pub chat: ChatState,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Active challenge, if the user is in challenge mode
    pub challenge: Option<ChallengeSession>,
    /// Points collected by the active measure tool
    pub measure: Option<MeasureSession>,
}

impl AppState {
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Summary of the editor state sent along with chat messages
    pub fn scene_context(&self) -> SceneContext {
        SceneContext {
            object_count: self.scene.object_count(),
            object_types: self.scene.objects().iter().map(|o| o.kind.clone()).collect(),
            selected_object: self.scene.selected_object().map(|o| o.kind.clone()),
            challenge: self.challenge.as_ref().map(|session| {
                let challenge = session.challenge();
                ChallengeContext {
                    id: challenge.id,
                    title: challenge.title.clone(),
                    difficulty: challenge.difficulty.clone(),
                }
            }),
        }
    }
}
