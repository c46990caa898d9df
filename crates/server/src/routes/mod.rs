use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use cadara_studio::challenge::{check_progress, CategoryInfo};
use cadara_studio::chat::{ProviderKind, ProviderStatus};
use cadara_studio::tracking::{Notification, ProgressStats, UserProgress};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{AiChatRequest, AiChatResponse, Challenge, ChallengeId, ProgressReport, SceneObject};

use crate::AppState;

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// AI chat endpoint. Provider failures still answer 200 with the canned reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<AiChatRequest>,
) -> Result<Json<AiChatResponse>, StatusCode> {
    if request.message.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let response = state
        .chat
        .send_message(
            &request.message,
            &request.conversation_history,
            request.context.as_ref(),
        )
        .await;
    if let Some(e) = &response.error {
        tracing::warn!(provider = %response.provider, "Chat degraded: {e}");
    }
    Ok(Json(response))
}

/// Probe every configured chat provider
pub async fn chat_status(
    State(state): State<AppState>,
) -> Json<BTreeMap<ProviderKind, ProviderStatus>> {
    Json(state.chat.provider_status().await)
}

#[derive(Debug, Serialize)]
pub struct ChallengeList {
    pub challenges: Vec<Challenge>,
    pub categories: BTreeMap<String, CategoryInfo>,
}

pub async fn list_challenges(State(state): State<AppState>) -> Json<ChallengeList> {
    Json(ChallengeList {
        challenges: state.catalog.all().to_vec(),
        categories: state.catalog.categories.clone(),
    })
}

pub async fn get_challenge(
    State(state): State<AppState>,
    Path(id): Path<ChallengeId>,
) -> Result<Json<Challenge>, StatusCode> {
    state
        .catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub objects: Vec<SceneObject>,
}

/// Validate a submitted scene against one challenge
pub async fn check_challenge(
    State(state): State<AppState>,
    Path(id): Path<ChallengeId>,
    Json(body): Json<CheckRequest>,
) -> Result<Json<ProgressReport>, StatusCode> {
    let challenge = state.catalog.get(id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(check_progress(&body.objects, challenge)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progress: UserProgress,
    pub stats: ProgressStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

impl ProgressResponse {
    fn new(progress: &UserProgress, notifications: Vec<Notification>) -> Self {
        Self {
            progress: progress.clone(),
            stats: progress.stats(),
            notifications,
        }
    }
}

/// Progress of a user; unknown users get an empty record
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Json<ProgressResponse> {
    let progress = state.progress.read().await;
    let response = match progress.get(&user) {
        Some(record) => ProgressResponse::new(record, Vec::new()),
        None => ProgressResponse::new(&UserProgress::new(user), Vec::new()),
    };
    Json(response)
}

pub async fn complete_challenge(
    State(state): State<AppState>,
    Path((user, id)): Path<(String, ChallengeId)>,
) -> Result<Json<ProgressResponse>, StatusCode> {
    let challenge = state.catalog.get(id).ok_or_else(|| {
        tracing::error!("Completion for unknown challenge {id}");
        StatusCode::NOT_FOUND
    })?;

    let mut progress = state.progress.write().await;
    let record = progress
        .entry(user.clone())
        .or_insert_with(|| UserProgress::new(user));
    let notifications = record.complete_challenge(id, &challenge.title);
    Ok(Json(ProgressResponse::new(record, notifications)))
}

pub async fn complete_tutorial(
    State(state): State<AppState>,
    Path((user, id)): Path<(String, String)>,
) -> Json<ProgressResponse> {
    let mut progress = state.progress.write().await;
    let record = progress
        .entry(user.clone())
        .or_insert_with(|| UserProgress::new(user));
    let notifications = record.complete_tutorial(&id, &id);
    Json(ProgressResponse::new(record, notifications))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use cadara_studio::challenge::ChallengeCatalog;
    use cadara_studio::chat::{ChatConfig, ChatService, HttpBackend};
    use cadara_studio::fixtures;
    use tokio::sync::RwLock;

    use super::*;

    fn state() -> AppState {
        AppState {
            chat: Arc::new(ChatService::new(ChatConfig::default(), HttpBackend::new())),
            catalog: Arc::new(ChallengeCatalog::builtin()),
            progress: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[tokio::test]
    async fn test_get_challenge() {
        let Json(challenge) = get_challenge(State(state()), Path(1)).await.unwrap();
        assert_eq!(challenge.title, "Blue Cube");

        let err = get_challenge(State(state()), Path(999)).await.unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_challenge() {
        let body = CheckRequest {
            objects: vec![fixtures::solved_blue_cube()],
        };
        let Json(report) = check_challenge(State(state()), Path(1), Json(body))
            .await
            .unwrap();
        assert!(report.is_complete);
    }

    #[tokio::test]
    async fn test_progress_tracking() {
        let state = state();
        let Json(response) =
            complete_challenge(State(state.clone()), Path(("ana".to_string(), 1)))
                .await
                .unwrap();
        assert_eq!(response.stats.total_xp, 100);
        assert_eq!(response.notifications.len(), 1);

        // Repeat completions earn nothing
        let Json(response) =
            complete_challenge(State(state.clone()), Path(("ana".to_string(), 1)))
                .await
                .unwrap();
        assert!(response.notifications.is_empty());

        let Json(response) = get_progress(State(state), Path("ana".to_string())).await;
        assert_eq!(response.progress.completed_challenges, vec![1]);
    }

    #[tokio::test]
    async fn test_empty_chat_message_rejected() {
        let request = AiChatRequest {
            message: "   ".to_string(),
            conversation_history: Vec::new(),
            context: None,
        };
        let err = chat(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }
}
