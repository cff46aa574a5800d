//! REST endpoints driving onboarding flows.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::catalog::{AVATARS, Avatar, GOALS, Goal};
use super::details::DetailsSchema;
use super::flow::{FlowAction, SessionSnapshot};
use super::manager::OnboardingManager;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

#[derive(Serialize)]
struct CatalogResponse {
    goals: &'static [Goal],
    avatars: &'static [Avatar],
    details: Vec<&'static DetailsSchema>,
}

#[derive(Serialize)]
struct ActionResponse {
    applied: bool,
    session: SessionSnapshot,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "No such onboarding session"})),
    )
        .into_response()
}

/// GET /api/onboarding/catalog
async fn get_catalog() -> impl IntoResponse {
    Json(CatalogResponse {
        goals: &GOALS,
        avatars: &AVATARS,
        details: GOALS.iter().map(|g| g.kind.schema()).collect(),
    })
}

/// POST /api/onboarding/sessions
async fn create_session(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let flow = state.manager.create().await;
    (StatusCode::CREATED, Json(flow.snapshot().await))
}

/// GET /api/onboarding/sessions/{id}
async fn get_session(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.manager.get(id).await {
        Some(flow) => Json(flow.snapshot().await).into_response(),
        None => not_found(),
    }
}

/// POST /api/onboarding/sessions/{id}/actions
///
/// Applies one action. Blocked actions are not errors: the response reports
/// `applied: false` alongside the unchanged session.
async fn apply_action(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FlowAction>, JsonRejection>,
) -> Response {
    let Some(flow) = state.manager.get(id).await else {
        return not_found();
    };
    let action = match payload {
        Ok(Json(action)) => action,
        Err(rejection) => {
            debug!(session_id = %id, error = %rejection, "Rejected onboarding action");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid onboarding action"})),
            )
                .into_response();
        }
    };

    let applied = flow.apply(&action).await;
    Json(ActionResponse {
        applied,
        session: flow.snapshot().await,
    })
    .into_response()
}

/// DELETE /api/onboarding/sessions/{id}
async fn discard_session(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    if state.manager.discard(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/catalog", get(get_catalog))
        .route("/api/onboarding/sessions", post(create_session))
        .route(
            "/api/onboarding/sessions/{id}",
            get(get_session).delete(discard_session),
        )
        .route("/api/onboarding/sessions/{id}/actions", post(apply_action))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::OnboardingConfig;

    fn app() -> Router {
        onboarding_routes(OnboardingRouteState {
            manager: OnboardingManager::new(OnboardingConfig {
                practice_seconds: 300,
                tick_period: Duration::from_secs(1),
                ..OnboardingConfig::default()
            }),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn catalog_lists_goals_avatars_and_schemas() {
        let (status, json) = send(&app(), "GET", "/api/onboarding/catalog", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["goals"].as_array().unwrap().len(), 4);
        assert_eq!(json["avatars"].as_array().unwrap().len(), 5);
        assert_eq!(json["details"][1]["level"]["key"], "examType");
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let app = app();
        let (status, created) = send(&app, "POST", "/api/onboarding/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["step"], "name");
        assert_eq!(created["countdown"], "5:00");
        let id = created["id"].as_str().unwrap().to_string();
        let actions = format!("/api/onboarding/sessions/{id}/actions");

        let (_, json) = send(&app, "POST", &actions, Some(serde_json::json!({"type": "advance"}))).await;
        assert_eq!(json["applied"], false);
        assert_eq!(json["session"]["step"], "name");

        send(&app, "POST", &actions, Some(serde_json::json!({"type": "set_name", "name": "Amy"}))).await;
        let (status, json) = send(&app, "POST", &actions, Some(serde_json::json!({"type": "advance"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["applied"], true);
        assert_eq!(json["session"]["step"], "goal");
        assert_eq!(json["session"]["user_name"], "Amy");

        let session_uri = format!("/api/onboarding/sessions/{id}");
        let (status, json) = send(&app, "GET", &session_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["step"], "goal");

        let (status, _) = send(&app, "DELETE", &session_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &session_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_action_is_bad_request() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/onboarding/sessions", None).await;
        let id = created["id"].as_str().unwrap();
        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/onboarding/sessions/{id}/actions"),
            Some(serde_json::json!({"type": "teleport"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid onboarding action");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = app();
        let uri = format!("/api/onboarding/sessions/{}/actions", Uuid::new_v4());
        let (status, _) = send(&app, "POST", &uri, Some(serde_json::json!({"type": "advance"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
