//! Event endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use eventsched_core::{Event, EventInput};
use serde::{Deserialize, Serialize};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/events", get(list_events).post(create_event))
}

/// Request body for creating an event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurring_days: Option<Vec<String>>,
}

impl From<CreateEventRequest> for EventInput {
    fn from(req: CreateEventRequest) -> Self {
        EventInput {
            name: req.title,
            start: req.start,
            end: req.end,
            is_recurring: req.is_recurring.unwrap_or(false),
            recurring_days: req.recurring_days.unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/events - List all events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let service = state.events.clone();
    let events = tokio::task::spawn_blocking(move || service.list()).await??;
    Ok(Json(events))
}

/// POST /api/events - Create an event, rejecting overlapping one-time events
async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(req) = payload?;
    let service = state.events.clone();
    tokio::task::spawn_blocking(move || service.create(req.into())).await??;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Event created successfully".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::app;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use eventsched_core::{EventStore, OverlapScope};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::with_store(
            EventStore::in_memory().unwrap(),
            OverlapScope::All,
        ))
    }

    async fn read_json(resp: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn post_raw(app: &Router, content_type: Option<&str>, body: String) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::POST).uri("/api/events");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let resp = app
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        (status, read_json(resp).await)
    }

    async fn post(app: &Router, body: Value) -> (StatusCode, Value) {
        post_raw(app, Some("application/json"), body.to_string()).await
    }

    async fn list(app: &Router) -> Vec<Value> {
        let req = Request::builder()
            .uri("/api/events")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        match read_json(resp).await {
            Value::Array(events) => events,
            other => panic!("Expected array, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_standup_sync_lunch() {
        let app = test_app();

        let (status, body) = post(
            &app,
            json!({"title": "Standup", "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"message": "Event created successfully"}));

        let (status, body) = post(
            &app,
            json!({"title": "Sync", "start": "2024-01-01T09:15:00Z", "end": "2024-01-01T09:45:00Z"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"error": "Event overlaps with an existing event"}));

        let (status, _) = post(
            &app,
            json!({"title": "Lunch", "start": "2024-01-01T12:00:00Z", "end": "2024-01-01T13:00:00Z"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let names: Vec<_> = list(&app)
            .await
            .into_iter()
            .map(|e| e["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Standup", "Lunch"]);
    }

    #[tokio::test]
    async fn test_list_round_trips_fields() {
        let app = test_app();
        let (status, _) = post(
            &app,
            json!({
                "title": "Gym",
                "start": "2024-01-02T18:00:00Z",
                "end": "2024-01-02T19:00:00Z",
                "isRecurring": true,
                "recurringDays": ["Tuesday", "Thursday"],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = post(
            &app,
            json!({"title": "Standup", "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let events = list(&app).await;
        assert_eq!(events.len(), 2);

        let gym = &events[0];
        assert!(gym["id"].is_i64());
        assert_eq!(gym["name"], "Gym");
        assert_eq!(gym["start_time"], "2024-01-02T18:00:00Z");
        assert_eq!(gym["end_time"], "2024-01-02T19:00:00Z");
        assert_eq!(gym["is_recurring"], true);
        assert_eq!(gym["days_of_week"], json!(["Tuesday", "Thursday"]));

        let standup = &events[1];
        assert_ne!(standup["id"], gym["id"]);
        assert_eq!(standup["start_time"], "2024-01-01T09:00:00Z");
        assert_eq!(standup["end_time"], "2024-01-01T09:30:00Z");
        assert_eq!(standup["is_recurring"], false);
        assert_eq!(standup["days_of_week"], json!([]));
    }

    #[tokio::test]
    async fn test_list_empty() {
        assert!(list(&test_app()).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let app = test_app();
        let bodies = [
            json!({"title": "", "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z"}),
            json!({"start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z"}),
            json!({"title": "Standup", "end": "2024-01-01T09:30:00Z"}),
            json!({"title": "Standup", "start": "2024-01-01T09:00:00Z"}),
            json!({"title": "Standup", "start": "9am", "end": "2024-01-01T09:30:00Z"}),
            json!({"title": "Standup", "start": "2024-01-01T09:00:00Z", "end": "half past"}),
            json!({"title": 42, "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z"}),
            json!({"title": "Standup", "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z", "isRecurring": "yes"}),
        ];

        for body in bodies {
            let (status, response) = post(&app, body.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(response, json!({"error": "Invalid input"}));
        }
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = test_app();

        let (status, body) = post_raw(&app, Some("application/json"), "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid input"}));

        let (status, body) = post_raw(
            &app,
            None,
            json!({"title": "Standup", "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:30:00Z"})
                .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid input"}));
    }

    #[tokio::test]
    async fn test_recurring_events_always_accepted() {
        let app = test_app();
        let event = json!({
            "title": "Standup",
            "start": "2024-01-01T09:00:00Z",
            "end": "2024-01-01T09:30:00Z",
        });
        assert_eq!(post(&app, event).await.0, StatusCode::CREATED);

        for _ in 0..2 {
            let (status, _) = post(
                &app,
                json!({
                    "title": "Daily",
                    "start": "2024-01-01T09:00:00Z",
                    "end": "2024-01-01T09:30:00Z",
                    "isRecurring": true,
                    "recurringDays": ["Monday"],
                }),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        assert_eq!(list(&app).await.len(), 3);
    }

    #[tokio::test]
    async fn test_optional_fields_may_be_null() {
        let app = test_app();
        let (status, _) = post(
            &app,
            json!({
                "title": "Standup",
                "start": "2024-01-01T09:00:00Z",
                "end": "2024-01-01T09:30:00Z",
                "isRecurring": null,
                "recurringDays": null,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(list(&app).await[0]["is_recurring"], false);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = test_app();
        let req = Request::builder()
            .uri("/api/events")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let req = Request::builder()
            .uri("/api/nothing")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
