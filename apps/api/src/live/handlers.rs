//! Server-Sent Event endpoints for live queries.
//!
//! Each connection owns one `Subscription`. The stream sends a `state` event
//! with the current `QueryState` straight away, another after every change to
//! the watched collection, and a `notification` event whenever a background
//! write fails. Closing the connection drops the subscription.

use std::convert::Infallible;

use axum::{
    extract::State,
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::applications::grouping::GroupingKey;
use crate::applications::handlers::admin_groups;
use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::live::{subscribe, Collection, FeedEvent, Notification, QueryState, Subscription};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LiveApplicationsQuery {
    pub opportunity_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LiveAdminQuery {
    #[serde(default)]
    pub group_by: GroupingKey,
}

fn state_event<T: Serialize>(state: &QueryState<T>) -> Event {
    Event::default()
        .event("state")
        .json_data(state)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

fn notification_event(notification: &Notification) -> Event {
    Event::default()
        .event("notification")
        .json_data(notification)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// Turns a subscription plus the raw feed into an SSE event stream.
fn event_stream<T>(
    mut subscription: Subscription<T>,
    notifications: broadcast::Receiver<FeedEvent>,
) -> impl Stream<Item = Result<Event, Infallible>>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    let first = subscription.current();
    stream::unfold(
        (subscription, notifications, Some(first)),
        |(mut subscription, mut notifications, pending)| async move {
            if let Some(state) = pending {
                let event = state_event(&state);
                return Some((Ok(event), (subscription, notifications, None)));
            }
            loop {
                tokio::select! {
                    next = subscription.changed() => {
                        let state = next?;
                        let event = state_event(&state);
                        return Some((Ok(event), (subscription, notifications, None)));
                    }
                    received = notifications.recv() => match received {
                        Ok(FeedEvent::Notification(n)) => {
                            let event = notification_event(&n);
                            return Some((Ok(event), (subscription, notifications, None)));
                        }
                        Ok(FeedEvent::Changed { .. }) | Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => return None,
                    },
                }
            }
        },
    )
}

/// GET /api/v1/live/opportunities
pub async fn handle_live_opportunities(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let store = state.store.clone();
    let subscription = subscribe(&state.feed, Collection::Opportunities, move || {
        let store = store.clone();
        async move { store.list_opportunities().await }
    });
    Sse::new(event_stream(subscription, state.feed.subscribe())).keep_alive(KeepAlive::default())
}

/// GET /api/v1/live/applications?opportunity_id=
///
/// Without `opportunity_id` this streams every application, so it needs the
/// admin capability like the admin listing does.
pub async fn handle_live_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<LiveApplicationsQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let opportunity_id = query.opportunity_id;
    if opportunity_id.is_none() {
        state.admin.authorize(&headers)?;
    }
    let store = state.store.clone();
    let subscription = subscribe(&state.feed, Collection::Applications, move || {
        let store = store.clone();
        async move {
            match opportunity_id {
                Some(id) => store.applications_for_opportunity(id).await,
                None => store.list_applications().await,
            }
        }
    });
    Ok(Sse::new(event_stream(subscription, state.feed.subscribe())).keep_alive(KeepAlive::default()))
}

/// GET /api/v1/live/admin/applications?group_by=opportunity|title
pub async fn handle_live_admin_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<LiveAdminQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    state.admin.authorize(&headers)?;
    let store = state.store.clone();
    let key = query.group_by;
    let subscription = subscribe(&state.feed, Collection::Applications, move || {
        let store = store.clone();
        async move {
            store
                .list_applications()
                .await
                .map(|applications| admin_groups(applications, key))
        }
    });
    Ok(Sse::new(event_stream(subscription, state.feed.subscribe())).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{Body, BodyDataStream},
        http::{Request, StatusCode},
    };
    use futures::StreamExt;
    use tower::ServiceExt;

    use super::*;
    use crate::admin::{AdminPolicy, ADMIN_TOKEN_HEADER};
    use crate::applications::workflow::apply_status_update;
    use crate::describe::testing::StubGenerator;
    use crate::models::ApplicationStatus;
    use crate::routes::build_router;
    use crate::store::MemoryStore;

    fn test_state(admin: AdminPolicy) -> AppState {
        AppState::for_tests(
            Arc::new(MemoryStore::new()),
            Arc::new(StubGenerator::new("s", "l")),
            admin,
        )
    }

    /// Reads SSE frames until `needle` shows up, returning everything read so far.
    async fn read_until(body: &mut BodyDataStream, needle: &str) -> String {
        let mut seen = String::new();
        while !seen.contains(needle) {
            let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
                .await
                .unwrap_or_else(|_| panic!("no `{needle}` in stream, got: {seen}"))
                .expect("stream ended")
                .unwrap();
            seen.push_str(&String::from_utf8_lossy(&chunk));
        }
        seen
    }

    #[tokio::test]
    async fn test_live_applications_streams_state_then_failure_notifications() {
        let state = test_state(AdminPolicy::Open);
        let store = state.store.clone();
        let feed = state.feed.clone();

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/live/applications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut body = response.into_body().into_data_stream();

        let initial = read_until(&mut body, r#""state":"data""#).await;
        assert!(initial.contains("event: state"));

        let missing = Uuid::new_v4();
        let result = apply_status_update(store, feed, missing, ApplicationStatus::Approved).await;
        assert!(result.is_err());

        let frames = read_until(&mut body, r#""kind":"status_update_failed""#).await;
        assert!(frames.contains("event: notification"));
        assert!(frames.contains(&missing.to_string()));
    }

    #[tokio::test]
    async fn test_unfiltered_live_applications_require_admin_token() {
        let app = build_router(test_state(AdminPolicy::Token("tok".to_string())));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/live/applications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/live/applications")
                    .header(ADMIN_TOKEN_HEADER, "tok")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let uri = format!("/api/v1/live/applications?opportunity_id={}", Uuid::new_v4());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
