//! Authenticated transport against a throwaway axum server on loopback.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thesis_sync::adapters::network::ManualNetwork;
use thesis_sync::adapters::remote::{
    AuthenticatedTransport, HttpAuthRemote, HttpRemoteSource, TransportConfig,
};
use thesis_sync::adapters::storage::{InMemoryEntityCache, InMemoryKeyValueStore};
use thesis_sync::application::{
    AuthService, ConnectivityObserver, EntitySync, OfflineFirst, SessionGate, SessionStore,
    ThesisSynchronizer, UnauthorizedBroadcaster,
};
use thesis_sync::domain::foundation::{FetchResult, RemoteError, SyncError, ThesisId};
use thesis_sync::domain::session::LoginRequest;
use thesis_sync::domain::thesis::{Thesis, ThesisFilter};
use thesis_sync::ports::RemoteSource;

const TOKEN: &str = "tok-1";

// =============================================================================
// Fake API
// =============================================================================

#[derive(Default)]
struct ApiState {
    reject_credentials: AtomicBool,
    thesis_hits: AtomicUsize,
    login_saw_authorization: AtomicBool,
}

type Shared = Arc<ApiState>;

fn thesis_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Thesis {}", id),
        "abstract": "",
        "owner_id": "u-1",
        "status": "draft",
        "updated_at": "2024-05-01T12:00:00Z"
    })
}

fn authorized(state: &ApiState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", TOKEN);
    !state.reject_credentials.load(Ordering::SeqCst)
        && headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map_or(false, |v| v == expected)
}

async fn login(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    if headers.contains_key("authorization") {
        state.login_saw_authorization.store(true, Ordering::SeqCst);
    }
    Json(json!({
        "token": TOKEN,
        "user": {"id": "u-1", "email": "sam@uni.edu", "full_name": "Sam", "role": "student"}
    }))
}

async fn logout() -> StatusCode {
    StatusCode::UNAUTHORIZED
}

async fn list_theses(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.thesis_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([thesis_json("t-1"), thesis_json("t-2")])).into_response()
}

async fn get_thesis(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "t-1" => Json(thesis_json("t-1")).into_response(),
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "database unavailable"})),
        )
            .into_response(),
        "garbled" => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_api(state: Shared) -> String {
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/theses", get(list_theses))
        .route("/theses/:id", get(get_thesis))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// =============================================================================
// Client stack
// =============================================================================

struct Client {
    auth: AuthService,
    theses: ThesisSynchronizer,
    remote: Arc<HttpRemoteSource<Thesis>>,
    session: Arc<SessionStore>,
}

async fn client(base_url: String) -> Client {
    let session = Arc::new(SessionStore::new(Arc::new(InMemoryKeyValueStore::new())));
    let broadcaster = Arc::new(UnauthorizedBroadcaster::new(Arc::clone(&session)));
    let gate = Arc::new(SessionGate::new(Arc::clone(&session), Arc::clone(&broadcaster)));
    let transport = Arc::new(
        AuthenticatedTransport::new(
            TransportConfig::new(base_url).with_timeout(Duration::from_secs(5)),
            gate,
        )
        .unwrap(),
    );

    let network = Arc::new(ManualNetwork::new(true));
    let orchestrator = OfflineFirst::new(Arc::new(ConnectivityObserver::new(network)));
    let remote = Arc::new(HttpRemoteSource::<Thesis>::new(Arc::clone(&transport)));
    let entities: EntitySync<Thesis> = EntitySync::new(
        Arc::new(InMemoryEntityCache::<Thesis>::new()),
        remote.clone(),
        orchestrator.clone(),
    );

    Client {
        auth: AuthService::new(
            Arc::new(HttpAuthRemote::new(transport)),
            Arc::clone(&session),
            broadcaster,
            orchestrator,
        ),
        theses: ThesisSynchronizer::new(entities, Arc::clone(&session)),
        remote,
        session,
    }
}

async fn signed_in(state: &Shared) -> Client {
    let client = client(spawn_api(Arc::clone(state)).await).await;
    let login: Vec<_> = client
        .auth
        .login(LoginRequest::new("sam@uni.edu", "correct horse"))
        .collect()
        .await;
    assert!(login.last().unwrap().is_success(), "login failed: {:?}", login);
    client
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn login_is_sent_without_credential_and_stores_session() {
    let state = Shared::default();
    let client = signed_in(&state).await;

    assert!(!state.login_saw_authorization.load(Ordering::SeqCst));
    let active = client.session.active_credential().await.unwrap();
    assert_eq!(active.credential.expose(), TOKEN);
}

#[tokio::test]
async fn authorized_list_is_fetched_and_cached() {
    let state = Shared::default();
    let client = signed_in(&state).await;

    let emitted: Vec<_> = client.theses.observe(ThesisFilter::all()).collect().await;

    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[1].success().map(Vec::len), Some(2));
}

#[tokio::test]
async fn status_codes_are_classified() {
    let state = Shared::default();
    let client = signed_in(&state).await;

    let missing = client.remote.fetch_by_id(&ThesisId::new("nope").unwrap()).await;
    assert_eq!(missing.unwrap_err(), RemoteError::NotFound);

    let broken = client.remote.fetch_by_id(&ThesisId::new("broken").unwrap()).await;
    assert_eq!(
        broken.unwrap_err(),
        RemoteError::server(500, "database unavailable")
    );

    let garbled = client.remote.fetch_by_id(&ThesisId::new("garbled").unwrap()).await;
    assert!(matches!(garbled.unwrap_err(), RemoteError::Server { status: 200, .. }));
}

#[tokio::test]
async fn rejected_credential_broadcasts_once_and_later_calls_fail_fast() {
    let state = Shared::default();
    let client = signed_in(&state).await;
    let mut events = client.auth.subscribe_unauthorized();
    state.reject_credentials.store(true, Ordering::SeqCst);

    let (first, second) = tokio::join!(
        client.theses.observe(ThesisFilter::all()).collect::<Vec<_>>(),
        client
            .theses
            .observe_thesis(ThesisId::new("t-1").unwrap())
            .collect::<Vec<_>>(),
    );

    let rejected = Some(&SyncError::Remote(RemoteError::Unauthorized));
    assert_eq!(first.last().and_then(|r| r.error()), rejected);
    assert_eq!(second.last().and_then(|r| r.error()), rejected);
    assert!(client.session.active_credential().await.is_none());
    assert_eq!(client.session.current_user_snapshot(), None);

    assert!(events.next().await.is_some());
    let duplicate = tokio::time::timeout(Duration::from_millis(100), events.next()).await;
    assert!(duplicate.is_err(), "second unauthorized event was broadcast");

    let hits_before = state.thesis_hits.load(Ordering::SeqCst);
    let retry: Vec<_> = client.theses.observe(ThesisFilter::all()).collect().await;
    assert_eq!(
        retry.last(),
        Some(&FetchResult::Error(SyncError::Remote(RemoteError::Unauthorized)))
    );
    assert_eq!(state.thesis_hits.load(Ordering::SeqCst), hits_before);
}

#[tokio::test]
async fn subscriber_attached_after_rejection_still_sees_it() {
    let state = Shared::default();
    let client = signed_in(&state).await;
    state.reject_credentials.store(true, Ordering::SeqCst);

    let _: Vec<_> = client.theses.observe(ThesisFilter::all()).collect().await;

    let mut late = client.auth.subscribe_unauthorized();
    let event = tokio::time::timeout(Duration::from_millis(100), late.next()).await;
    assert!(matches!(event, Ok(Some(_))));
}

#[tokio::test]
async fn logout_rejection_does_not_broadcast() {
    let state = Shared::default();
    let client = signed_in(&state).await;
    let mut events = client.auth.subscribe_unauthorized();

    let logout: Vec<_> = client.auth.logout().collect().await;

    assert_eq!(logout.last(), Some(&FetchResult::Success(())));
    assert!(client.session.active_credential().await.is_none());
    let event = tokio::time::timeout(Duration::from_millis(100), events.next()).await;
    assert!(event.is_err());
}
