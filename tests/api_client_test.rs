//! Tests for the REST client against an in-process stub backend.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use connections::{
    ApiClient, ApiErrorKind, HttpPuzzleSource, HttpStatsReporter, JwtClaimsDecoder,
    OutcomeReport, PuzzleId, PuzzleSource, StatsReporter, UserContext,
};

/// One recorded `POST /games/{id}/play`.
#[derive(Debug, Clone)]
struct Play {
    id: String,
    body: Value,
    authorization: Option<String>,
}

#[derive(Clone, Default)]
struct Stub {
    games: Arc<Vec<Value>>,
    plays: Arc<Mutex<Vec<Play>>>,
}

async fn list_games(State(stub): State<Stub>) -> Json<Vec<Value>> {
    Json(stub.games.as_ref().clone())
}

async fn get_game(
    State(stub): State<Stub>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    stub.games
        .iter()
        .find(|g| g["_id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn record_play(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    stub.plays
        .lock()
        .expect("plays lock")
        .push(Play {
            id,
            body,
            authorization,
        });
    Json(json!({ "message": "Play recorded" }))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbage() -> &'static str {
    "definitely not json"
}

/// Starts the stub and returns its `/api` base URL.
async fn spawn_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/api/games", get(list_games))
        .route("/api/games/{id}", get(get_game))
        .route("/api/games/{id}/play", post(record_play))
        .route("/broken/games", get(broken))
        .route("/garbage/games", get(garbage))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().expect("Stub has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });
    format!("http://{}/api", addr)
}

fn category(name: &str, words: [&str; 4]) -> Value {
    json!({ "name": name, "words": words })
}

fn basics() -> Value {
    json!({
        "_id": "p1",
        "name": "Basics",
        "createdBy": { "_id": "u1", "username": "ada" },
        "difficulty": "Easy",
        "tags": ["kids"],
        "category1": category("FRUIT", ["Apple", "Banana", "Cherry", "Date"]),
        "category2": category("ANIMAL", ["Dog", "Cat", "Bird", "Fish"]),
        "category3": category("COLOR", ["Red", "Blue", "Green", "Yellow"]),
        "category4": category("TOOL", ["Hammer", "Saw", "Drill", "Wrench"]),
    })
}

fn legacy() -> Value {
    // Older backends spell the list `word` and leave createdBy unpopulated.
    json!({
        "_id": "p2",
        "name": "Legacy",
        "createdBy": "u2",
        "category1": { "name": "A", "word": ["a1", "a2", "a3", "a4"] },
        "category2": { "name": "B", "word": ["b1", "b2", "b3", "b4"] },
        "category3": { "name": "C", "word": ["c1", "c2", "c3", "c4"] },
        "category4": { "name": "D", "word": ["d1", "d2", "d3", "d4"] },
    })
}

fn three_words() -> Value {
    json!({
        "_id": "bad",
        "name": "Short",
        "category1": { "name": "A", "words": ["a1", "a2", "a3"] },
        "category2": category("B", ["b1", "b2", "b3", "b4"]),
        "category3": category("C", ["c1", "c2", "c3", "c4"]),
        "category4": category("D", ["d1", "d2", "d3", "d4"]),
    })
}

fn stub_with(games: Vec<Value>) -> Stub {
    Stub {
        games: Arc::new(games),
        plays: Arc::default(),
    }
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5)).expect("Failed to build client")
}

fn token_for(username: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "userID": "u1", "username": username, "isAdmin": false }).to_string(),
    );
    format!("{}.{}.signature", header, payload)
}

#[tokio::test]
async fn test_list_games_skips_malformed_entries() {
    let base = spawn_stub(stub_with(vec![basics(), three_words(), legacy()])).await;

    let puzzles = client(&base).list_games().await.expect("List failed");

    let ids: Vec<&str> = puzzles.iter().map(|p| p.id().as_str()).collect();
    assert_eq!(ids, ["p1", "p2"]);
}

#[tokio::test]
async fn test_get_game_maps_wire_fields() {
    let base = spawn_stub(stub_with(vec![basics()])).await;

    let puzzle = client(&base)
        .get_game(&PuzzleId::new("p1"))
        .await
        .expect("Get failed");

    assert_eq!(puzzle.name(), "Basics");
    assert_eq!(
        puzzle.created_by().as_ref().map(|c| c.username().as_str()),
        Some("ada")
    );
    assert_eq!(puzzle.difficulty().as_deref(), Some("Easy"));
    assert!(puzzle.has_tag("kids"));
    assert_eq!(puzzle.categories()[0].name(), "FRUIT");
    assert_eq!(puzzle.categories()[3].words()[3], "Wrench");
}

#[tokio::test]
async fn test_get_game_accepts_legacy_word_field() {
    let base = spawn_stub(stub_with(vec![legacy()])).await;

    let puzzle = client(&base)
        .get_game(&PuzzleId::new("p2"))
        .await
        .expect("Get failed");

    assert_eq!(puzzle.categories()[1].words()[0], "b1");
    assert!(puzzle.created_by().is_none());
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let base = spawn_stub(stub_with(vec![basics()])).await;

    let err = client(&base)
        .get_game(&PuzzleId::new("nope"))
        .await
        .expect_err("Expected not found");

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Puzzle not found");
}

#[tokio::test]
async fn test_wrong_word_count_is_invalid_puzzle() {
    let base = spawn_stub(stub_with(vec![three_words()])).await;

    let err = client(&base)
        .get_game(&PuzzleId::new("bad"))
        .await
        .expect_err("Expected invalid puzzle");

    assert_eq!(err.kind, ApiErrorKind::InvalidPuzzle);
}

#[tokio::test]
async fn test_server_error_status() {
    let base = spawn_stub(Stub::default()).await;
    let base = base.replace("/api", "/broken");

    let err = client(&base).list_games().await.expect_err("Expected HTTP error");

    assert_eq!(err.kind, ApiErrorKind::Http { status: 500 });
}

#[tokio::test]
async fn test_garbage_body_is_decode_error() {
    let base = spawn_stub(Stub::default()).await;
    let base = base.replace("/api", "/garbage");

    let err = client(&base).list_games().await.expect_err("Expected decode error");

    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No address");
    drop(listener);

    let err = client(&format!("http://{}/api", addr))
        .list_games()
        .await
        .expect_err("Expected network error");

    assert_eq!(err.kind, ApiErrorKind::Network);
}

#[tokio::test]
async fn test_report_play_posts_outcome_with_bearer_token() {
    let stub = stub_with(vec![basics()]);
    let plays = Arc::clone(&stub.plays);
    let base = spawn_stub(stub).await;

    let token = token_for("ada");
    let user = UserContext::login(token.clone(), &JwtClaimsDecoder).expect("Token decodes");
    let reporter = HttpStatsReporter::new(client(&base).with_user(&user));

    reporter
        .report(&OutcomeReport {
            puzzle_id: PuzzleId::new("p1"),
            won: true,
        })
        .await
        .expect("Report failed");

    let plays = plays.lock().expect("plays lock").clone();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].id, "p1");
    assert_eq!(plays[0].body, json!({ "won": true }));
    assert_eq!(plays[0].authorization, Some(format!("Bearer {}", token)));
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_token() {
    let stub = stub_with(vec![basics()]);
    let plays = Arc::clone(&stub.plays);
    let base = spawn_stub(stub).await;

    client(&base)
        .with_user(&UserContext::anonymous())
        .report_play(&PuzzleId::new("p1"), false)
        .await
        .expect("Report failed");

    let plays = plays.lock().expect("plays lock").clone();
    assert_eq!(plays[0].body, json!({ "won": false }));
    assert!(plays[0].authorization.is_none());
}

#[tokio::test]
async fn test_random_source_picks_from_list() {
    let base = spawn_stub(stub_with(vec![basics(), legacy()])).await;
    let source = HttpPuzzleSource::new(client(&base));

    for _ in 0..10 {
        let puzzle = source.random().await.expect("Random failed");
        assert!(["p1", "p2"].contains(&puzzle.id().as_str()));
    }
}

#[tokio::test]
async fn test_random_source_with_no_puzzles() {
    let base = spawn_stub(stub_with(vec![three_words()])).await;
    let source = HttpPuzzleSource::new(client(&base));

    let err = source.random().await.expect_err("Expected no puzzles");

    assert_eq!(err.kind, ApiErrorKind::NoPuzzles);
    assert_eq!(err.user_message(), "No puzzles available");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let base = spawn_stub(stub_with(vec![basics()])).await;

    let client = client(&format!("{}/", base));

    assert_eq!(client.base_url(), base);
    assert_eq!(client.list_games().await.expect("List failed").len(), 1);
}
