//! Tests for the REST surface, driving the router directly.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use companion_games::{GameRepository, GameService, MIGRATIONS, router};

fn setup_app() -> (NamedTempFile, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    (db_file, router(GameService::new(repo)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Request build failed"),
        )
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body read failed");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Request build failed"),
        )
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body read failed");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn list_games_returns_catalog() {
    let (_db, app) = setup_app();
    let (status, body) = get(&app, "/games").await;
    assert_eq!(status, StatusCode::OK);
    let games = body.as_array().expect("array body");
    assert_eq!(games.len(), 3);
    assert_eq!(games[0]["id"], "word_chain");
    assert_eq!(games[0]["name"], "成语接龙");
    assert_eq!(games[2]["type"], "logic");
}

#[tokio::test]
async fn get_game_found_and_not_found() {
    let (_db, app) = setup_app();

    let (status, body) = get(&app, "/games/trivia").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "知识问答");

    let (status, body) = get(&app, "/games/poker").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_session_is_idempotent() {
    let (_db, app) = setup_app();
    let payload = json!({"game_id": "word_chain", "owner_id": "comp-1"});

    let (status, first) = post(&app, "/games/sessions", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["game_id"], "word_chain");
    assert_eq!(first["owner_id"], "comp-1");
    assert_eq!(first["is_active"], true);
    assert_eq!(first["state"]["current_word"], Value::Null);

    let (status, second) = post(&app, "/games/sessions", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn create_session_unknown_game_is_404() {
    let (_db, app) = setup_app();
    let (status, body) = post(
        &app,
        "/games/sessions",
        json!({"game_id": "poker", "owner_id": "comp-1"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn word_chain_round_trip_over_http() {
    let (_db, app) = setup_app();
    let (_, session) = post(
        &app,
        "/games/sessions",
        json!({"game_id": "word_chain", "owner_id": "comp-1"}),
    )
    .await;
    let id = session["id"].as_i64().expect("session id");

    let (status, body) = post(
        &app,
        &format!("/games/sessions/{id}/word-chain"),
        json!({"word": "开心"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["word"], "开心");
    assert_eq!(body["state"]["user_score"], 1);

    // A reused word is a normal 200 with valid=false, not an error status.
    let (status, body) = post(
        &app,
        &format!("/games/sessions/{id}/word-chain"),
        json!({"word": "开心"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["error"], "这个词已经用过了");
    assert_eq!(body["state"]["words_used"].as_array().expect("words").len(), 1);

    let (status, body) = get(&app, &format!("/games/sessions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["current_word"], "开心");
}

#[tokio::test]
async fn wrong_game_action_is_400() {
    let (_db, app) = setup_app();
    let (_, session) = post(
        &app,
        "/games/sessions",
        json!({"game_id": "word_chain", "owner_id": "comp-1"}),
    )
    .await;
    let id = session["id"].as_i64().expect("session id");

    let (status, body) = post(
        &app,
        &format!("/games/sessions/{id}/guess-number"),
        json!({"guess": 42}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn session_not_found_is_404() {
    let (_db, app) = setup_app();
    let (status, _) = get(&app, "/games/sessions/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/games/sessions/9999/end", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn active_sessions_lists_only_active() {
    let (_db, app) = setup_app();
    for game in ["word_chain", "trivia"] {
        post(
            &app,
            "/games/sessions",
            json!({"game_id": game, "owner_id": "comp-1"}),
        )
        .await;
    }

    let (status, body) = get(&app, "/games/sessions/active/comp-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array body").len(), 2);

    let (_, body) = get(&app, "/games/sessions/active/comp-2").await;
    assert_eq!(body.as_array().expect("array body").len(), 0);
}

#[tokio::test]
async fn end_session_then_stats_and_records() {
    let (_db, app) = setup_app();
    let (_, session) = post(
        &app,
        "/games/sessions",
        json!({"game_id": "word_chain", "owner_id": "comp-1"}),
    )
    .await;
    let id = session["id"].as_i64().expect("session id");

    post(
        &app,
        &format!("/games/sessions/{id}/word-chain"),
        json!({"word": "开心"}),
    )
    .await;

    let (status, record) = post(&app, &format!("/games/sessions/{id}/end"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["winner"], "user");
    assert_eq!(record["user_score"], 1);
    assert_eq!(record["session_id"], session["id"]);

    let (status, body) = get(&app, &format!("/games/sessions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    // Playing against the ended session is a client error, never a move.
    let (status, _) = post(
        &app,
        &format!("/games/sessions/{id}/word-chain"),
        json!({"word": "心想事成"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) = get(&app, "/games/stats?owner_id=comp-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_games"], 1);
    assert_eq!(stats["wins"], 1);
    assert_eq!(stats["games_by_type"]["word_chain"]["played"], 1);

    let (status, records) = get(&app, "/games/records?owner_id=comp-1").await;
    assert_eq!(status, StatusCode::OK);
    let records = records.as_array().expect("array body");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["game_id"], "word_chain");
}

#[tokio::test]
async fn trivia_over_http_reports_correctness() {
    let (_db, app) = setup_app();
    let (_, session) = post(
        &app,
        "/games/sessions",
        json!({"game_id": "trivia", "owner_id": "comp-1"}),
    )
    .await;
    let id = session["id"].as_i64().expect("session id");
    let answer = session["state"]["questions"][0]["answer"]
        .as_str()
        .expect("answer")
        .to_string();

    let (status, body) = post(
        &app,
        &format!("/games/sessions/{id}/trivia"),
        json!({"answer": answer}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["finished"], false);
    assert_eq!(body["state"]["user_score"], 1);
}

#[tokio::test]
async fn guess_number_over_http_gives_hints() {
    let (_db, app) = setup_app();
    let (_, session) = post(
        &app,
        "/games/sessions",
        json!({"game_id": "guess_number", "owner_id": "comp-1"}),
    )
    .await;
    let id = session["id"].as_i64().expect("session id");
    let target = session["state"]["target"].as_i64().expect("target");

    let miss = if target > 1 { 1 } else { 100 };
    let (status, body) = post(
        &app,
        &format!("/games/sessions/{id}/guess-number"),
        json!({"guess": miss}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let expected_hint = if miss < target { "higher" } else { "lower" };
    assert_eq!(body["hint"], expected_hint);
    assert_eq!(body["won"], false);
    assert_eq!(body["target"], Value::Null, "target withheld mid-game");

    let (status, body) = post(
        &app,
        &format!("/games/sessions/{id}/guess-number"),
        json!({"guess": target}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hint"], "correct");
    assert_eq!(body["won"], true);
    assert_eq!(body["finished"], true);
    assert_eq!(body["target"], target);
}
