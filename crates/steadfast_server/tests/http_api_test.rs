//! Route tests driven through the router without a TCP listener.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use steadfast_server::{
    DurableLog, INVALID_TYPE_TEXT, MemoryStore, ONLINE_TEXT, SessionManager, build_router,
};
use steadfast_tictactoe::Session;

fn setup() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let manager = Arc::new(SessionManager::new(Arc::clone(&store), Session::new(), 8));
    (store, build_router(manager))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &'static str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn test_online() {
    let (_store, app) = setup();
    assert_eq!(send(&app, get("/")).await, (StatusCode::OK, ONLINE_TEXT.to_string()));
}

#[tokio::test]
async fn test_start_and_join() {
    let (_store, app) = setup();
    let (status, started) = send_json(&app, post_form("/startgame", "type=X")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["gameStarted"], json!(true));
    assert_eq!(started["p1"], json!({"type": "X", "id": 1}));
    assert_eq!(started["p2"], Value::Null);

    let (status, joined) = send_json(&app, get("/joingame")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["p2"], json!({"type": "O", "id": 2}));
}

#[tokio::test]
async fn test_invalid_type() {
    let (_store, app) = setup();
    for body in ["type=P", "type=", "type=XO"] {
        let (status, text) = send(&app, post_form("/startgame", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, INVALID_TYPE_TEXT);
    }
    let (_, board) = send_json(&app, get("/boardstatus")).await;
    assert_eq!(board["gameStarted"], json!(false));
}

#[tokio::test]
async fn test_precondition_conflicts() {
    let (_store, app) = setup();
    let (status, _) = send(&app, get("/joingame")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, post_form("/startgame", "type=O")).await;
    let (status, _) = send(&app, post_form("/startgame", "type=X")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_move_flow() {
    let (store, app) = setup();
    send(&app, post_form("/startgame", "type=X")).await;
    send(&app, get("/joingame")).await;

    let (status, message) = send_json(&app, post_form("/move/1", "x=0&y=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        message,
        json!({"moveValidity": true, "code": 100, "message": ""})
    );

    let (_, message) = send_json(&app, post_form("/move/2", "x=0&y=0")).await;
    assert_eq!(message["code"], json!(202));
    assert_eq!(message["moveValidity"], json!(false));

    let (_, message) = send_json(&app, post_form("/move/2", "x=3&y=0")).await;
    assert_eq!(message["code"], json!(201));

    let (_, board) = send_json(&app, get("/boardstatus")).await;
    assert_eq!(board["boardState"][0][0], json!("X"));
    assert_eq!(board["turn"], json!(2));
    assert_eq!(store.read_all().unwrap().len(), 1);
}

#[tokio::test]
async fn test_move_before_join() {
    let (_store, app) = setup();
    send(&app, post_form("/startgame", "type=X")).await;
    let (_, message) = send_json(&app, post_form("/move/1", "x=1&y=1")).await;
    assert_eq!(message["code"], json!(301));
}

#[tokio::test]
async fn test_unknown_numeric_player_is_wrong_turn() {
    let (store, app) = setup();
    send(&app, post_form("/startgame", "type=X")).await;
    send(&app, get("/joingame")).await;

    for uri in ["/move/300", "/move/-1", "/move/0"] {
        let (status, message) = send_json(&app, post_form(uri, "x=0&y=0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(message["code"], json!(302));
        assert_eq!(message["moveValidity"], json!(false));
    }
    assert!(store.read_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_move_rejected_before_engine() {
    let (store, app) = setup();
    send(&app, post_form("/startgame", "type=X")).await;
    send(&app, get("/joingame")).await;

    let (status, _) = send(&app, post_form("/move/1", "x=one&y=0")).await;
    assert!(status.is_client_error());
    let (status, _) = send(&app, post_form("/move/first", "x=0&y=0")).await;
    assert!(status.is_client_error());
    assert!(store.read_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_unavailable() {
    let (store, app) = setup();
    send(&app, post_form("/startgame", "type=X")).await;
    send(&app, get("/joingame")).await;

    store.set_unavailable(true);
    let (status, _) = send(&app, post_form("/move/1", "x=0&y=0")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    store.set_unavailable(false);

    let (_, board) = send_json(&app, get("/boardstatus")).await;
    assert_eq!(board["boardState"][0][0], Value::Null);
    assert_eq!(board["turn"], json!(1));
}

#[tokio::test]
async fn test_new_game_resets() {
    let (store, app) = setup();
    send(&app, post_form("/startgame", "type=O")).await;
    send(&app, get("/joingame")).await;
    send(&app, post_form("/move/1", "x=2&y=2")).await;

    let (status, board) = send_json(&app, get("/newgame")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["gameStarted"], json!(false));
    assert_eq!(board["p1"], Value::Null);
    assert!(store.read_all().unwrap().is_empty());
}
