// api.rs - End-to-end tests driving the router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bingo_daemon::{build_router, AppState, DaemonConfig};
use bingo_store::Store;
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn app_with(config: DaemonConfig) -> Router {
    build_router(AppState::shared(Store::open_in_memory().unwrap(), config))
}

fn app() -> Router {
    let mut config = DaemonConfig::default();
    config.auth.callback_secret = Some(SECRET.into());
    app_with(config)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::get(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, req.body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, req.body(Body::from(body.to_string())).unwrap()).await
}

async fn sign_in_with(app: &Router, email: &str, invite: Option<&str>) -> Value {
    let req = Request::post("/api/auth/callback")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-bingo-auth-secret", SECRET)
        .body(Body::from(
            json!({ "email": email, "name": "Tester", "invite_token": invite }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

async fn sign_in(app: &Router, email: &str) -> String {
    sign_in_with(app, email, None).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_board(app: &Router, token: &str, free_space: bool) -> String {
    let (status, body) = post(
        app,
        "/api/boards/create",
        Some(token),
        json!({ "title": "2026 goals", "year": 2026, "include_free_space": free_space }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["board"]["id"].as_str().unwrap().to_string()
}

async fn add_goal(app: &Router, token: &str, board: &str, position: u8) -> (StatusCode, Value) {
    post(
        app,
        "/api/goals/create",
        Some(token),
        json!({ "board_id": board, "position": position, "text": format!("goal {position}") }),
    )
    .await
}

/// Fill every cell except the free space; returns goal ids by position.
async fn fill(app: &Router, token: &str, board: &str) -> Vec<Option<String>> {
    let mut ids = vec![None; 25];
    for position in (0..25u8).filter(|p| *p != 12) {
        let (status, body) = add_goal(app, token, board, position).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        ids[position as usize] = Some(body["goal"]["id"].as_str().unwrap().to_string());
    }
    ids
}

async fn complete(app: &Router, token: &str, goal_id: &str) -> Value {
    let (status, body) = post(
        app,
        "/api/goals/update",
        Some(token),
        json!({ "goal_id": goal_id, "completed": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn health() {
    let (status, body) = get(&app(), "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn callback_requires_the_shared_secret() {
    let app = app();
    let (status, body) = post(&app, "/api/auth/callback", None, json!({ "email": "a@b.co" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unauthorized");

    let unset = app_with(DaemonConfig::default());
    let req = Request::post("/api/auth/callback")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-bingo-auth-secret", "")
        .body(Body::from(json!({ "email": "a@b.co" }).to_string()))
        .unwrap();
    assert_eq!(send(&unset, req).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn callback_rejects_bad_email() {
    let app = app();
    let req = Request::post("/api/auth/callback")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-bingo-auth-secret", SECRET)
        .body(Body::from(json!({ "email": "not-an-email" }).to_string()))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");
}

#[tokio::test]
async fn session_via_bearer_and_cookie_then_logout() {
    let app = app();
    let first = sign_in_with(&app, "Someone@Example.com", None).await;
    assert_eq!(first["created"], true);
    assert_eq!(first["user"]["email"], "someone@example.com");
    let token = first["token"].as_str().unwrap().to_string();

    let (status, body) = get(&app, "/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "someone@example.com");

    let req = Request::get("/api/me")
        .header(header::COOKIE, format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, req).await.0, StatusCode::OK);

    let again = sign_in_with(&app, "someone@example.com", None).await;
    assert_eq!(again["created"], false);
    assert_eq!(again["user"]["id"], first["user"]["id"]);

    let (status, _) = post(&app, "/api/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(get(&app, "/api/me", Some(&token)).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(post(&app, "/api/logout", None, json!({})).await.0, StatusCode::OK);
}

#[tokio::test]
async fn session_cookie_is_secure_behind_https() {
    async fn cookie_for(config: DaemonConfig) -> String {
        let req = Request::post("/api/auth/callback")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-bingo-auth-secret", SECRET)
            .body(Body::from(json!({ "email": "a@b.co", "name": "A" }).to_string()))
            .unwrap();
        let resp = app_with(config).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string()
    }

    let mut config = DaemonConfig::default();
    config.auth.callback_secret = Some(SECRET.into());
    let plain = cookie_for(config.clone()).await;
    assert!(plain.contains("HttpOnly"));
    assert!(!plain.contains("Secure"));

    config.server.base_url = "https://bingo.example.com".into();
    let secure = cookie_for(config).await;
    assert!(secure.ends_with("; Secure"));
}

#[tokio::test]
async fn board_crud_and_ownership() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let stranger = sign_in(&app, "stranger@b.co").await;

    let (status, body) = post(
        &app,
        "/api/boards/create",
        Some(&owner),
        json!({ "title": "  ", "year": 2026 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title is required");

    let (status, _) = post(
        &app,
        "/api/boards/create",
        Some(&owner),
        json!({ "title": "Old", "year": 1999 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let board = create_board(&app, &owner, true).await;
    let (status, body) = get(&app, &format!("/api/boards/{board}"), Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_owner"], true);
    assert_eq!(body["goals"].as_array().unwrap().len(), 1);
    assert_eq!(body["goals"][0]["position"], 12);
    assert_eq!(body["goals"][0]["is_free_space"], true);

    let (status, _) = post(
        &app,
        "/api/boards/update",
        Some(&stranger),
        json!({ "board_id": board, "title": "Mine now", "year": 2026 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        get(&app, &format!("/api/boards/{board}"), Some(&stranger)).await.0,
        StatusCode::FORBIDDEN
    );

    let (status, body) = post(
        &app,
        "/api/boards/update",
        Some(&owner),
        json!({ "board_id": board, "title": "Renamed", "year": 2027 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"]["title"], "Renamed");

    let (_, body) = get(&app, "/api/boards", Some(&owner)).await;
    assert_eq!(body["boards"].as_array().unwrap().len(), 1);

    let (status, _) = post(&app, "/api/boards/delete", Some(&owner), json!({ "board_id": board })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        get(&app, &format!("/api/boards/{board}"), Some(&owner)).await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn malformed_payload_uses_the_envelope() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let (status, body) = post(&app, "/api/boards/create", Some(&owner), json!({ "year": 2026 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed payload"));
}

#[tokio::test]
async fn goal_positions_are_validated_and_unique() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;

    let (status, body) = add_goal(&app, &owner, &board, 12).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = post(
        &app,
        "/api/goals/create",
        Some(&owner),
        json!({ "board_id": board, "position": 25, "text": "too far" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Position must be between 0 and 24");

    let (status, body) = post(
        &app,
        "/api/goals/create",
        Some(&owner),
        json!({ "board_id": board, "position": 0, "text": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Goal text is required");
}

#[tokio::test]
async fn lock_requires_a_full_board_and_is_permanent() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;

    let (status, body) = post(
        &app,
        "/api/boards/toggle-lock",
        Some(&owner),
        json!({ "board_id": board, "locked": true }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot lock board. Please add 24 more goal(s).");

    let ids = fill(&app, &owner, &board).await;
    let (status, body) = post(
        &app,
        "/api/boards/toggle-lock",
        Some(&owner),
        json!({ "board_id": board, "locked": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locked"], true);

    let (status, _) = post(
        &app,
        "/api/boards/toggle-lock",
        Some(&owner),
        json!({ "board_id": board, "locked": false }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let goal = ids[0].as_deref().unwrap();
    let (status, _) = post(
        &app,
        "/api/goals/update",
        Some(&owner),
        json!({ "goal_id": goal, "text": "changed" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(&app, "/api/goals/delete", Some(&owner), json!({ "goal_id": goal })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = complete(&app, &owner, goal).await;
    assert_eq!(body["goal"]["completed"], true);
}

#[tokio::test]
async fn completing_lines_reports_bingos_and_celebrations() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;
    let ids = fill(&app, &owner, &board).await;
    let id = |p: usize| ids[p].clone().unwrap();

    let body = complete(&app, &owner, &id(0)).await;
    assert_eq!(body["bingoType"], Value::Null);
    assert_eq!(body["boardComplete"], false);
    assert_eq!(body["celebrations"].as_array().unwrap().len(), 1);
    assert_eq!(body["celebrations"][0]["kind"], "goal");

    for p in 1..4 {
        complete(&app, &owner, &id(p)).await;
    }
    let body = complete(&app, &owner, &id(4)).await;
    assert_eq!(body["bingoType"], "row");
    let cues = body["celebrations"].as_array().unwrap();
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[1]["kind"], "bingo");
    assert_eq!(cues[1]["delay_ms"], 500);

    // Column 2 through the free space.
    for p in [7usize, 17] {
        complete(&app, &owner, &id(p)).await;
    }
    let body = complete(&app, &owner, &id(22)).await;
    assert_eq!(body["bingoType"], "column");

    let (status, body) = post(
        &app,
        "/api/goals/update",
        Some(&owner),
        json!({ "goal_id": id(22), "completed": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"]["completed_at"], Value::Null);
    assert!(body["celebrations"].as_array().unwrap().is_empty());
    complete(&app, &owner, &id(22)).await;

    let remaining: Vec<usize> = (0..25)
        .filter(|p| ![0, 1, 2, 3, 4, 7, 12, 17, 22].contains(p))
        .collect();
    let (last, rest) = remaining.split_last().unwrap();
    for p in rest {
        complete(&app, &owner, &id(*p)).await;
    }
    let body = complete(&app, &owner, &id(*last)).await;
    assert_eq!(body["boardComplete"], true);
    let cues = body["celebrations"].as_array().unwrap();
    assert_eq!(cues.last().unwrap()["kind"], "board");
    assert_eq!(cues.last().unwrap()["duration_ms"], 5000);

    let (_, body) = get(&app, &format!("/api/boards/{board}"), Some(&owner)).await;
    assert_eq!(body["board_complete"], true);
    assert_eq!(body["bingos"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn free_space_cannot_be_changed() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;
    let (_, body) = get(&app, &format!("/api/boards/{board}"), Some(&owner)).await;
    let free = body["goals"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/api/goals/update",
        Some(&owner),
        json!({ "goal_id": free, "completed": false }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot modify free space goal");

    let (status, body) = post(&app, "/api/goals/delete", Some(&owner), json!({ "goal_id": free })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot delete free space goal");
}

#[tokio::test]
async fn share_token_opens_public_boards_only() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, false).await;

    let (status, body) = post(
        &app,
        "/api/boards/toggle-share",
        Some(&owner),
        json!({ "board_id": board, "is_public": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let share = body["share_token"].as_str().unwrap().to_string();
    assert_eq!(
        body["share_url"],
        format!("http://localhost:3000/board/{board}?share={share}")
    );

    let uri = format!("/api/boards/{board}?share={share}");
    let (status, body) = get(&app, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_owner"], false);

    let wrong = format!("/api/boards/{board}?share=nope");
    assert_eq!(get(&app, &wrong, None).await.0, StatusCode::UNAUTHORIZED);

    let (_, body) = post(
        &app,
        "/api/boards/toggle-share",
        Some(&owner),
        json!({ "board_id": board, "is_public": false }),
    )
    .await;
    assert_eq!(body["share_url"], Value::Null);
    assert_eq!(get(&app, &uri, None).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invitation_flow_builds_friendships() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let outsider = sign_in(&app, "outsider@b.co").await;

    let (status, body) = post(
        &app,
        "/api/invitations/create",
        Some(&owner),
        json!({ "email": "outsider@b.co" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This email is already registered");

    let (status, body) = post(&app, "/api/invitations/create", Some(&owner), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let invite = body["invitation"]["invite_token"].as_str().unwrap().to_string();
    assert_eq!(
        body["invite_url"],
        format!("http://localhost:3000/login?invite={invite}")
    );

    let joined = sign_in_with(&app, "friend@b.co", Some(&invite)).await;
    assert_eq!(joined["invitation"]["status"], "joined");
    let (_, me) = get(&app, "/api/me", Some(&owner)).await;
    assert_eq!(joined["user"]["invited_by"], me["user"]["id"]);
    let friend = joined["token"].as_str().unwrap().to_string();
    let friend_id = joined["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/api/invitations/accept",
        Some(&outsider),
        json!({ "invite_token": invite }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invitation has already been used");

    let (_, body) = get(&app, "/api/groups/members", Some(&owner)).await;
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["role"], "owner");
    assert_eq!(members[1]["user"]["email"], "friend@b.co");
    let membership = members[1]["id"].as_str().unwrap().to_string();
    let owner_row = members[0]["id"].as_str().unwrap().to_string();

    let (_, body) = get(&app, "/api/groups/my-groups", Some(&friend)).await;
    assert_eq!(body["groups"][0]["owner"]["email"], "owner@b.co");
    let owner_id = body["groups"][0]["owner"]["id"].as_str().unwrap().to_string();

    let board = create_board(&app, &owner, false).await;
    let (status, body) = get(&app, &format!("/api/friends/{owner_id}/boards"), Some(&friend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["boards"][0]["id"], board.as_str());
    assert_eq!(
        get(&app, &format!("/api/boards/{board}"), Some(&friend)).await.0,
        StatusCode::OK
    );
    assert_eq!(
        get(&app, &format!("/api/friends/{owner_id}/boards"), Some(&outsider)).await.0,
        StatusCode::FORBIDDEN
    );

    let (status, body) = post(
        &app,
        "/api/groups/remove-member",
        Some(&owner),
        json!({ "member_id": owner_row }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot remove the group owner");

    let (status, _) = post(
        &app,
        "/api/groups/remove-member",
        Some(&friend),
        json!({ "member_id": membership }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &app,
        "/api/groups/leave",
        Some(&friend),
        json!({ "membership_id": membership }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        get(&app, &format!("/api/friends/{owner_id}/boards"), Some(&friend)).await.0,
        StatusCode::FORBIDDEN
    );
    assert_ne!(friend_id, owner_id);
}

#[tokio::test]
async fn accepting_twice_or_your_own_invitation_fails() {
    let app = app();
    let owner = sign_in(&app, "owner@b.co").await;
    let friend = sign_in(&app, "friend@b.co").await;

    let invite = |body: Value| body["invitation"]["invite_token"].as_str().unwrap().to_string();
    let first = invite(post(&app, "/api/invitations/create", Some(&owner), json!({})).await.1);
    let second = invite(post(&app, "/api/invitations/create", Some(&owner), json!({})).await.1);

    let (status, body) = post(
        &app,
        "/api/invitations/accept",
        Some(&owner),
        json!({ "invite_token": first }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You cannot accept your own invitation");

    let (status, body) = post(
        &app,
        "/api/invitations/accept",
        Some(&friend),
        json!({ "invite_token": first }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = post(
        &app,
        "/api/invitations/accept",
        Some(&friend),
        json!({ "invite_token": second }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already a member of this group");

    let (status, _) = post(
        &app,
        "/api/invitations/accept",
        Some(&friend),
        json!({ "invite_token": "missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, "/api/groups/my-groups", Some(&friend)).await;
    let membership = body["groups"][0]["membership_id"].as_str().unwrap().to_string();
    let (_, body) = get(&app, "/api/groups/members", Some(&friend)).await;
    let own_row = body["members"][0]["id"].as_str().unwrap().to_string();
    let (status, body) = post(
        &app,
        "/api/groups/leave",
        Some(&friend),
        json!({ "membership_id": own_row }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot leave your own group");
    assert_ne!(membership, own_row);
}

#[tokio::test]
async fn events_are_written_to_the_configured_log() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("events.jsonl");
    let mut config = DaemonConfig::default();
    config.auth.callback_secret = Some(SECRET.into());
    config.events.log_path = Some(log.clone());
    let app = app_with(config);

    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;
    post(
        &app,
        "/api/boards/toggle-share",
        Some(&owner),
        json!({ "board_id": board, "is_public": true }),
    )
    .await;

    let lines: Vec<Value> = std::fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<&str> = lines.iter().map(|l| l["event_type"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["board_created", "board_visibility_changed"]);
}

#[tokio::test]
async fn recompleting_a_goal_is_not_a_new_event() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("events.jsonl");
    let mut config = DaemonConfig::default();
    config.auth.callback_secret = Some(SECRET.into());
    config.events.log_path = Some(log.clone());
    let app = app_with(config);

    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;
    let ids = fill(&app, &owner, &board).await;
    let id = |p: usize| ids[p].clone().unwrap();

    for p in 0..4 {
        complete(&app, &owner, &id(p)).await;
    }
    let first = complete(&app, &owner, &id(4)).await;
    assert_eq!(first["bingoType"], "row");

    let again = complete(&app, &owner, &id(4)).await;
    assert_eq!(again["goal"]["completed_at"], first["goal"]["completed_at"]);
    assert_eq!(again["bingoType"], Value::Null);
    assert_eq!(again["boardComplete"], false);
    assert!(again["celebrations"].as_array().unwrap().is_empty());

    let log = std::fs::read_to_string(&log).unwrap();
    let count = |kind: &str| {
        log.lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap())
            .filter(|l| l["event_type"] == kind)
            .count()
    };
    assert_eq!(count("bingo_achieved"), 1);
    assert_eq!(count("goal_completed"), 5);
}

#[tokio::test]
async fn event_log_can_be_limited_to_some_kinds() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("events.jsonl");
    let mut config = DaemonConfig::default();
    config.auth.callback_secret = Some(SECRET.into());
    config.events.log_path = Some(log.clone());
    config.events.log_kinds = vec!["board_visibility_changed".into()];
    let app = app_with(config);

    let owner = sign_in(&app, "owner@b.co").await;
    let board = create_board(&app, &owner, true).await;
    post(
        &app,
        "/api/boards/toggle-share",
        Some(&owner),
        json!({ "board_id": board, "is_public": true }),
    )
    .await;

    let content = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("board_visibility_changed"));
}

#[tokio::test]
async fn protected_routes_need_a_session() {
    let app = app();
    for uri in ["/api/me", "/api/boards", "/api/groups/members", "/api/groups/my-groups"] {
        let (status, body) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["success"], false);
    }
    let (status, _) = get(&app, "/api/me", Some("not-a-session")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
