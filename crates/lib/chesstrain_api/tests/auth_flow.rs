//! Integration test: build the router over an in-memory database and drive
//! the register, login and gated-route flow end to end.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chesstrain_api::{AppState, config::ApiConfig};
use chesstrain_core::auth::jwt::TokenSecret;
use chesstrain_core::db;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

const LONG_PASSWORD: &str =
    "correct horse battery staple correct horse battery staple correct horse battery staple";

async fn app() -> (Router, SqlitePool) {
    let pool = db::memory_pool().await.expect("memory pool");
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: ":memory:".into(),
        token_secret: TokenSecret::new("integration-secret"),
        bcrypt_cost: 4,
    };
    let state = AppState::new(pool.clone(), config);
    (chesstrain_api::router(state), pool)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let challenge = resp
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    // Extractor rejections answer in plain text.
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json, challenge)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> i64 {
    let (status, body, _) = send(
        app,
        json_request(
            "POST",
            "/auth/register",
            None,
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": password,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["user_id"].as_i64().unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let form = format!(
        "username={}&password={}",
        username,
        password.replace(' ', "+")
    );
    let req = Request::builder()
        .method("POST")
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    let (status, body, _) = send(app, req).await;
    (status, body)
}

async fn token_for(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = login(app, username, password).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

async fn promote(pool: &SqlitePool, user_id: i64, is_admin: bool) {
    sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
        .bind(is_admin)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn admin_token(app: &Router, pool: &SqlitePool, username: &str) -> (i64, String) {
    let password = format!("pw-{username}");
    let user_id = register(app, username, &password).await;
    promote(pool, user_id, true).await;
    (user_id, token_for(app, username, &password).await)
}

#[tokio::test]
async fn register_login_and_fetch_profile() {
    let (app, _pool) = app().await;
    assert!(LONG_PASSWORD.len() > 72);
    register(&app, "bob", LONG_PASSWORD).await;

    let token = token_for(&app, "bob", LONG_PASSWORD).await;
    let (status, me, _) = send(&app, get("/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "bob");
    assert_eq!(me["rating"], 1200);
    assert_eq!(me["is_admin"], false);
    assert!(me.get("hashed_password").is_none());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, _pool) = app().await;
    register(&app, "bob", "right-password").await;

    let (status, body) = login(&app, "bob", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect username or password");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (app, _pool) = app().await;
    register(&app, "bob", "pw").await;

    let (status, body, _) = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            None,
            json!({"username": "bob", "email": "other@example.com", "password": "pw"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username or email already registered");
}

#[tokio::test]
async fn missing_or_bad_token_gets_bearer_challenge() {
    let (app, _pool) = app().await;

    for token in [None, Some("not-a-jwt")] {
        let (status, body, challenge) = send(&app, get("/auth/me", token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(challenge.as_deref(), Some("Bearer"));
        assert_eq!(body["message"], "Could not validate credentials");
    }
}

#[tokio::test]
async fn admin_routes_require_admin_flag() {
    let (app, pool) = app().await;
    let user_id = register(&app, "alice", "pw-alice").await;
    let token = token_for(&app, "alice", "pw-alice").await;

    let (status, body, _) = send(&app, get("/admin/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not enough permissions");

    promote(&pool, user_id, true).await;

    // The flag is read per request, so the same token now passes.
    let (status, stats, _) = send(&app, get("/admin/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"], 1);

    let (status, body, _) = send(
        &app,
        json_request("DELETE", &format!("/admin/users/{user_id}"), Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete yourself");
}

#[tokio::test]
async fn token_of_deleted_user_stops_working() {
    let (app, pool) = app().await;
    let user_id = register(&app, "carol", "pw-carol").await;
    let token = token_for(&app, "carol", "pw-carol").await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _, challenge) = send(&app, get("/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));
}

#[tokio::test]
async fn games_and_puzzles_move_the_rating() {
    let (app, _pool) = app().await;
    register(&app, "dave", "pw-dave").await;
    let token = token_for(&app, "dave", "pw-dave").await;

    let (status, body, _) = send(
        &app,
        json_request(
            "POST",
            "/games",
            Some(&token),
            json!({"game_type": "rapid", "result": "win", "duration": 600}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Game recorded");

    let (status, body, _) = send(
        &app,
        json_request(
            "POST",
            "/puzzles/attempt",
            Some(&token),
            json!({"puzzle_id": 1, "success": true, "time_taken": 30}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);

    let (_, me, _) = send(&app, get("/auth/me", Some(&token))).await;
    assert_eq!(me["rating"], 1230);

    let (status, stats, _) = send(&app, get("/games/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["games"]["total_games"], 1);
    assert_eq!(stats["games"]["wins"], 1);
    assert_eq!(stats["puzzles"]["successful"], 1);
    assert_eq!(stats["rating"], 1230);

    let (_, board, _) = send(&app, get("/admin/leaderboard", None)).await;
    assert_eq!(board[0]["username"], "dave");
}

#[tokio::test]
async fn course_can_be_purchased_once() {
    let (app, pool) = app().await;
    let (_, token) = admin_token(&app, &pool, "erin").await;

    let (status, created, _) = send(
        &app,
        json_request(
            "POST",
            "/courses",
            Some(&token),
            json!({"title": "Endgames", "price": 19.5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let course_id = created["id"].as_i64().unwrap();

    let uri = format!("/courses/purchase/{course_id}");
    let (status, _, _) = send(&app, json_request("POST", &uri, Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, _) = send(&app, json_request("POST", &uri, Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Course already purchased");

    let (status, body, _) =
        send(&app, json_request("POST", "/courses/purchase/999", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");

    let (_, purchases, _) = send(&app, get("/courses/my/purchases", Some(&token))).await;
    assert_eq!(purchases[0]["amount"], 19.5);
}

#[tokio::test]
async fn demoted_admin_is_refused_on_next_request() {
    let (app, pool) = app().await;
    let (admin_id, token) = admin_token(&app, &pool, "gina").await;

    let (status, _, _) = send(&app, get("/admin/users", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    promote(&pool, admin_id, false).await;

    let (status, body, _) = send(&app, get("/admin/users", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not enough permissions");
}

#[tokio::test]
async fn admin_manages_users() {
    let (app, pool) = app().await;
    let (_, token) = admin_token(&app, &pool, "hank").await;
    let other_id = register(&app, "ivy", "pw-ivy").await;

    let (status, users, _) = send(&app, get("/admin/users", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"hank") && names.contains(&"ivy"));
    assert!(users[0].get("hashed_password").is_none());

    let uri = format!("/admin/users/{other_id}/admin?is_admin=true");
    let (status, body, _) = send(&app, json_request("PUT", &uri, Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "User admin status updated");
    let ivy = token_for(&app, "ivy", "pw-ivy").await;
    let (status, _, _) = send(&app, get("/admin/stats", Some(&ivy))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, _) = send(
        &app,
        json_request("PUT", "/admin/users/999/admin?is_admin=true", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let uri = format!("/admin/users/{other_id}/admin?is_admin=maybe");
    let (status, _, _) = send(&app, json_request("PUT", &uri, Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/admin/users/{other_id}");
    let (status, body, _) = send(&app, json_request("DELETE", &uri, Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    let (status, body, _) = send(&app, json_request("DELETE", &uri, Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _, _) = send(&app, get("/auth/me", Some(&ivy))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_reads_are_public_and_writes_are_admin_only() {
    let (app, pool) = app().await;
    let (_, admin) = admin_token(&app, &pool, "judy").await;
    register(&app, "kyle", "pw-kyle").await;
    let user = token_for(&app, "kyle", "pw-kyle").await;

    let resources = [
        (
            "/categories",
            "Category",
            json!({"name": "Openings"}),
            json!({"name": "Endgames", "description": "K+P"}),
            "name",
            "Endgames",
        ),
        (
            "/courses",
            "Course",
            json!({"title": "Sicilian", "price": 10.0}),
            json!({"title": "Najdorf", "price": 12.0}),
            "title",
            "Najdorf",
        ),
        (
            "/puzzles",
            "Puzzle",
            json!({"title": "Mate in 1", "fen": "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "solution": "Ra8#"}),
            json!({"title": "Back rank", "fen": "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "solution": "Ra8#"}),
            "title",
            "Back rank",
        ),
    ];

    for (base, noun, create, update, field, updated) in resources {
        let (status, list, _) = send(&app, get(base, None)).await;
        assert_eq!(status, StatusCode::OK, "{base}");
        assert_eq!(list, json!([]), "{base}");

        let (status, _, challenge) = send(&app, json_request("POST", base, None, create.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{base}");
        assert_eq!(challenge.as_deref(), Some("Bearer"));

        let (status, _, _) =
            send(&app, json_request("POST", base, Some(&user), create.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{base}");

        let (status, created, _) =
            send(&app, json_request("POST", base, Some(&admin), create.clone())).await;
        assert_eq!(status, StatusCode::OK, "{base}: {created}");
        assert_eq!(created["message"], format!("{noun} created"));
        let item = format!("{base}/{}", created["id"].as_i64().unwrap());

        let (status, _, _) =
            send(&app, json_request("PUT", &item, Some(&user), update.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{item}");

        let (status, body, _) =
            send(&app, json_request("PUT", &item, Some(&admin), update.clone())).await;
        assert_eq!(status, StatusCode::OK, "{item}: {body}");
        assert_eq!(body["message"], format!("{noun} updated"));

        let (status, fetched, _) = send(&app, get(&item, None)).await;
        assert_eq!(status, StatusCode::OK, "{item}");
        assert_eq!(fetched[field], updated);

        let missing = format!("{base}/999");
        let not_found = format!("{noun} not found");
        let (status, body, _) =
            send(&app, json_request("PUT", &missing, Some(&admin), update.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{missing}");
        assert_eq!(body["message"], not_found);

        let (status, body, _) = send(&app, json_request("DELETE", &item, Some(&admin), json!({}))).await;
        assert_eq!(status, StatusCode::OK, "{item}");
        assert_eq!(body["message"], format!("{noun} deleted"));

        let (status, body, _) = send(&app, json_request("DELETE", &item, Some(&admin), json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{item}");
        assert_eq!(body["message"], not_found);

        let (status, body, _) = send(&app, get(&item, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{item}");
        assert_eq!(body["message"], not_found);
    }
}

#[tokio::test]
async fn listings_honour_filters_and_limits() {
    let (app, pool) = app().await;
    let (_, token) = admin_token(&app, &pool, "lena").await;

    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let mut hard_id = 0;
    for (title, difficulty) in [("Fork", "easy"), ("Pin", "easy"), ("Zugzwang", "hard")] {
        let (status, created, _) = send(
            &app,
            json_request(
                "POST",
                "/puzzles",
                Some(&token),
                json!({"title": title, "fen": fen, "solution": "Ra8#", "difficulty": difficulty}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{created}");
        if difficulty == "hard" {
            hard_id = created["id"].as_i64().unwrap();
        }
    }

    let (_, all, _) = send(&app, get("/puzzles", None)).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    let (status, hard, _) = send(&app, get("/puzzles?difficulty=hard", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hard.as_array().unwrap().len(), 1);
    assert_eq!(hard[0]["title"], "Zugzwang");

    for result in ["win", "draw", "loss"] {
        let (status, _, _) = send(
            &app,
            json_request("POST", "/games", Some(&token), json!({"game_type": "bullet", "result": result})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, games, _) = send(&app, get("/games/my", Some(&token))).await;
    assert_eq!(games.as_array().unwrap().len(), 3);
    let (status, limited, _) = send(&app, get("/games/my?limit=2", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(limited.as_array().unwrap().len(), 2);
    let (status, _, _) = send(&app, get("/games/my?limit=lots", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/puzzles/attempt",
            Some(&token),
            json!({"puzzle_id": hard_id, "success": false, "time_taken": 90}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, attempts, _) = send(&app, get("/puzzles/my/attempts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attempts.as_array().unwrap().len(), 1);
    assert_eq!(attempts[0]["puzzle_title"], "Zugzwang");
    assert_eq!(attempts[0]["difficulty"], "hard");
    assert_eq!(attempts[0]["success"], false);

    let (status, _, _) = send(&app, get("/puzzles/my/attempts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
