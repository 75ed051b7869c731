// tests/api_tests.rs

use std::sync::Arc;

use gmat_practice::{
    config::{Config, PlanLimits},
    models::question::NewQuestion,
    routes,
    state::AppState,
    store::{InMemoryStore, PracticeStore},
    utils::jwt::sign_jwt,
};
use serde_json::{Value, json};

const SECRET: &str = "test_secret_for_integration_tests";

struct TestApp {
    address: String,
    store: InMemoryStore,
    client: reqwest::Client,
}

impl TestApp {
    fn token(&self, user_id: i64, role: &str) -> String {
        sign_jwt(user_id, role, SECRET, 600).expect("sign token")
    }

    async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Helper function to spawn the app on a random port for testing.
/// The bank holds `questions` questions whose correct answer is "b".
async fn spawn_app(questions: usize) -> TestApp {
    let store = InMemoryStore::new();
    for n in 1..=questions {
        store
            .insert_question(NewQuestion {
                question: format!("Question {}", n),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()],
                correct_answer: "b".to_string(),
                explanation: Some("Because B".to_string()),
            })
            .await
            .unwrap();
    }

    let config = Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        question_seed_path: None,
    };

    let state = AppState {
        store: Arc::new(store.clone()),
        config,
        limits: PlanLimits::default(),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app(0).await;

    let response = app
        .client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app(0).await;

    let body: Value = app
        .client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn practice_requires_valid_token() {
    let app = spawn_app(4).await;

    let missing = app
        .client
        .get(format!("{}/api/tests/daily", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 401);

    let forged = sign_jwt(1, "user", "some_other_secret", 600).unwrap();
    let response = app.get("/api/tests/daily", &forged).await;
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn token_for_missing_user_is_404() {
    let app = spawn_app(4).await;
    let token = app.token(9999, "user");

    let response = app.get("/api/tests/daily", &token).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn free_daily_practice_flow() {
    // Arrange
    let app = spawn_app(10).await;
    let user = app.store.add_user("free@example.com", "user", false).unwrap();
    let token = app.token(user.id, "user");

    // 1. Fetch today's set
    let daily: Value = app.get("/api/tests/daily", &token).await.json().await.unwrap();
    assert_eq!(daily["canPractice"], true);
    assert_eq!(daily["plan"], "free");
    assert_eq!(daily["progress"], 0);
    assert_eq!(daily["totalQuestions"], 100);
    let questions = daily["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["sequenceNumber"], 1);
    assert!(questions[0].get("correctAnswer").is_none());

    let first = questions[0]["id"].as_i64().unwrap();
    let second = questions[1]["id"].as_i64().unwrap();

    // 2. Submit one right, one wrong
    let submit = app
        .post(
            "/api/tests/daily/submit",
            &token,
            json!({ "answers": { first.to_string(): "B", second.to_string(): "c" } }),
        )
        .await;
    assert_eq!(submit.status().as_u16(), 200);
    let result: Value = submit.json().await.unwrap();
    assert_eq!(result["score"], 50);
    assert_eq!(result["correctAnswers"], 1);
    assert_eq!(result["totalQuestions"], 2);
    assert_eq!(result["progress"], 2);
    assert_eq!(result["totalInBank"], 100);
    let wrong = result["feedback"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["questionId"] == second)
        .unwrap();
    assert_eq!(wrong["correct"], false);
    assert_eq!(wrong["correctAnswer"], "b");
    assert_eq!(wrong["userAnswer"], "c");

    // 3. Gated for the rest of the day
    let again: Value = app.get("/api/tests/daily", &token).await.json().await.unwrap();
    assert_eq!(again["canPractice"], false);
    assert_eq!(again["questions"].as_array().unwrap().len(), 0);
    assert!(again["message"].is_string());

    // 4. Progress reflects the submission
    let progress: Value = app.get("/api/tests/progress", &token).await.json().await.unwrap();
    assert_eq!(progress["progress"]["current"], 2);
    assert_eq!(progress["progress"]["total"], 100);
    assert_eq!(progress["progress"]["percentage"], 2);
    assert_eq!(progress["canPracticeToday"], false);
    assert!(progress["lastPracticeDate"].is_string());
    assert_eq!(progress["dailyHistory"].as_array().unwrap().len(), 1);
    assert_eq!(progress["dailyHistory"][0]["type"], "daily");

    // 5. Retake the same set
    let retake: Value = app
        .get("/api/tests/daily/retake", &token)
        .await
        .json()
        .await
        .unwrap();
    let base_id = retake["baseResultId"].as_i64().unwrap();
    assert_eq!(retake["questions"].as_array().unwrap().len(), 2);

    let retake_result: Value = app
        .post(
            "/api/tests/daily/retake/submit",
            &token,
            json!({
                "baseResultId": base_id,
                "answers": { first.to_string(): "b", second.to_string(): "b" }
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(retake_result["type"], "daily-retake");
    assert_eq!(retake_result["score"], 100);

    // 6. Retake left progress untouched
    let stored = app.store.user(user.id).unwrap().unwrap();
    assert_eq!(stored.current_question_index, 2);
}

#[tokio::test]
async fn retried_submission_is_rejected() {
    let app = spawn_app(40).await;
    let user = app.store.add_user("pro@example.com", "user", true).unwrap();
    let token = app.token(user.id, "user");

    let body = json!({ "answers": { "1": "b", "2": "b" }, "expectedCursor": 0 });

    let first = app.post("/api/tests/daily/submit", &token, body.clone()).await;
    assert_eq!(first.status().as_u16(), 200);

    let retry = app.post("/api/tests/daily/submit", &token, body).await;
    assert_eq!(retry.status().as_u16(), 409);

    let stored = app.store.user(user.id).unwrap().unwrap();
    assert_eq!(stored.current_question_index, 10);
    assert_eq!(app.store.result_count().unwrap(), 1);
}

#[tokio::test]
async fn submit_rejects_unknown_questions() {
    let app = spawn_app(4).await;
    let user = app.store.add_user("free@example.com", "user", false).unwrap();
    let token = app.token(user.id, "user");

    let empty = app
        .post("/api/tests/daily/submit", &token, json!({ "answers": {} }))
        .await;
    assert_eq!(empty.status().as_u16(), 400);

    let unknown = app
        .post(
            "/api/tests/daily/submit",
            &token,
            json!({ "answers": { "1": "b", "777": "b" } }),
        )
        .await;
    assert_eq!(unknown.status().as_u16(), 400);
    let body: Value = unknown.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn pro_set_is_numbered_from_cursor() {
    let app = spawn_app(40).await;
    let mut user = app.store.add_user("pro@example.com", "user", true).unwrap();
    user.current_question_index = 20;
    app.store.put_user(user.clone()).unwrap();
    let token = app.token(user.id, "user");

    let daily: Value = app.get("/api/tests/daily", &token).await.json().await.unwrap();
    let numbers: Vec<i64> = daily["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["sequenceNumber"].as_i64().unwrap())
        .collect();

    assert_eq!(daily["plan"], "pro");
    assert_eq!(numbers, (21..=30).collect::<Vec<i64>>());
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = spawn_app(0).await;
    let user = app.store.add_user("user@example.com", "user", false).unwrap();
    let token = app.token(user.id, "user");

    let response = app.get("/api/admin/questions", &token).await;
    assert_eq!(response.status().as_u16(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn admin_manages_bank_and_subscriptions() {
    let app = spawn_app(0).await;
    let admin = app.store.add_user("admin@example.com", "admin", false).unwrap();
    let user = app.store.add_user("user@example.com", "user", false).unwrap();
    let admin_token = app.token(admin.id, "admin");
    let user_token = app.token(user.id, "user");

    // Invalid question: answer outside options
    let invalid = app
        .post(
            "/api/admin/questions",
            &admin_token,
            json!({ "question": "Q", "options": ["1", "2"], "correctAnswer": "d" }),
        )
        .await;
    assert_eq!(invalid.status().as_u16(), 400);

    // Valid question
    let created = app
        .post(
            "/api/admin/questions",
            &admin_token,
            json!({ "question": "2 + 2 = ?", "options": ["3", "4"], "correctAnswer": "B" }),
        )
        .await;
    assert_eq!(created.status().as_u16(), 201);
    let question: Value = created.json().await.unwrap();
    assert_eq!(question["correctAnswer"], "b");

    let bank: Value = app.get("/api/admin/questions", &admin_token).await.json().await.unwrap();
    assert_eq!(bank.as_array().unwrap().len(), 1);

    // Upgrade the user
    let upgraded = app
        .client
        .put(format!("{}/api/admin/users/{}/subscription", app.address, user.id))
        .bearer_auth(&admin_token)
        .json(&json!({ "active": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(upgraded.status().as_u16(), 200);

    let daily: Value = app.get("/api/tests/daily", &user_token).await.json().await.unwrap();
    assert_eq!(daily["plan"], "pro");
    assert_eq!(daily["totalQuestions"], 1000);

    // Unknown user
    let missing = app
        .client
        .put(format!("{}/api/admin/users/9999/subscription", app.address))
        .bearer_auth(&admin_token)
        .json(&json!({ "active": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn admin_deletes_users_but_not_self() {
    let app = spawn_app(4).await;
    let admin = app.store.add_user("admin@example.com", "admin", false).unwrap();
    let user = app.store.add_user("user@example.com", "user", false).unwrap();
    let admin_token = app.token(admin.id, "admin");

    let own = app
        .client
        .delete(format!("{}/api/admin/users/{}", app.address, admin.id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(own.status().as_u16(), 400);

    let other = app
        .client
        .delete(format!("{}/api/admin/users/{}", app.address, user.id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(other.status().as_u16(), 204);
    assert!(app.store.user(user.id).unwrap().is_none());

    let deleted_q = app
        .client
        .delete(format!("{}/api/admin/questions/1", app.address))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted_q.status().as_u16(), 204);
}
