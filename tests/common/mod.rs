#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::queries::categories::create_category;
use trivia_api::db::queries::questions::create_question;
use trivia_api::db::{self, NewQuestion};
use trivia_api::server::app::{build_router, AppState};

pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        let router = build_router(AppState::new(pool.clone()));
        TestApp { pool, router }
    }

    pub async fn add_category(&self, label: &str) -> i64 {
        create_category(&self.pool, label).await.unwrap()
    }

    pub async fn add_question(&self, text: &str, category: Option<i64>) -> i64 {
        create_question(
            &self.pool,
            &NewQuestion {
                question: text.to_owned(),
                answer: format!("answer to {text}"),
                difficulty: Some(1),
                category,
            },
        )
        .await
        .unwrap()
    }

    pub async fn question_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Every later query touching questions fails with a storage error.
    pub async fn drop_questions_table(&self) {
        sqlx::query("DROP TABLE questions")
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> TestResponse {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        TestResponse::read(response).await
    }
}

impl TestResponse {
    async fn read(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub fn question_ids(&self) -> Vec<i64> {
        self.body["questions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["id"].as_i64().unwrap())
            .collect()
    }
}
