mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn lists_categories_by_id() {
    let app = TestApp::new().await;
    let science = app.add_category("Science").await;
    let art = app.add_category("Art").await;

    let res = app.get("/categories").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["categories"][science.to_string()], "Science");
    assert_eq!(res.body["categories"][art.to_string()], "Art");
}

#[tokio::test]
async fn empty_categories_is_not_found() {
    let app = TestApp::new().await;

    let res = app.get("/categories").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body,
        json!({"success": false, "error": 404, "message": "Not Found"})
    );
}

#[tokio::test]
async fn questions_for_category_only_returns_that_category() {
    let app = TestApp::new().await;
    let science = app.add_category("Science").await;
    let art = app.add_category("Art").await;
    let first = app.add_question("What is the heaviest organ?", Some(science)).await;
    app.add_question("Who painted La Gioconda?", Some(art)).await;

    let res = app.get(&format!("/categories/{science}/questions")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.question_ids(), vec![first]);
    assert_eq!(res.body["currentCategory"], "Science");
    assert_eq!(res.body["questions"][0]["category"], science);
    // total counts every question, not only this category
    assert_eq!(res.body["totalQuestions"], 2);
}

#[tokio::test]
async fn questions_for_category_paginates() {
    let app = TestApp::new().await;
    let science = app.add_category("Science").await;
    for n in 0..12 {
        app.add_question(&format!("Science question {n}"), Some(science))
            .await;
    }

    let first = app.get(&format!("/categories/{science}/questions")).await;
    assert_eq!(first.question_ids().len(), 10);
    let second = app
        .get(&format!("/categories/{science}/questions?page=2"))
        .await;
    assert_eq!(second.question_ids().len(), 2);
    let beyond = app
        .get(&format!("/categories/{science}/questions?page=5"))
        .await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert!(beyond.question_ids().is_empty());
}

#[tokio::test]
async fn questions_for_missing_category_is_bad_request() {
    let app = TestApp::new().await;
    app.add_category("Science").await;

    let res = app.get("/categories/1000/questions").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"success": false, "error": 400, "message": "bad request"})
    );
}

#[tokio::test]
async fn questions_for_category_storage_failure_is_bad_request() {
    let app = TestApp::new().await;
    let science = app.add_category("Science").await;
    app.add_question("What is the heaviest organ?", Some(science)).await;
    app.drop_questions_table().await;

    let res = app.get(&format!("/categories/{science}/questions")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"success": false, "error": 400, "message": "bad request"})
    );
}
