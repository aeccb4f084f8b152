use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    server::{app::AppState, deserializers::LooseInt, extract::ApiJson},
    telemetry::QUIZ_CNTR,
};

use super::{ApiError, ApiResponse};

#[derive(Deserialize)]
struct QuizCategory {
    id: LooseInt,
}

#[derive(Deserialize)]
struct QuizBody {
    quiz_category: QuizCategory,
    // Accepted for compatibility with the client; not used to filter candidates.
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizQuestionBody {
    success: bool,
    question: Option<Question>,
}

/// Which questions a quiz draws from. Category id 0 stands for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizScope {
    All,
    Category(i64),
}

impl From<LooseInt> for QuizScope {
    fn from(LooseInt(id): LooseInt) -> Self {
        match id {
            0 => QuizScope::All,
            id => QuizScope::Category(id),
        }
    }
}

impl QuizScope {
    fn label(&self) -> String {
        match self {
            QuizScope::All => "all".to_owned(),
            QuizScope::Category(id) => id.to_string(),
        }
    }
}

async fn next_question(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<QuizBody>,
) -> ApiResponse<Json<QuizQuestionBody>> {
    let scope = QuizScope::from(body.quiz_category.id);
    tracing::debug!(
        "Quiz request for {scope:?} after {} previous questions",
        body.previous_questions.len()
    );
    let candidates = match scope {
        QuizScope::All => get_all_questions(&pool).await,
        QuizScope::Category(id) => get_questions_for_category(&pool, id).await,
    }
    .map_err(|e| {
        tracing::warn!("Cannot load quiz questions for {scope:?}: {e}");
        ApiError::Unprocessable
    })?;

    let question = candidates.choose(&mut rand::thread_rng()).cloned();
    if question.is_some() {
        QUIZ_CNTR.with_label_values(&[scope.label().as_str()]).inc();
    }
    Ok(Json(QuizQuestionBody {
        success: true,
        question,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
