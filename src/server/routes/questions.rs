use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_category_map,
            questions::{self, get_all_questions, search_questions},
        },
        CategoryMap, NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::LooseInt,
        extract::{ApiJson, ApiPath},
        pagination::{paginate, PageQuery},
    },
    telemetry::QUESTION_CHANGES_CNTR,
};

use super::{ApiError, ApiResponse};

#[derive(Deserialize)]
struct NewQuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default)]
    difficulty: Option<LooseInt>,
    #[serde(default)]
    category: Option<LooseInt>,
}

impl NewQuestionBody {
    fn validate(self) -> Result<NewQuestion, ApiError> {
        let non_blank = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        let (Some(question), Some(answer)) = (non_blank(self.question), non_blank(self.answer))
        else {
            return Err(ApiError::Unprocessable);
        };
        Ok(NewQuestion {
            question,
            answer,
            difficulty: self.difficulty.map(|v| v.0),
            category: self.category.map(|v| v.0),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    #[serde(default)]
    search_term: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionsPageBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CreatedBody {
    success: bool,
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct DeletedBody {
    success: bool,
    delete: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    query: PageQuery,
) -> ApiResponse<Json<QuestionsPageBody>> {
    let selection = get_all_questions(&pool).await?;
    let total_questions = selection.len() as i64;
    let questions = paginate(selection, query.page());
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(QuestionsPageBody {
        success: true,
        questions,
        total_questions,
        categories: get_category_map(&pool).await?,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    query: PageQuery,
    ApiJson(body): ApiJson<NewQuestionBody>,
) -> ApiResponse<Json<CreatedBody>> {
    let new_question = body.validate()?;
    let unprocessable = |e: sqlx::Error| {
        tracing::warn!("Cannot create question: {e}");
        ApiError::Unprocessable
    };
    if let Some(category) = new_question.category {
        let categories = get_category_map(&pool).await.map_err(unprocessable)?;
        if !categories.contains(category) {
            tracing::debug!("Rejected question for unknown category {category}");
            return Err(ApiError::Unprocessable);
        }
    }
    let id = questions::create_question(&pool, &new_question)
        .await
        .map_err(unprocessable)?;
    QUESTION_CHANGES_CNTR.with_label_values(&["create"]).inc();
    tracing::info!("Created question {id}");

    let selection = get_all_questions(&pool).await.map_err(unprocessable)?;
    Ok(Json(CreatedBody {
        success: true,
        questions: paginate(selection, query.page()),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Json<DeletedBody>> {
    match questions::delete_question(&pool, id).await {
        Ok(()) => {
            QUESTION_CHANGES_CNTR.with_label_values(&["delete"]).inc();
            tracing::info!("Deleted question {id}");
            Ok(Json(DeletedBody {
                success: true,
                delete: id,
            }))
        }
        Err(sqlx::Error::RowNotFound) => Err(ApiError::NotFound),
        Err(e) => {
            tracing::warn!("Cannot delete question {id}: {e}");
            Err(ApiError::Unprocessable)
        }
    }
}

async fn search(
    State(pool): State<SqlitePool>,
    query: PageQuery,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResultsBody>> {
    // this endpoint reports every failure as 404, malformed bodies included
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected search body: {}", rejection.body_text());
        ApiError::NotFound
    })?;
    let selection = match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => search_questions(&pool, term).await.map_err(|e| {
            tracing::warn!("Search for {term:?} failed: {e}");
            ApiError::NotFound
        })?,
        _ => Vec::new(),
    };
    Ok(Json(SearchResultsBody {
        success: true,
        total_questions: selection.len(),
        questions: paginate(selection, query.page()),
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/search", post(search))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> NewQuestionBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn validation_requires_question_and_answer() {
        assert!(body(r#"{"question": "Q?"}"#).validate().is_err());
        assert!(body(r#"{"answer": "A", "question": null}"#).validate().is_err());
        assert!(body(r#"{"question": "  ", "answer": "A"}"#).validate().is_err());

        let valid = body(r#"{"question": "Q?", "answer": "A", "difficulty": 2, "category": "3"}"#)
            .validate()
            .unwrap();
        assert_eq!(
            valid,
            NewQuestion {
                question: "Q?".to_owned(),
                answer: "A".to_owned(),
                difficulty: Some(2),
                category: Some(3),
            }
        );
    }

    #[test]
    fn difficulty_and_category_are_optional() {
        let valid = body(r#"{"question": "Q?", "answer": "A", "category": null}"#)
            .validate()
            .unwrap();
        assert_eq!(valid.difficulty, None);
        assert_eq!(valid.category, None);
    }
}
