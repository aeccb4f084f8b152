use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_category, get_category_map},
            questions::{count_questions, get_questions_for_category},
        },
        CategoryMap, Question,
    },
    server::{
        app::AppState,
        extract::ApiPath,
        pagination::{paginate, PageQuery},
    },
};

use super::{ApiError, ApiResponse};

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesBody>> {
    let categories = get_category_map(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    query: PageQuery,
) -> ApiResponse<Json<CategoryQuestionsBody>> {
    let bad_request = |e: sqlx::Error| {
        tracing::warn!("Cannot list questions for category {id}: {e}");
        ApiError::BadRequest
    };
    let category = get_category(&pool, id).await.map_err(bad_request)?;
    let selection = get_questions_for_category(&pool, category.id)
        .await
        .map_err(bad_request)?;
    let total_questions = count_questions(&pool).await.map_err(bad_request)?;

    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions: paginate(selection, query.page()),
        total_questions,
        current_category: category.label,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
