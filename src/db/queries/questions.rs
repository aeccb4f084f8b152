use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: Option<i64>,
    pub category: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: Option<i64>,
    pub category: Option<i64>,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over question text. Folding uses full
/// Unicode lowercasing, which SQLite's `LIKE` does not, so rows are filtered here.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    Ok(get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.difficulty)
    .bind(question.category)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `RowNotFound` when no question has this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: Vec<Question>,
) -> sqlx::Result<()> {
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, difficulty, category)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                difficulty = excluded.difficulty,
                category = excluded.category
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.difficulty)
        .bind(question.category)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
