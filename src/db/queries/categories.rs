use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub label: String,
}

/// Category labels keyed by id, serialized as a JSON object `{"1": "Science", ...}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<i64, String>);

impl CategoryMap {
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Category> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        CategoryMap(iter.into_iter().map(|c| (c.id, c.label)).collect())
    }
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Category> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_category_map(pool: &SqlitePool) -> sqlx::Result<CategoryMap> {
    Ok(get_all_categories(pool).await?.into_iter().collect())
}

pub async fn create_category(pool: &SqlitePool, label: &str) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO categories (type) VALUES (?1)
        "#,
    )
    .bind(label)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn import_categories(
    conn: &mut SqliteConnection,
    categories: Vec<Category>,
) -> sqlx::Result<()> {
    for category in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, type) VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(&category.label)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
