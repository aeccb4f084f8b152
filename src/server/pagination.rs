use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::{request::Parts, Uri};

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N`, 1-indexed. Never rejects: the first `page` pair wins and a
/// missing or non-numeric value falls back to the first page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageQuery {
    page: Option<i64>,
}

impl PageQuery {
    pub fn from_uri(uri: &Uri) -> Self {
        let page = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .ok()
            .and_then(|Query(pairs)| pairs.into_iter().find(|(key, _)| key == "page"))
            .and_then(|(_, value)| value.trim().parse::<i64>().ok());
        PageQuery { page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PageQuery::from_uri(&parts.uri))
    }
}

/// Window `[(page-1)*10, page*10)` of `items`. Pages below 1 are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let Some(start) = usize::try_from(page.saturating_sub(1))
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
