use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// `Json` whose rejections render as a 422 API error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejections render as a 404 API error.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
