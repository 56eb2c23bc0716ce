use axum::extract::{FromRequest, FromRequestParts};

use crate::error::WebError;

/// `axum::Json` whose rejections use the API error body and a 400 status.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with the same rejection handling as [`ApiJson`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(WebError))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` with the same rejection handling as [`ApiJson`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(WebError))]
pub struct ApiPath<T>(pub T);
