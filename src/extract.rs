// src/extract.rs

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections surface as `AppError::BadRequest`,
/// so malformed bodies get a 400 with the usual JSON error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
