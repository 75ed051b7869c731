// src/handlers/practice.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;

use crate::{
    config::PlanLimits,
    error::AppError,
    extract::AppJson,
    models::practice::{
        DailySetResponse, ProgressResponse, RetakeSetResponse, SubmitDailyRequest,
        SubmitDailyResponse, SubmitRetakeRequest, SubmitRetakeResponse,
    },
    practice,
    store::SharedStore,
    utils::jwt::Claims,
};

/// Serves today's practice set.
///
/// Daily limit and empty bank come back as 200 with `canPractice: false`.
#[utoipa::path(
    get,
    path = "/api/tests/daily",
    tag = "practice",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DailySetResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_daily(
    State(store): State<SharedStore>,
    State(limits): State<PlanLimits>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let today = Utc::now().date_naive();

    let set = practice::daily_set(store.as_ref(), &limits, user_id, today).await?;

    Ok(Json(set))
}

/// Grades the daily set and advances progress.
#[utoipa::path(
    post,
    path = "/api/tests/daily/submit",
    tag = "practice",
    security(("bearer" = [])),
    request_body = SubmitDailyRequest,
    responses(
        (status = 200, body = SubmitDailyResponse),
        (status = 400, description = "Malformed, empty or unknown answers"),
        (status = 409, description = "Already submitted or progress moved on")
    )
)]
pub async fn submit_daily(
    State(store): State<SharedStore>,
    State(limits): State<PlanLimits>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SubmitDailyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let today = Utc::now().date_naive();

    let resp = practice::submit_daily(store.as_ref(), &limits, user_id, req, today).await?;

    Ok(Json(resp))
}

/// Serves the questions of the last daily set again.
#[utoipa::path(
    get,
    path = "/api/tests/daily/retake",
    tag = "practice",
    security(("bearer" = [])),
    responses(
        (status = 200, body = RetakeSetResponse),
        (status = 404, description = "No daily set to retake")
    )
)]
pub async fn get_retake(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let set = practice::retake_set(store.as_ref(), user_id).await?;

    Ok(Json(set))
}

/// Grades a retake. Progress is not affected.
#[utoipa::path(
    post,
    path = "/api/tests/daily/retake/submit",
    tag = "practice",
    security(("bearer" = [])),
    request_body = SubmitRetakeRequest,
    responses(
        (status = 200, body = SubmitRetakeResponse),
        (status = 400, description = "Answers outside the retake set"),
        (status = 404, description = "Base result not found")
    )
)]
pub async fn submit_retake(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SubmitRetakeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let resp = practice::submit_retake(store.as_ref(), user_id, req).await?;

    Ok(Json(resp))
}

/// Reports progress through the bank and recent daily history.
#[utoipa::path(
    get,
    path = "/api/tests/progress",
    tag = "practice",
    security(("bearer" = [])),
    responses((status = 200, body = ProgressResponse))
)]
pub async fn get_progress(
    State(store): State<SharedStore>,
    State(limits): State<PlanLimits>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let today = Utc::now().date_naive();

    let resp = practice::progress(store.as_ref(), &limits, user_id, today).await?;

    Ok(Json(resp))
}
