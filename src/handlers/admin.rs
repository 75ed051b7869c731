// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    extract::AppJson,
    models::{
        question::{CreateQuestionRequest, Question},
        user::SubscriptionRequest,
    },
    store::SharedStore,
    utils::jwt::Claims,
};

/// Adds a question to the end of the bank.
/// Admin only.
#[utoipa::path(
    post,
    path = "/api/admin/questions",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, body = Question),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_question(
    State(store): State<SharedStore>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_question = payload.into_new_question()?;

    let question = store.insert_question(new_question).await.map_err(|e| {
        tracing::error!("Failed to insert question: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("Question {} added to the bank", question.id);

    Ok((StatusCode::CREATED, Json(question)))
}

/// Lists the whole bank in serving order, answers included.
/// Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/questions",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, body = [Question]))
)]
pub async fn list_questions(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let questions = store.list_questions().await?;
    Ok(Json(questions))
}

/// Deletes a question by ID.
/// Admin only. Cursors of existing users are not adjusted.
#[utoipa::path(
    delete,
    path = "/api/admin/questions/{id}",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn delete_question(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_question(id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Sets the subscription flag on behalf of the payments service.
/// Admin only.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/subscription",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_subscription(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<SubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !store.set_subscription(id, payload.active).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("Subscription for user {} set to {}", id, payload.active);

    Ok(StatusCode::OK)
}

/// Deletes a user by ID together with their practice results.
/// Admin only. Prevents deleting self.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if claims.user_id()? == id {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    if !store.delete_user(id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("User {} deleted by admin {}", id, claims.sub);

    Ok(StatusCode::NO_CONTENT)
}
