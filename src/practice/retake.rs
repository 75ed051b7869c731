// src/practice/retake.rs

use super::{
    load_user,
    scoring::{grade, resolve_answered},
};
use crate::{
    error::AppError,
    models::{
        practice::{DailyQuestion, RetakeSetResponse, SubmitRetakeRequest, SubmitRetakeResponse},
        result::{NewResult, PracticeResult, ResultKind},
    },
    store::PracticeStore,
};

/// Re-serves the questions of the user's latest daily result.
///
/// Never touches the cursor. Questions removed from the bank since the
/// original attempt are left out.
pub async fn retake_set(
    store: &dyn PracticeStore,
    user_id: i64,
) -> Result<RetakeSetResponse, AppError> {
    let user = load_user(store, user_id).await?;

    let base = store
        .recent_results(user.id, ResultKind::Daily, 1)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound(
            "No completed daily set to retake".to_string(),
        ))?;

    let questions = store.questions_by_ids(&base.question_ids).await?;
    if questions.is_empty() {
        return Err(AppError::NotFound(
            "Questions of the last daily set are no longer available".to_string(),
        ));
    }

    Ok(RetakeSetResponse {
        questions: questions
            .into_iter()
            .zip(1..)
            .map(|(q, seq)| DailyQuestion::from_question(q, seq))
            .collect(),
        base_result_id: base.id,
    })
}

async fn owned_daily_result(
    store: &dyn PracticeStore,
    user_id: i64,
    result_id: i64,
) -> Result<PracticeResult, AppError> {
    store
        .find_result(result_id)
        .await?
        .filter(|r| r.user_id == user_id && r.kind == ResultKind::Daily)
        .ok_or(AppError::NotFound("Practice result not found".to_string()))
}

/// Grades a retake of a previous daily set.
///
/// Appends a `daily-retake` result linked to the base result. Progress is
/// left untouched.
pub async fn submit_retake(
    store: &dyn PracticeStore,
    user_id: i64,
    req: SubmitRetakeRequest,
) -> Result<SubmitRetakeResponse, AppError> {
    let user = load_user(store, user_id).await?;
    let base = owned_daily_result(store, user.id, req.base_result_id).await?;

    if let Some(stray) = req.answers.keys().find(|id| !base.question_ids.contains(*id)) {
        return Err(AppError::BadRequest(format!(
            "Question {} is not part of the retake set",
            stray
        )));
    }

    let questions = resolve_answered(store, &req.answers).await?;
    let graded = grade(&req.answers, &questions);

    let result = store
        .insert_result(NewResult {
            user_id: user.id,
            kind: ResultKind::DailyRetake,
            score: graded.score,
            total_questions: graded.total_questions,
            correct_answers: graded.correct_answers,
            question_ids: graded.question_ids,
            answers: graded.answers,
            base_result_id: Some(base.id),
        })
        .await?;

    Ok(SubmitRetakeResponse {
        score: graded.score,
        correct_answers: graded.correct_answers,
        total_questions: graded.total_questions,
        feedback: graded.feedback,
        kind: ResultKind::DailyRetake,
        result_id: result.id,
        base_result_id: base.id,
    })
}
