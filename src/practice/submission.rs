// src/practice/submission.rs

use chrono::NaiveDate;

use super::{
    completed_today, load_user,
    scoring::{grade, resolve_answered},
    tier_limits,
};
use crate::{
    config::PlanLimits,
    error::AppError,
    models::{
        practice::{SubmitDailyRequest, SubmitDailyResponse},
        result::{NewResult, ResultKind},
        user::Plan,
    },
    store::{DailyCommit, PracticeStore},
};

const STALE_CURSOR_MESSAGE: &str =
    "Practice progress has moved on since these questions were served. Reload today's set.";

/// Grades the daily set and advances the user's progress.
///
/// * Rejects empty submissions and unknown question ids (400).
/// * Rejects a second completion on the same day for gated plans (409).
/// * Commits cursor advance, practice date and result as one compare-and-set
///   on the cursor the answers were graded against. A lost race yields 409
///   and writes nothing.
pub async fn submit_daily(
    store: &dyn PracticeStore,
    limits: &PlanLimits,
    user_id: i64,
    req: SubmitDailyRequest,
    today: NaiveDate,
) -> Result<SubmitDailyResponse, AppError> {
    let user = load_user(store, user_id).await?;
    let tier = tier_limits(limits, Plan::of(&user));

    if completed_today(&user, &tier, today) {
        return Err(AppError::Conflict(
            "Today's practice has already been submitted".to_string(),
        ));
    }

    let expected_cursor = req.expected_cursor.unwrap_or(user.current_question_index);
    if expected_cursor != user.current_question_index {
        return Err(AppError::Conflict(STALE_CURSOR_MESSAGE.to_string()));
    }

    let questions = resolve_answered(store, &req.answers).await?;
    let graded = grade(&req.answers, &questions);
    let new_cursor = expected_cursor + tier.questions_per_day;

    let commit = DailyCommit {
        user_id: user.id,
        expected_cursor,
        new_cursor,
        practiced_on: today,
        result: NewResult {
            user_id: user.id,
            kind: ResultKind::Daily,
            score: graded.score,
            total_questions: graded.total_questions,
            correct_answers: graded.correct_answers,
            question_ids: graded.question_ids,
            answers: graded.answers,
            base_result_id: None,
        },
    };

    let result = store.commit_daily(commit).await?.ok_or_else(|| {
        tracing::warn!(
            "Daily submission for user {} lost the race at cursor {}",
            user.id,
            expected_cursor
        );
        AppError::Conflict(STALE_CURSOR_MESSAGE.to_string())
    })?;

    tracing::info!(
        "User {} scored {}% on daily set, cursor {} -> {}",
        user.id,
        graded.score,
        expected_cursor,
        new_cursor
    );

    Ok(SubmitDailyResponse {
        score: graded.score,
        correct_answers: graded.correct_answers,
        total_questions: graded.total_questions,
        feedback: graded.feedback,
        progress: new_cursor,
        total_in_bank: tier.bank_size,
        result_id: result.id,
    })
}
