// src/practice/allocation.rs

use chrono::NaiveDate;

use super::{
    DAILY_LIMIT_MESSAGE, NO_QUESTIONS_MESSAGE, completed_today, load_user, tier_limits,
};
use crate::{
    config::PlanLimits,
    error::AppError,
    models::{
        practice::{DailyQuestion, DailySetResponse},
        user::Plan,
    },
    store::PracticeStore,
};

fn closed(plan: Plan, cursor: i64, bank_size: i64, message: &str) -> DailySetResponse {
    DailySetResponse {
        questions: Vec::new(),
        plan,
        progress: cursor,
        total_questions: bank_size,
        can_practice: false,
        message: Some(message.to_string()),
    }
}

/// Computes the user's daily set.
///
/// * Gated plans that already completed a set on `today` get an empty, closed set.
/// * A cursor at or past the plan's bank window is rewound to 0 first.
/// * Questions come back answer-stripped, numbered from `cursor + 1`.
///
/// Expected conditions (daily limit, empty bank) are reported through
/// `can_practice = false` rather than as errors.
pub async fn daily_set(
    store: &dyn PracticeStore,
    limits: &PlanLimits,
    user_id: i64,
    today: NaiveDate,
) -> Result<DailySetResponse, AppError> {
    let user = load_user(store, user_id).await?;
    let plan = Plan::of(&user);
    let tier = tier_limits(limits, plan);

    if completed_today(&user, &tier, today) {
        return Ok(closed(
            plan,
            user.current_question_index,
            tier.bank_size,
            DAILY_LIMIT_MESSAGE,
        ));
    }

    let mut cursor = user.current_question_index;
    if cursor >= tier.bank_size {
        cursor = store.rewind_exhausted_cursor(user.id, tier.bank_size).await?;
        tracing::info!(
            "Rewound practice cursor for user {} to {} (bank size {})",
            user.id,
            cursor,
            tier.bank_size
        );
    }

    let remaining = (tier.bank_size - cursor).max(0);
    let limit = tier.questions_per_day.min(remaining);
    let questions = store.question_window(cursor, limit).await?;

    if questions.is_empty() {
        tracing::warn!(
            "No questions left for user {} at cursor {} (bank size {})",
            user.id,
            cursor,
            tier.bank_size
        );
        return Ok(closed(plan, cursor, tier.bank_size, NO_QUESTIONS_MESSAGE));
    }

    let questions = questions
        .into_iter()
        .zip(cursor + 1..)
        .map(|(q, seq)| DailyQuestion::from_question(q, seq))
        .collect();

    Ok(DailySetResponse {
        questions,
        plan,
        progress: cursor,
        total_questions: tier.bank_size,
        can_practice: true,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::test_support::{seeded_store, today, with_cursor};

    #[tokio::test]
    async fn free_user_gets_two_questions_from_cursor() {
        let (store, limits) = seeded_store(20).await;
        let user = store.add_user("free@example.com", "user", false).unwrap();

        let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
        assert!(set.can_practice);
        assert_eq!(set.plan, Plan::Free);
        assert_eq!(set.total_questions, 100);
        let seqs: Vec<i64> = set.questions.iter().map(|q| q.sequence_number).collect();
        assert_eq!(seqs, vec![1, 2]);
    }

    #[tokio::test]
    async fn pro_sequence_numbers_follow_cursor() {
        let (store, limits) = seeded_store(40).await;
        let user = store.add_user("pro@example.com", "user", true).unwrap();
        with_cursor(&store, user.id, 20, None);

        let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
        let seqs: Vec<i64> = set.questions.iter().map(|q| q.sequence_number).collect();
        assert_eq!(seqs, (21..=30).collect::<Vec<i64>>());
        assert_eq!(set.questions[0].id, 21);
        assert_eq!(set.plan, Plan::Pro);
    }

    #[tokio::test]
    async fn free_user_is_gated_after_completing_today() {
        let (store, limits) = seeded_store(20).await;
        let user = store.add_user("free@example.com", "user", false).unwrap();
        with_cursor(&store, user.id, 2, Some(today()));

        for _ in 0..2 {
            let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
            assert!(!set.can_practice);
            assert!(set.questions.is_empty());
            assert_eq!(set.message.as_deref(), Some(DAILY_LIMIT_MESSAGE));
        }

        let tomorrow = today().succ_opt().unwrap();
        let set = daily_set(&store, &limits, user.id, tomorrow).await.unwrap();
        assert!(set.can_practice);
    }

    #[tokio::test]
    async fn pro_user_is_not_gated_by_default() {
        let (store, limits) = seeded_store(40).await;
        let user = store.add_user("pro@example.com", "user", true).unwrap();
        with_cursor(&store, user.id, 10, Some(today()));

        let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
        assert!(set.can_practice);
        assert_eq!(set.questions.len(), 10);
    }

    #[tokio::test]
    async fn exhausted_cursor_wraps_to_start() {
        let (store, limits) = seeded_store(120).await;
        let user = store.add_user("free@example.com", "user", false).unwrap();
        with_cursor(&store, user.id, 101, None);

        let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
        assert_eq!(set.progress, 0);
        assert_eq!(set.questions[0].sequence_number, 1);
        assert_eq!(set.questions[0].id, 1);

        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.current_question_index, 0);
    }

    #[tokio::test]
    async fn slice_stops_at_window_edge() {
        let (store, limits) = seeded_store(120).await;
        let user = store.add_user("free@example.com", "user", false).unwrap();
        with_cursor(&store, user.id, 99, None);

        let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.questions[0].sequence_number, 100);
    }

    #[tokio::test]
    async fn empty_bank_reports_unavailable() {
        let (store, limits) = seeded_store(0).await;
        let user = store.add_user("free@example.com", "user", false).unwrap();

        let set = daily_set(&store, &limits, user.id, today()).await.unwrap();
        assert!(!set.can_practice);
        assert_eq!(set.message.as_deref(), Some(NO_QUESTIONS_MESSAGE));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (store, limits) = seeded_store(2).await;
        let err = daily_set(&store, &limits, 404, today()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
