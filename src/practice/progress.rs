// src/practice/progress.rs

use chrono::NaiveDate;

use super::{completed_today, load_user, scoring::score_percentage, tier_limits};
use crate::{
    config::{HISTORY_LIMIT, PlanLimits},
    error::AppError,
    models::{
        practice::{ProgressResponse, ProgressSummary},
        result::ResultKind,
        user::Plan,
    },
    store::PracticeStore,
};

/// Progress through the bank window plus recent daily history. Read-only.
pub async fn progress(
    store: &dyn PracticeStore,
    limits: &PlanLimits,
    user_id: i64,
    today: NaiveDate,
) -> Result<ProgressResponse, AppError> {
    let user = load_user(store, user_id).await?;
    let plan = Plan::of(&user);
    let tier = tier_limits(limits, plan);

    // The cursor may sit past the window until the next allocation rewinds it.
    let current = user.current_question_index.min(tier.bank_size);

    let daily_history = store
        .recent_results(user.id, ResultKind::Daily, HISTORY_LIMIT)
        .await?;

    Ok(ProgressResponse {
        progress: ProgressSummary {
            current,
            total: tier.bank_size,
            percentage: score_percentage(current, tier.bank_size),
        },
        can_practice_today: !completed_today(&user, &tier, today),
        last_practice_date: user.last_daily_date,
        daily_history,
        plan,
    })
}
