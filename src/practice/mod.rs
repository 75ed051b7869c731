// src/practice/mod.rs

//! Daily practice engine: allocation, submission, retakes and progress.
//!
//! Every entry point takes the calendar date it runs on, so callers decide
//! the clock (handlers pass the current UTC date).

use chrono::NaiveDate;

use crate::{
    config::{PlanLimits, TierLimits},
    error::AppError,
    models::user::{Plan, User},
    store::PracticeStore,
};

pub mod allocation;
pub mod progress;
pub mod retake;
pub mod scoring;
pub mod submission;

#[cfg(test)]
mod test_support;

pub use allocation::daily_set;
pub use progress::progress;
pub use retake::{retake_set, submit_retake};
pub use submission::submit_daily;

pub const DAILY_LIMIT_MESSAGE: &str =
    "You have already completed today's practice. Come back tomorrow!";
pub const NO_QUESTIONS_MESSAGE: &str =
    "No questions available right now. Please check back later.";

/// Limits that apply to a plan.
pub fn tier_limits(limits: &PlanLimits, plan: Plan) -> TierLimits {
    match plan {
        Plan::Free => limits.free,
        Plan::Pro => limits.pro,
    }
}

/// Whether the user's plan is gated and the daily set was already completed on `today`.
pub fn completed_today(user: &User, tier: &TierLimits, today: NaiveDate) -> bool {
    tier.daily_gate && user.last_daily_date == Some(today)
}

async fn load_user(store: &dyn PracticeStore, user_id: i64) -> Result<User, AppError> {
    store
        .find_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}
