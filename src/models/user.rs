// src/models/user.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'users' table, reduced to the columns practice cares about.
///
/// Accounts are created by the authentication service; `subscription_active`
/// is owned by the payments service. This crate only mutates the practice
/// cursor and the last practice date.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub email: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub subscription_active: bool,

    /// Number of bank questions already served, in bank order.
    pub current_question_index: i64,

    /// UTC calendar date of the last completed daily set.
    pub last_daily_date: Option<NaiveDate>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Subscription tier derived from the payments flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn of(user: &User) -> Self {
        if user.subscription_active {
            Plan::Pro
        } else {
            Plan::Free
        }
    }
}

/// DTO for toggling a user's subscription flag.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    pub active: bool,
}
