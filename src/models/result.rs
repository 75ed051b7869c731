// src/models/result.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use thiserror::Error;
use utoipa::ToSchema;

/// Kind of attempt a result records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ResultKind {
    Daily,
    DailyRetake,
}

#[derive(Debug, Error)]
#[error("unknown result kind: {0}")]
pub struct UnknownResultKind(String);

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Daily => "daily",
            ResultKind::DailyRetake => "daily-retake",
        }
    }
}

impl TryFrom<String> for ResultKind {
    type Error = UnknownResultKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "daily" => Ok(ResultKind::Daily),
            "daily-retake" => Ok(ResultKind::DailyRetake),
            _ => Err(UnknownResultKind(value)),
        }
    }
}

/// Represents the append-only 'results' table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub id: i64,
    pub user_id: i64,

    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub kind: ResultKind,

    /// Percentage, 0 to 100.
    pub score: i64,
    pub total_questions: i64,
    pub correct_answers: i64,

    /// Questions of the attempt, in bank order.
    pub question_ids: Vec<i64>,

    /// Normalised answers keyed by question id.
    #[schema(value_type = Object)]
    pub answers: Json<HashMap<i64, String>>,

    /// Daily result a retake was based on.
    pub base_result_id: Option<i64>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Result row ready to be appended.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub user_id: i64,
    pub kind: ResultKind,
    pub score: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub question_ids: Vec<i64>,
    pub answers: HashMap<i64, String>,
    pub base_result_id: Option<i64>,
}
