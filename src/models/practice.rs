// src/models/practice.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    question::Question,
    result::{PracticeResult, ResultKind},
    user::Plan,
};

/// DTO for sending a question to the client (excludes the answer).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    /// 1-based position of the question in the user's pass through the bank.
    pub sequence_number: i64,
}

impl DailyQuestion {
    pub fn from_question(q: Question, sequence_number: i64) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
            sequence_number,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySetResponse {
    pub questions: Vec<DailyQuestion>,
    pub plan: Plan,
    /// Cursor the set starts at.
    pub progress: i64,
    /// Size of the plan's bank window.
    pub total_questions: i64,
    pub can_practice: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// DTO for submitting the daily set.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDailyRequest {
    /// Key: Question ID. Value: selected option letter.
    pub answers: HashMap<i64, String>,

    /// Cursor the client was served at. A stale value is rejected with 409,
    /// which makes retried submissions safe.
    #[serde(default)]
    pub expected_cursor: Option<i64>,
}

/// Grading outcome for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub question_id: i64,
    pub correct: bool,
    pub correct_answer: String,
    pub user_answer: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDailyResponse {
    pub score: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
    pub feedback: Vec<AnswerFeedback>,
    /// Cursor after the advance.
    pub progress: i64,
    pub total_in_bank: i64,
    pub result_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetakeSetResponse {
    pub questions: Vec<DailyQuestion>,
    pub base_result_id: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRetakeRequest {
    pub base_result_id: i64,
    pub answers: HashMap<i64, String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRetakeResponse {
    pub score: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
    pub feedback: Vec<AnswerFeedback>,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub result_id: i64,
    pub base_result_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressSummary {
    pub current: i64,
    pub total: i64,
    pub percentage: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progress: ProgressSummary,
    pub can_practice_today: bool,
    pub last_practice_date: Option<NaiveDate>,
    pub daily_history: Vec<PracticeResult>,
    pub plan: Plan,
}
