// src/models/question.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::html::clean_html;

/// Maximum number of options a question may carry (one per letter).
pub const MAX_OPTIONS: usize = 26;

static ANSWER_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Za-z]\s*$").expect("answer letter pattern is valid")
});

/// Represents the 'questions' table in the database.
/// The bank is served in ascending `id` order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// The question stem (sanitised HTML).
    pub question: String,

    /// Option texts. The first option is addressed as "a", the second as "b", and so on.
    pub options: Vec<String>,

    /// Letter of the correct option, always stored lowercase.
    pub correct_answer: String,

    /// Explanation shown after grading.
    pub explanation: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Position addressed by an option identifier, if it is a single letter.
pub fn option_index(letter: &str) -> Option<usize> {
    let normalized = normalize_answer(letter);
    let mut chars = normalized.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Some((c as u8 - b'a') as usize),
        _ => None,
    }
}

/// Canonical form of a submitted or stored option identifier.
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// New question ready to be written to the bank.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// DTO for adding a question to the bank.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_answer_in_range"))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub question: String,
    #[validate(custom(function = "validate_options"))]
    pub options: Vec<String>,
    #[validate(custom(function = "validate_answer_letter"))]
    pub correct_answer: String,
    #[validate(length(max = 4000))]
    pub explanation: Option<String>,
}

impl CreateQuestionRequest {
    /// Validates the payload and converts it into a sanitised, normalised row.
    pub fn into_new_question(self) -> Result<NewQuestion, validator::ValidationErrors> {
        self.validate()?;
        Ok(NewQuestion {
            question: clean_html(&self.question),
            options: self.options.iter().map(|o| clean_html(o)).collect(),
            correct_answer: normalize_answer(&self.correct_answer),
            explanation: self.explanation.as_deref().map(clean_html),
        })
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_options"));
    }
    if options.len() > MAX_OPTIONS {
        return Err(validator::ValidationError::new("too_many_options"));
    }
    for opt in options {
        if opt.trim().is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_empty"));
        }
        if opt.len() > 1000 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_answer_letter(answer: &str) -> Result<(), validator::ValidationError> {
    if !ANSWER_LETTER.is_match(answer) {
        return Err(validator::ValidationError::new("answer_must_be_a_letter"));
    }
    Ok(())
}

fn validate_answer_in_range(req: &CreateQuestionRequest) -> Result<(), validator::ValidationError> {
    match option_index(&req.correct_answer) {
        Some(index) if index < req.options.len() => Ok(()),
        _ => Err(validator::ValidationError::new("answer_outside_options")),
    }
}
