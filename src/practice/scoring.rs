// src/practice/scoring.rs

use std::collections::HashMap;

use crate::{
    error::AppError,
    models::{
        practice::AnswerFeedback,
        question::{Question, normalize_answer},
    },
    store::PracticeStore,
};

/// Outcome of grading one submission.
#[derive(Debug, Clone)]
pub struct Graded {
    pub correct_answers: i64,
    pub total_questions: i64,
    pub score: i64,
    pub feedback: Vec<AnswerFeedback>,
    pub question_ids: Vec<i64>,
    /// Submitted answers after normalisation.
    pub answers: HashMap<i64, String>,
}

/// Rounded percentage of correct answers. Zero questions score 0.
pub fn score_percentage(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as i64
}

/// Resolves every answered question against the bank.
///
/// Fails with 400 when nothing was answered or when any id is not in the bank.
pub async fn resolve_answered(
    store: &dyn PracticeStore,
    answers: &HashMap<i64, String>,
) -> Result<Vec<Question>, AppError> {
    if answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let ids: Vec<i64> = answers.keys().copied().collect();
    let questions = store.questions_by_ids(&ids).await?;

    if questions.len() != ids.len() {
        return Err(AppError::BadRequest(
            "Some submitted questions do not exist".to_string(),
        ));
    }

    Ok(questions)
}

/// Grades `answers` against the answer key in `questions`.
///
/// Answers are compared after trimming and lowercasing. Feedback follows the
/// order of `questions`.
pub fn grade(answers: &HashMap<i64, String>, questions: &[Question]) -> Graded {
    let mut correct_answers = 0;
    let mut feedback = Vec::with_capacity(questions.len());
    let mut normalized = HashMap::with_capacity(answers.len());

    for q in questions {
        let user_answer = answers
            .get(&q.id)
            .map(|a| normalize_answer(a))
            .unwrap_or_default();
        let correct = user_answer == q.correct_answer;
        if correct {
            correct_answers += 1;
        }

        normalized.insert(q.id, user_answer.clone());
        feedback.push(AnswerFeedback {
            question_id: q.id,
            correct,
            correct_answer: q.correct_answer.clone(),
            user_answer,
        });
    }

    let total_questions = questions.len() as i64;

    Graded {
        correct_answers,
        total_questions,
        score: score_percentage(correct_answers, total_questions),
        feedback,
        question_ids: questions.iter().map(|q| q.id).collect(),
        answers: normalized,
    }
}
