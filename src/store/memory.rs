// src/store/memory.rs

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;

use super::{DailyCommit, PracticeStore, StoreError};
use crate::models::{
    question::{NewQuestion, Question},
    result::{NewResult, PracticeResult, ResultKind},
    user::User,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    questions: BTreeMap<i64, Question>,
    results: Vec<PracticeResult>,
    next_user_id: i64,
    next_question_id: i64,
    next_result_id: i64,
}

impl Tables {
    fn append_result(&mut self, result: NewResult) -> PracticeResult {
        self.next_result_id += 1;
        let row = PracticeResult {
            id: self.next_result_id,
            user_id: result.user_id,
            kind: result.kind,
            score: result.score,
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            question_ids: result.question_ids,
            answers: Json(result.answers),
            base_result_id: result.base_result_id,
            created_at: Some(Utc::now()),
        };
        self.results.push(row.clone());
        row
    }
}

/// In-memory store for tests and local runs without a database.
///
/// Every operation runs under one lock, so conditional updates are atomic
/// exactly as they are in PostgreSQL.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Register an account, standing in for the authentication service.
    pub fn add_user(&self, email: &str, role: &str, subscription_active: bool) -> Result<User, StoreError> {
        let mut tables = self.lock()?;
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: email.to_string(),
            role: role.to_string(),
            subscription_active,
            current_question_index: 0,
            last_daily_date: None,
            created_at: Some(Utc::now()),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }

    /// Overwrite a user's practice record.
    pub fn put_user(&self, user: User) -> Result<(), StoreError> {
        self.lock()?.users.insert(user.id, user);
        Ok(())
    }

    /// Number of stored results across all users.
    pub fn result_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.results.len())
    }
}

#[async_trait]
impl PracticeStore for InMemoryStore {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }

    async fn rewind_exhausted_cursor(
        &self,
        user_id: i64,
        bank_size: i64,
    ) -> Result<i64, StoreError> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::NotFound("User"))?;
        if user.current_question_index >= bank_size {
            user.current_question_index = 0;
        }
        Ok(user.current_question_index)
    }

    async fn question_window(&self, offset: i64, limit: i64) -> Result<Vec<Question>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .questions
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .questions
            .values()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn commit_daily(
        &self,
        commit: DailyCommit,
    ) -> Result<Option<PracticeResult>, StoreError> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .get_mut(&commit.user_id)
            .ok_or(StoreError::NotFound("User"))?;

        if user.current_question_index != commit.expected_cursor {
            return Ok(None);
        }
        user.current_question_index = commit.new_cursor;
        user.last_daily_date = Some(commit.practiced_on);

        Ok(Some(tables.append_result(commit.result)))
    }

    async fn insert_result(&self, result: NewResult) -> Result<PracticeResult, StoreError> {
        Ok(self.lock()?.append_result(result))
    }

    async fn find_result(&self, result_id: i64) -> Result<Option<PracticeResult>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.results.iter().find(|r| r.id == result_id).cloned())
    }

    async fn recent_results(
        &self,
        user_id: i64,
        kind: ResultKind,
        limit: i64,
    ) -> Result<Vec<PracticeResult>, StoreError> {
        let tables = self.lock()?;
        // Ids grow with insertion, so reverse order is newest first.
        Ok(tables
            .results
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id && r.kind == kind)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, StoreError> {
        let mut tables = self.lock()?;
        tables.next_question_id += 1;
        let row = Question {
            id: tables.next_question_id,
            question: question.question,
            options: question.options,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
            created_at: Some(Utc::now()),
        };
        tables.questions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        Ok(self.lock()?.questions.values().cloned().collect())
    }

    async fn count_questions(&self) -> Result<i64, StoreError> {
        Ok(self.lock()?.questions.len() as i64)
    }

    async fn delete_question(&self, question_id: i64) -> Result<bool, StoreError> {
        Ok(self.lock()?.questions.remove(&question_id).is_some())
    }

    async fn set_subscription(&self, user_id: i64, active: bool) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        match tables.users.get_mut(&user_id) {
            Some(user) => {
                user.subscription_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        if tables.users.remove(&user_id).is_none() {
            return Ok(false);
        }
        tables.results.retain(|r| r.user_id != user_id);
        Ok(true)
    }
}
