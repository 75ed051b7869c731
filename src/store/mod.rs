// src/store/mod.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    question::{NewQuestion, Question},
    result::{NewResult, PracticeResult, ResultKind},
    user::User,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Store handle shared through `AppState`.
pub type SharedStore = Arc<dyn PracticeStore>;

/// Everything a completed daily set writes, committed as one unit.
#[derive(Debug, Clone)]
pub struct DailyCommit {
    pub user_id: i64,
    /// Cursor the submission was graded against.
    pub expected_cursor: i64,
    pub new_cursor: i64,
    pub practiced_on: NaiveDate,
    pub result: NewResult,
}

/// Repository contract for users, the question bank and results.
#[async_trait]
pub trait PracticeStore: Send + Sync {
    /// Fetch a user's practice record.
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    /// Reset the cursor to 0 if it has reached `bank_size`, in one conditional update.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user is missing.
    async fn rewind_exhausted_cursor(&self, user_id: i64, bank_size: i64)
    -> Result<i64, StoreError>;

    /// Read up to `limit` questions in bank order, skipping the first `offset`.
    async fn question_window(&self, offset: i64, limit: i64) -> Result<Vec<Question>, StoreError>;

    /// Fetch the given questions in bank order. Unknown ids are skipped.
    async fn questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError>;

    /// Advance the cursor, stamp the practice date and append the result together.
    ///
    /// Returns `None` and writes nothing when the cursor no longer equals
    /// `expected_cursor`.
    async fn commit_daily(&self, commit: DailyCommit)
    -> Result<Option<PracticeResult>, StoreError>;

    /// Append a result that does not touch progress.
    async fn insert_result(&self, result: NewResult) -> Result<PracticeResult, StoreError>;

    async fn find_result(&self, result_id: i64) -> Result<Option<PracticeResult>, StoreError>;

    /// Most recent results of one kind, newest first.
    async fn recent_results(
        &self,
        user_id: i64,
        kind: ResultKind,
        limit: i64,
    ) -> Result<Vec<PracticeResult>, StoreError>;

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, StoreError>;

    async fn list_questions(&self) -> Result<Vec<Question>, StoreError>;

    async fn count_questions(&self) -> Result<i64, StoreError>;

    /// Returns `false` if no such question existed.
    async fn delete_question(&self, question_id: i64) -> Result<bool, StoreError>;

    /// Returns `false` if no such user existed.
    async fn set_subscription(&self, user_id: i64, active: bool) -> Result<bool, StoreError>;

    /// Delete a user together with their results. Returns `false` if no such user existed.
    async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError>;
}
