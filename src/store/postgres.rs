// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use super::{DailyCommit, PracticeStore, StoreError};
use crate::models::{
    question::{NewQuestion, Question},
    result::{NewResult, PracticeResult, ResultKind},
    user::User,
};

const USER_COLUMNS: &str = "id, email, role, subscription_active, current_question_index, \
     last_daily_date, created_at";

const QUESTION_COLUMNS: &str = "id, question, options, correct_answer, explanation, created_at";

const RESULT_COLUMNS: &str = "id, user_id, kind, score, total_questions, correct_answers, \
     question_ids, answers, base_result_id, created_at";

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends a result using the given executor (pool or open transaction).
async fn insert_result_with<'e, E>(executor: E, result: &NewResult) -> Result<PracticeResult, StoreError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO results \
             (user_id, kind, score, total_questions, correct_answers, question_ids, answers, base_result_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {RESULT_COLUMNS}"
    );

    let row = sqlx::query_as::<_, PracticeResult>(&sql)
        .bind(result.user_id)
        .bind(result.kind.as_str())
        .bind(result.score)
        .bind(result.total_questions)
        .bind(result.correct_answers)
        .bind(&result.question_ids)
        .bind(Json(&result.answers))
        .bind(result.base_result_id)
        .fetch_one(executor)
        .await?;

    Ok(row)
}

#[async_trait]
impl PracticeStore for PgStore {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn rewind_exhausted_cursor(
        &self,
        user_id: i64,
        bank_size: i64,
    ) -> Result<i64, StoreError> {
        let cursor: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET current_question_index = CASE
                WHEN current_question_index >= $2 THEN 0
                ELSE current_question_index
            END
            WHERE id = $1
            RETURNING current_question_index
            "#,
        )
        .bind(user_id)
        .bind(bank_size)
        .fetch_optional(&self.pool)
        .await?;

        cursor.ok_or(StoreError::NotFound("User"))
    }

    async fn question_window(&self, offset: i64, limit: i64) -> Result<Vec<Question>, StoreError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id OFFSET $1 LIMIT $2");
        let questions = sqlx::query_as::<_, Question>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(questions)
    }

    async fn questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ANY($1) ORDER BY id");
        let questions = sqlx::query_as::<_, Question>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(questions)
    }

    async fn commit_daily(
        &self,
        commit: DailyCommit,
    ) -> Result<Option<PracticeResult>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-set on the cursor the answers were graded against.
        let advanced = sqlx::query(
            r#"
            UPDATE users
            SET current_question_index = $3, last_daily_date = $4
            WHERE id = $1 AND current_question_index = $2
            "#,
        )
        .bind(commit.user_id)
        .bind(commit.expected_cursor)
        .bind(commit.new_cursor)
        .bind(commit.practiced_on)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if advanced == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = insert_result_with(&mut *tx, &commit.result).await?;
        tx.commit().await?;

        Ok(Some(result))
    }

    async fn insert_result(&self, result: NewResult) -> Result<PracticeResult, StoreError> {
        insert_result_with(&self.pool, &result).await
    }

    async fn find_result(&self, result_id: i64) -> Result<Option<PracticeResult>, StoreError> {
        let sql = format!("SELECT {RESULT_COLUMNS} FROM results WHERE id = $1");
        let result = sqlx::query_as::<_, PracticeResult>(&sql)
            .bind(result_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(result)
    }

    async fn recent_results(
        &self,
        user_id: i64,
        kind: ResultKind,
        limit: i64,
    ) -> Result<Vec<PracticeResult>, StoreError> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM results \
             WHERE user_id = $1 AND kind = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        let results = sqlx::query_as::<_, PracticeResult>(&sql)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(results)
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, StoreError> {
        let sql = format!(
            "INSERT INTO questions (question, options, correct_answer, explanation) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {QUESTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Question>(&sql)
            .bind(&question.question)
            .bind(&question.options)
            .bind(&question.correct_answer)
            .bind(&question.explanation)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id");
        let questions = sqlx::query_as::<_, Question>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(questions)
    }

    async fn count_questions(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_question(&self, question_id: i64) -> Result<bool, StoreError> {
        let deleted = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn set_subscription(&self, user_id: i64, active: bool) -> Result<bool, StoreError> {
        let updated = sqlx::query("UPDATE users SET subscription_active = $2 WHERE id = $1")
            .bind(user_id)
            .bind(active)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(updated > 0)
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError> {
        // results.user_id cascades on delete
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
