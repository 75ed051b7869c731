// src/seed.rs

use std::path::Path;

use crate::{error::AppError, models::question::CreateQuestionRequest, store::PracticeStore};

/// Seeds an empty question bank from a JSON array of questions.
///
/// The file holds the same shape the admin endpoint accepts. Entries are
/// inserted in file order, which becomes the serving order. A bank that
/// already holds questions is left alone. Returns the number inserted.
pub async fn seed_question_bank(store: &dyn PracticeStore, path: &Path) -> Result<usize, AppError> {
    if store.count_questions().await? > 0 {
        tracing::info!("Question bank already populated, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::InternalServerError(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let entries: Vec<CreateQuestionRequest> = serde_json::from_str(&raw)?;

    // Validate everything before writing anything.
    let mut rows = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let row = entry.into_new_question().map_err(|e| {
            AppError::BadRequest(format!("Seed question #{} is invalid: {}", index + 1, e))
        })?;
        rows.push(row);
    }

    let count = rows.len();
    for row in rows {
        store.insert_question(row).await?;
    }

    tracing::info!("Seeded {} questions from {}", count, path.display());
    Ok(count)
}
