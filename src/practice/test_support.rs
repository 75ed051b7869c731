// src/practice/test_support.rs

use chrono::NaiveDate;

use crate::{
    config::PlanLimits,
    models::question::NewQuestion,
    store::{InMemoryStore, PracticeStore},
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
}

/// Store with `count` questions whose correct answer is "a".
pub async fn seeded_store(count: usize) -> (InMemoryStore, PlanLimits) {
    let store = InMemoryStore::new();
    for n in 1..=count {
        store
            .insert_question(NewQuestion {
                question: format!("Question {}", n),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
                correct_answer: "a".to_string(),
                explanation: None,
            })
            .await
            .unwrap();
    }
    (store, PlanLimits::default())
}

pub fn with_cursor(store: &InMemoryStore, user_id: i64, cursor: i64, last: Option<NaiveDate>) {
    let mut user = store.user(user_id).unwrap().expect("user exists");
    user.current_question_index = cursor;
    user.last_daily_date = last;
    store.put_user(user).unwrap();
}
