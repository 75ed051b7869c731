// src/docs.rs

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::{admin, health, practice},
    models::{
        practice::{
            AnswerFeedback, DailyQuestion, DailySetResponse, ProgressResponse, ProgressSummary,
            RetakeSetResponse, SubmitDailyRequest, SubmitDailyResponse, SubmitRetakeRequest,
            SubmitRetakeResponse,
        },
        question::{CreateQuestionRequest, Question},
        result::{PracticeResult, ResultKind},
        user::{Plan, SubscriptionRequest},
    },
};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "GMAT daily practice API"),
    paths(
        health::health,
        practice::get_daily,
        practice::submit_daily,
        practice::get_retake,
        practice::submit_retake,
        practice::get_progress,
        admin::create_question,
        admin::list_questions,
        admin::delete_question,
        admin::set_subscription,
        admin::delete_user,
    ),
    components(schemas(
        AnswerFeedback,
        CreateQuestionRequest,
        DailyQuestion,
        DailySetResponse,
        Plan,
        PracticeResult,
        ProgressResponse,
        ProgressSummary,
        Question,
        ResultKind,
        RetakeSetResponse,
        SubmitDailyRequest,
        SubmitDailyResponse,
        SubmitRetakeRequest,
        SubmitRetakeResponse,
        SubscriptionRequest,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
