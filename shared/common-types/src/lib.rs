//! Wire types shared by the question and answer services

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Request to create a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    /// Question text (may be empty)
    pub text: String,
}

/// A question as returned by the question service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    /// Opaque identifier assigned at creation
    pub id: String,
    /// Question text
    pub text: String,
    /// Creation time (RFC 3339, UTC)
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
}

/// Request to create an answer for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    /// Identifier of the question being answered
    pub question_id: String,
    /// Answer text
    pub answer_text: String,
}

/// An answer as returned by the answer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    /// Opaque identifier, unique per creation call
    pub id: String,
    /// Identifier of the answered question
    pub question_id: String,
    /// Answer text
    pub answer_text: String,
    /// Creation time (RFC 3339, UTC)
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
}

/// Stable machine-readable error tokens returned to callers
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    QuestionCreateError,
    QuestionGetError,
    QuestionNotFound,
    QuestionProcessError,
    AnswerCreateError,
    AnswerGetError,
    AnswerNotFound,
    InvalidRequestBody,
    RequestTimeout,
    InternalError,
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable error code
    pub error_code: Option<ErrorCode>,
    /// HTTP status code of the response
    pub status_code: u16,
}
