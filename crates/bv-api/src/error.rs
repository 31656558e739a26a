use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::{borrow::Cow, future::Future};
use thiserror::Error;
use tracing::error;

use bv_common::db::{
    MatchStorageError, MigrationError, RecordFetchError, RiskStorageError, ScoreStorageError,
};
use bv_common::risk::RiskError;
use bv_common::scoring::ScoreError;

tokio::task_local! {
    static REQUEST_ID: String;
}

fn sanitize_message(message: &str) -> String {
    const MAX_LEN: usize = 240;

    let mut cleaned = message
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .replace(['\n', '\r'], " ");

    cleaned = cleaned
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if let Some((base, _)) = token.split_once('?') {
                if base.is_empty() {
                    "[redacted-query]".to_string()
                } else {
                    format!("{base}?[redacted]")
                }
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.len() > MAX_LEN {
        cleaned.truncate(MAX_LEN);
        cleaned.push('…');
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

pub async fn with_request_id<Fut, T>(request_id: Option<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    if let Some(request_id) = request_id {
        REQUEST_ID.scope(request_id, fut).await
    } else {
        fut.await
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|value| value.clone()).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("too many requests: {0}")]
    TooManyRequests(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let request_id = current_request_id();

        error!(
            code,
            status = %status,
            request_id = request_id.as_deref().unwrap_or(""),
            error = %self,
            "api_error"
        );

        metrics::counter!("bv_api_errors_total", "code" => code).increment(1);

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
            request_id,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unprocessable(_) => "unprocessable",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Database(_) => "database_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::TooManyRequests(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Unauthorized(_) => Cow::Borrowed("unauthorized"),
            ApiError::ServiceUnavailable(_) => Cow::Borrowed("service unavailable"),
            ApiError::Database(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ScoreError> for ApiError {
    fn from(value: ScoreError) -> Self {
        match value {
            ScoreError::InvalidInput { .. } => ApiError::Unprocessable(value.to_string()),
            ScoreError::MissingSubject { .. } => ApiError::NotFound(value.to_string()),
            ScoreError::ComputationFailure { .. } => ApiError::Internal(value.to_string()),
        }
    }
}

impl From<RiskError> for ApiError {
    fn from(value: RiskError) -> Self {
        match value {
            RiskError::ComputationFailure { .. } => ApiError::Internal(value.to_string()),
        }
    }
}

impl From<RecordFetchError> for ApiError {
    fn from(value: RecordFetchError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<ScoreStorageError> for ApiError {
    fn from(value: ScoreStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<RiskStorageError> for ApiError {
    fn from(value: RiskStorageError) -> Self {
        match value {
            RiskStorageError::NotReviewable(id) => ApiError::Conflict(format!(
                "assessment {id} is not in a reviewable state"
            )),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<MatchStorageError> for ApiError {
    fn from(value: MatchStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<MigrationError> for ApiError {
    fn from(value: MigrationError) -> Self {
        ApiError::Database(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;
    use bv_common::SubjectKind;

    #[tokio::test]
    async fn includes_request_id_in_response_body_when_present() {
        let err = ApiError::Internal("boom".into());
        let response = with_request_id(Some("req-123".into()), async { err.into_response() }).await;

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["request_id"], "req-123");
        assert_eq!(json["code"], "internal_error");
        assert_eq!(json["message"], "internal server error");
    }

    #[test]
    fn engine_errors_map_to_their_status_family() {
        let invalid: ApiError = ScoreError::InvalidInput {
            kind: SubjectKind::Business,
            subject_id: 1,
            field: "monthly_revenue",
            value: -2.0,
            reason: "negative",
        }
        .into();
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing: ApiError = ScoreError::MissingSubject {
            kind: SubjectKind::Business,
            subject_id: 1,
        }
        .into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let failed: ApiError = ScoreError::ComputationFailure {
            kind: SubjectKind::Business,
            subject_id: 1,
            reason: "no category".into(),
        }
        .into();
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let conflict: ApiError = RiskStorageError::NotReviewable(7).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn sanitizer_redacts_urls_and_paths() {
        let cleaned = sanitize_message("fetch postgres://user:pw@host/db at /etc/secret failed");
        assert!(cleaned.contains("[redacted-url]"));
        assert!(cleaned.contains("[redacted-path]"));
        assert!(!cleaned.contains("pw@host"));
    }
}
