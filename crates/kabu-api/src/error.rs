//! 통합 API 에러 응답 타입.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use kabu_core::KabuError;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "EMPTY_INPUT",
///   "message": "Empty input: text is required",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "EMPTY_INPUT", "MARKET_DATA_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 타임스탬프를 포함한 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 핸들러 에러 타입.
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// 핸들러 Result 타입.
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// 상태 코드와 함께 에러 응답을 만듭니다.
pub fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 도메인 에러를 HTTP 에러로 변환합니다.
pub fn from_kabu_error(err: KabuError) -> ApiError {
    let (status, code) = match &err {
        KabuError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        KabuError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        KabuError::MarketData(_) => (StatusCode::BAD_GATEWAY, "MARKET_DATA_ERROR"),
        KabuError::Oracle(_) => (StatusCode::BAD_GATEWAY, "ORACLE_ERROR"),
        KabuError::Config(_) | KabuError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };
    api_error(status, code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_timestamp() {
        let error = ApiErrorResponse::new("EMPTY_INPUT", "text is required");
        assert_eq!(error.code, "EMPTY_INPUT");
        assert!(error.timestamp.is_some());
        assert_eq!(error.to_string(), "[EMPTY_INPUT] text is required");
    }

    #[test]
    fn test_from_kabu_error() {
        let (status, Json(body)) = from_kabu_error(KabuError::NotFound("7203".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");

        let (status, _) = from_kabu_error(KabuError::MarketData("timeout".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
