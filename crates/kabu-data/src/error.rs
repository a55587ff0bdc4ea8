//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 외부 데이터 소스 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 클라이언트/커넥터 생성 실패
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 외부 소스 조회 실패
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 응답 파싱 실패
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 조회 결과 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 잘못된 입력
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<DataError> for kabu_core::KabuError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => kabu_core::KabuError::NotFound(msg),
            DataError::InvalidData(msg) => kabu_core::KabuError::InvalidInput(msg),
            DataError::ConfigError(msg) => kabu_core::KabuError::Config(msg),
            other => kabu_core::KabuError::MarketData(other.to_string()),
        }
    }
}

/// 데이터 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;
