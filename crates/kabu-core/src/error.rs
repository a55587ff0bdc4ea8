//! 공통 에러 타입.
//!
//! 파싱/지표 계산 자체는 실패하지 않는 순수 함수이므로, 이 에러는
//! 주로 입력 검증, 설정 로드, 외부 협력자(오라클/시세) 경계에서 사용됩니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum KabuError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력 (빈 텍스트 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 외부 오라클 에러
    #[error("오라클 에러: {0}")]
    Oracle(String),

    /// 시세 데이터 에러
    #[error("시세 데이터 에러: {0}")]
    MarketData(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),
}

/// 공통 Result 타입.
pub type KabuResult<T> = Result<T, KabuError>;

impl KabuError {
    /// 호출자에게 그대로 노출해야 하는 입력 에러인지 확인합니다.
    ///
    /// 오라클/시세 에러는 내부에서 복구(폴백)되는 것이 원칙입니다.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, KabuError::InvalidInput(_) | KabuError::NotFound(_))
    }
}

impl From<serde_json::Error> for KabuError {
    fn from(err: serde_json::Error) -> Self {
        KabuError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for KabuError {
    fn from(err: config::ConfigError) -> Self {
        KabuError::Config(err.to_string())
    }
}
