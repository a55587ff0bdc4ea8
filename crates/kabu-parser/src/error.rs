//! 파서 에러 타입.

use thiserror::Error;

/// 파싱 진입점 에러.
///
/// 휴리스틱 파서는 어떤 입력에도 실패하지 않으므로, 호출자에게 전달되는
/// 에러는 입력 검증 실패뿐입니다.
#[derive(Debug, Error)]
pub enum ParseError {
    /// 빈 입력 또는 공백만 있는 입력
    #[error("Empty input: text is required")]
    EmptyInput,
}

/// 오라클 호출/응답 에러.
///
/// 이 에러는 서비스 내부에서 경고 로그로만 남기고 휴리스틱 파서로 넘어갑니다.
#[derive(Debug, Error)]
pub enum OracleError {
    /// 요청 실패 (네트워크, 타임아웃 등)
    #[error("Oracle request failed: {0}")]
    Request(String),

    /// HTTP 오류 응답
    #[error("Oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 응답에 내용이 없음
    #[error("Oracle returned an empty reply")]
    EmptyReply,

    /// 응답에서 JSON 객체를 찾지 못함
    #[error("No JSON object found in oracle reply")]
    NoJsonObject,

    /// JSON 파싱 실패
    #[error("Malformed JSON in oracle reply: {0}")]
    MalformedJson(String),

    /// 스키마/정합성 검증 실패
    #[error("Oracle result rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        OracleError::MalformedJson(err.to_string())
    }
}

impl From<OracleError> for kabu_core::KabuError {
    fn from(err: OracleError) -> Self {
        kabu_core::KabuError::Oracle(err.to_string())
    }
}

impl From<ParseError> for kabu_core::KabuError {
    fn from(err: ParseError) -> Self {
        kabu_core::KabuError::InvalidInput(err.to_string())
    }
}

/// 파서 Result 타입.
pub type Result<T> = std::result::Result<T, ParseError>;
