//! CLI 명령어 구현 모듈.

pub mod compare;
pub mod history;
pub mod output;
pub mod parse;
pub mod psr;

// 각 서브모듈 직접 사용 권장 (ambiguous re-export 방지)
