//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 비교표 파싱 (파일/stdin, JSON 또는 정렬된 표 출력)
//! - 단면 PSR 계산
//! - 피어 비교
//! - 시세 이력 조회와 시계열 PER/PSR

pub mod commands;
