//! # Kabu Core
//!
//! 일본 재무 비교표 파싱/지표 계산 시스템의 공통 타입과 인프라를 제공합니다.
//!
//! - 파싱 결과(`ParsedTable`)와 행 모델
//! - 기업 지표 스냅샷, 평균 지표
//! - 시세 이력/재무 이력 모델
//! - 단위 배율 테이블 (兆/億/百万/千/円/倍/%)
//! - 설정 관리, 로깅 초기화, 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
