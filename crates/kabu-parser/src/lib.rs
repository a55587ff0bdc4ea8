//! # Kabu Parser
//!
//! 복사-붙여넣기된 일본 재무 비교표 텍스트를 [`ParsedTable`]로 변환합니다.
//!
//! 처리 순서:
//! 1. 단위 정규화 (`4,855 億円` → `4,855億円`)
//! 2. 토큰화 (헤더/행 두 가지 변형)
//! 3. 숫자형 토큰 판별
//! 4. (선택) 외부 오라클 호출 + 결과 검증
//! 5. 휴리스틱 헤더/행 파서 (오라클 실패 시 항상 이쪽으로)
//!
//! [`ParsedTable`]: kabu_core::ParsedTable

pub mod classify;
pub mod error;
pub mod heuristic;
pub mod normalize;
pub mod oracle;
pub mod service;
pub mod tokenizer;

pub use classify::is_numeric_like;
pub use error::{OracleError, ParseError, Result};
pub use heuristic::{parse_heuristic, parse_with_diagnostics, HeuristicParse, RowAlignment};
pub use normalize::normalize_units;
pub use oracle::{extract_json_object, parse_oracle_reply, validate_oracle_value, TableOracle, ORACLE_INSTRUCTION};
pub use service::{ParseOutcome, ParseSource, TableParser};
pub use tokenizer::{split_tokens, tokenize_header, tokenize_row};
