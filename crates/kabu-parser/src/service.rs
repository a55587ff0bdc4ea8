//! 파싱 서비스.
//!
//! 오라클이 있으면 먼저 시도하고, 실패하면 휴리스틱 파서 결과를 반환합니다.
//! 오라클 실패는 경고 로그로만 남기며 호출자에게 전달하지 않습니다.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use kabu_core::ParsedTable;

use crate::error::{ParseError, Result};
use crate::heuristic::{parse_with_diagnostics, RowAlignment};
use crate::normalize::normalize_units;
use crate::oracle::{parse_oracle_reply, TableOracle, ORACLE_INSTRUCTION};

/// 결과를 만든 경로.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    /// 검증을 통과한 오라클 결과
    Oracle,
    /// 휴리스틱 파서 결과
    Heuristic,
}

/// 진단 정보를 포함한 파싱 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub table: ParsedTable,
    pub source: ParseSource,
    /// 휴리스틱 경로에서 헤더 줄을 찾았는지 (오라클 결과는 항상 true)
    pub header_detected: bool,
    /// 휴리스틱 경로의 행별 정렬 방식 (오라클 결과는 비어 있음)
    pub alignments: Vec<RowAlignment>,
}

/// 비교표 파서.
///
/// 상태가 없으므로 여러 요청에서 `Arc`로 공유해도 됩니다.
#[derive(Clone, Default)]
pub struct TableParser {
    oracle: Option<Arc<dyn TableOracle>>,
}

impl TableParser {
    /// 휴리스틱만 사용하는 파서.
    pub fn heuristic_only() -> Self {
        Self { oracle: None }
    }

    /// 오라클을 먼저 시도하는 파서.
    pub fn with_oracle(oracle: Arc<dyn TableOracle>) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// 오라클 사용 여부.
    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// 텍스트를 파싱합니다. 빈 입력만 에러입니다.
    pub async fn parse(&self, text: &str) -> Result<ParsedTable> {
        self.parse_detailed(text).await.map(|outcome| outcome.table)
    }

    /// 텍스트를 파싱하고 결과 경로와 진단 정보를 함께 반환합니다.
    pub async fn parse_detailed(&self, text: &str) -> Result<ParseOutcome> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        if let Some(oracle) = &self.oracle {
            if let Some(table) = Self::try_oracle(oracle.as_ref(), text).await {
                return Ok(ParseOutcome {
                    table,
                    source: ParseSource::Oracle,
                    header_detected: true,
                    alignments: Vec::new(),
                });
            }
        }

        let parsed = parse_with_diagnostics(text);
        debug!(
            rows = parsed.table.rows.len(),
            fallback_rows = parsed.fallback_count(),
            "Parsed with heuristic parser"
        );
        Ok(ParseOutcome {
            table: parsed.table,
            source: ParseSource::Heuristic,
            header_detected: parsed.header_detected,
            alignments: parsed.alignments,
        })
    }

    async fn try_oracle(oracle: &dyn TableOracle, text: &str) -> Option<ParsedTable> {
        let normalized = normalize_units(text);
        let reply = match oracle.complete(ORACLE_INSTRUCTION, &normalized).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(oracle = oracle.name(), error = %e, "Oracle request failed, falling back to heuristic parser");
                return None;
            }
        };

        match parse_oracle_reply(&reply) {
            Ok(table) => {
                info!(
                    oracle = oracle.name(),
                    headers = table.headers.len(),
                    rows = table.rows.len(),
                    "Oracle parse accepted"
                );
                Some(table)
            }
            Err(e) => {
                warn!(oracle = oracle.name(), error = %e, "Oracle result rejected, falling back to heuristic parser");
                None
            }
        }
    }
}

impl std::fmt::Debug for TableParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableParser")
            .field("oracle", &self.oracle.as_ref().map(|o| o.name()))
            .finish()
    }
}
