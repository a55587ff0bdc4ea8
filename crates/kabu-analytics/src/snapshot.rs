//! 비교표 행 → 기업 지표 스냅샷.

use std::collections::BTreeMap;
use tracing::debug;

use kabu_core::{CompanyMetricsSnapshot, ParsedRow, ParsedTable};

use crate::psr::psr_value;
use crate::value::parse_financial_value;

/// 파생 PSR 지표 이름.
pub const PSR_METRIC: &str = "PSR";

const ENTERPRISE_VALUE_LABEL: &str = "企業価値";
const SALES_LABEL: &str = "売上";
/// 그대로 매출 금액을 뜻하는 헤더.
const SALES_EXACT_LABELS: &[&str] = &["売上", "売上高"];
/// 매출 금액이 아니라 비율/성장률을 뜻하는 헤더 표지.
const SALES_RATIO_MARKERS: &[&str] = &["率", "成長", "伸び", "%", "％"];

/// 코드 → 정확한 이름 → 이름 포함 순으로 행을 찾아 스냅샷을 만듭니다.
pub fn build_snapshot(
    table: &ParsedTable,
    code: Option<&str>,
    name: Option<&str>,
) -> Option<CompanyMetricsSnapshot> {
    let row = table.find_row(code, name);
    if row.is_none() {
        debug!(code = ?code, name = ?name, "No matching row for snapshot");
    }
    row.map(|row| snapshot_from_row(table, row))
}

/// 행 하나를 스냅샷으로 변환합니다.
///
/// 숫자 헤더만 지표가 되며 자유 텍스트 컬럼은 제외합니다. 표에 PSR 컬럼이 없고
/// 企業価値와 売上 컬럼이 있으면 `PSR` 지표를 덧붙입니다.
pub fn snapshot_from_row(table: &ParsedTable, row: &ParsedRow) -> CompanyMetricsSnapshot {
    let mut metrics: BTreeMap<String, Option<_>> = table
        .numeric_headers()
        .iter()
        .map(|header| {
            let value = row.get(header).and_then(parse_financial_value);
            (header.clone(), value)
        })
        .collect();

    if let Some((ev_header, sales_header)) = derivable_psr_columns(table) {
        let psr = match (row.get(ev_header), row.get(sales_header)) {
            (Some(ev), Some(sales)) => psr_value(ev, sales),
            _ => None,
        };
        metrics.insert(PSR_METRIC.to_string(), psr);
    }

    CompanyMetricsSnapshot {
        code: row.code.clone(),
        name: row.name.clone(),
        metrics,
    }
}

/// PSR을 파생할 수 있으면 (기업가치 헤더, 매출 헤더).
fn derivable_psr_columns(table: &ParsedTable) -> Option<(&str, &str)> {
    let headers = table.numeric_headers();
    if headers.iter().any(|h| h.contains(PSR_METRIC)) {
        return None;
    }
    let ev = headers.iter().find(|h| h.contains(ENTERPRISE_VALUE_LABEL))?;
    let sales = sales_column(headers)?;
    Some((ev.as_str(), sales))
}

/// 매출 금액 컬럼. 정확한 라벨을 먼저 찾고, 없으면 비율 표지가 없는 売上 헤더.
fn sales_column(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .find(|h| SALES_EXACT_LABELS.contains(&h.trim()))
        .or_else(|| {
            headers.iter().find(|h| {
                h.contains(SALES_LABEL) && !SALES_RATIO_MARKERS.iter().any(|m| h.contains(m))
            })
        })
        .map(String::as_str)
}
