//! 피어 비교: 대상 기업들의 스냅샷과 지표별 평균.

use serde::{Deserialize, Serialize};

use kabu_core::{AverageMetrics, CompanyMetricsSnapshot, ParsedTable};

use crate::aggregate::average_metrics;
use crate::snapshot::{build_snapshot, snapshot_from_row};

/// 비교 대상. 코드나 이름 중 하나 이상이 있어야 매칭됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerTarget {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PeerTarget {
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            name: None,
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            code: None,
            name: Some(name.into()),
        }
    }
}

/// 피어 비교 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerComparison {
    /// 매칭된 기업 스냅샷 (대상 순서)
    pub companies: Vec<CompanyMetricsSnapshot>,
    /// 표에서 찾지 못한 대상
    pub unmatched: Vec<PeerTarget>,
    /// 지표별 평균
    pub averages: AverageMetrics,
}

/// 대상 기업들을 표에서 찾아 비교합니다. 대상이 비어 있으면 표의 모든 행을 씁니다.
pub fn compare_peers(table: &ParsedTable, targets: &[PeerTarget]) -> PeerComparison {
    let mut companies = Vec::new();
    let mut unmatched = Vec::new();

    if targets.is_empty() {
        companies.extend(table.rows.iter().map(|row| snapshot_from_row(table, row)));
    } else {
        for target in targets {
            match build_snapshot(table, target.code.as_deref(), target.name.as_deref()) {
                Some(snapshot) => companies.push(snapshot),
                None => unmatched.push(target.clone()),
            }
        }
    }

    let averages = average_metrics(&companies);
    PeerComparison {
        companies,
        unmatched,
        averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kabu_core::ParsedRow;
    use rust_decimal_macros::dec;

    fn table() -> ParsedTable {
        ParsedTable::new(
            vec!["PER".into(), "ROE".into()],
            vec![
                ParsedRow::new(Some("7203".into()), "トヨタ自動車")
                    .with_value("PER", "8.5倍")
                    .with_value("ROE", "12.0%"),
                ParsedRow::new(Some("7267".into()), "本田技研工業")
                    .with_value("PER", "9.5倍")
                    .with_value("ROE", "-"),
                ParsedRow::new(Some("7201".into()), "日産自動車").with_value("PER", "N/A"),
            ],
        )
    }

    #[test]
    fn test_compare_targets() {
        let result = compare_peers(
            &table(),
            &[
                PeerTarget::code("7203"),
                PeerTarget::name("本田"),
                PeerTarget::code("9999"),
            ],
        );
        assert_eq!(result.companies.len(), 2);
        assert_eq!(result.unmatched, vec![PeerTarget::code("9999")]);
        assert_eq!(result.averages.get("PER"), Some(dec!(9)));
        assert_eq!(result.averages.get("ROE"), None);
    }

    #[test]
    fn test_compare_all_rows() {
        let result = compare_peers(&table(), &[]);
        assert_eq!(result.companies.len(), 3);
        assert!(result.unmatched.is_empty());
        assert_eq!(result.averages.get("PER"), Some(dec!(9)));
    }
}
