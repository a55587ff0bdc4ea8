//! 기업별 지표 스냅샷과 평균 지표.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 비교표 한 행을 숫자 지표로 바꾼 스냅샷.
///
/// 요청 시점에 만들어지는 임시 값이며 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMetricsSnapshot {
    /// 종목 코드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// 종목명
    pub name: String,
    /// 헤더 → 파싱된 값 (파싱 불가/미관측은 `None`)
    pub metrics: BTreeMap<String, Option<Decimal>>,
}

impl CompanyMetricsSnapshot {
    /// 지표 값 조회. 없는 키와 `None` 값을 구분하지 않습니다.
    pub fn metric(&self, key: &str) -> Option<Decimal> {
        self.metrics.get(key).copied().flatten()
    }
}

/// 여러 기업에 걸친 지표별 평균.
///
/// 유효한 값이 부족한 지표는 `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AverageMetrics(pub BTreeMap<String, Option<Decimal>>);

impl AverageMetrics {
    /// 지표 평균 조회.
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.0.get(key).copied().flatten()
    }

    /// 지표 이름 목록.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
