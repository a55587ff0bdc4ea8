//! 기업 집합의 지표별 평균.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use kabu_core::{AverageMetrics, CompanyMetricsSnapshot, DecimalExt};

/// 평균을 내기 위한 최소 유효 값 수. 값 하나로는 기업 간 평균으로 보지 않습니다.
pub const MIN_AVERAGE_SAMPLES: usize = 2;

/// `None`을 제외한 산술 평균 (소수 2자리).
///
/// 유효 값이 [`MIN_AVERAGE_SAMPLES`]개 미만이면 `None`.
pub fn mean_of<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .try_fold((Decimal::ZERO, 0usize), |(sum, count), v| {
            sum.checked_add(v).map(|s| (s, count + 1))
        })?;

    if count < MIN_AVERAGE_SAMPLES {
        return None;
    }
    sum.checked_div(Decimal::from(count)).map(|m| m.round_half_up(2))
}

/// 스냅샷들에 나타난 모든 지표의 평균을 구합니다.
pub fn average_metrics(snapshots: &[CompanyMetricsSnapshot]) -> AverageMetrics {
    let mut columns: BTreeMap<String, Vec<Option<Decimal>>> = BTreeMap::new();
    for snapshot in snapshots {
        for (key, value) in &snapshot.metrics {
            columns.entry(key.clone()).or_default().push(*value);
        }
    }

    AverageMetrics(
        columns
            .into_iter()
            .map(|(key, values)| (key, mean_of(values)))
            .collect(),
    )
}
