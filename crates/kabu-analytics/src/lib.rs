//! # Kabu Analytics
//!
//! 파싱된 비교표 값을 숫자로 바꾸고 파생 지표를 계산합니다.
//!
//! - [`value`]: 일본어 단위 문자열 ↔ 숫자 (兆/億/百万/千/円/倍/%)
//! - [`psr`]: 기업가치(億円)와 매출(百万円)로 단면 PSR 계산
//! - [`timeseries`]: 가격 이력에 PER/PSR/시가총액 부여
//! - [`aggregate`]: 기업 집합의 지표별 평균
//! - [`snapshot`], [`compare`]: 행 → 지표 스냅샷, 피어 비교

pub mod aggregate;
pub mod compare;
pub mod psr;
pub mod snapshot;
pub mod timeseries;
pub mod value;

pub use aggregate::{average_metrics, mean_of, MIN_AVERAGE_SAMPLES};
pub use compare::{compare_peers, PeerComparison, PeerTarget};
pub use psr::{calculate_psr, enterprise_value_oku, psr_value, sales_oku, PSR_UNAVAILABLE};
pub use snapshot::{build_snapshot, snapshot_from_row, PSR_METRIC};
pub use timeseries::{compute_valuation_series, FiscalCalendar, PeriodFinancials};
pub use value::{format_financial_value, parse_financial_value};
