//! 시계열 PER/PSR.
//!
//! 가격 포인트마다 시가총액(종가 × 발행주식수)을 구하고, 해당 시점에 대응하는
//! 회계 기간의 순이익/매출로 나눕니다.
//!
//! 회계 기간 대응:
//! - 달력 연도 ≥ 최신 회계 연도: 최근 4분기 순이익 합계(TTM)와 최신 연간 매출
//! - 그 이전: 달력 연도 `Y` → 회계 연도 `Y + offset`의 연간 실적, 없으면 `None`

use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use kabu_core::{
    AnalyticsConfig, AnnualStatement, DecimalExt, FiscalStatements, HistoricalPoint,
    ValuationPoint,
};

/// TTM 계산에 필요한 분기 수.
const TTM_QUARTERS: usize = 4;

/// 달력 연도 → 회계 연도 대응 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalCalendar {
    /// 달력 연도에 더할 오프셋 (3월 결산: 1, 12월 결산: 0)
    pub year_offset: i32,
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self { year_offset: 1 }
    }
}

impl FiscalCalendar {
    pub fn new(year_offset: i32) -> Self {
        Self { year_offset }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.fiscal_year_offset)
    }

    /// 달력 연도에 대응하는 회계 연도.
    pub fn fiscal_year_for(&self, calendar_year: i32) -> i32 {
        calendar_year + self.year_offset
    }
}

/// 재무 이력에서 미리 계산한 기간별 순이익/매출 조회 테이블.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodFinancials {
    annual: BTreeMap<i32, AnnualStatement>,
    latest_fiscal_year: Option<i32>,
    ttm_net_income: Option<Decimal>,
    latest_revenue: Option<Decimal>,
}

impl PeriodFinancials {
    /// 재무 이력으로 조회 테이블을 만듭니다.
    ///
    /// 같은 회계 연도가 여러 번 나오면 마지막 항목을 씁니다.
    pub fn new(statements: &FiscalStatements) -> Self {
        let annual: BTreeMap<i32, AnnualStatement> = statements
            .annual
            .iter()
            .map(|s| (s.fiscal_year, s.clone()))
            .collect();

        let latest_fiscal_year = annual.keys().next_back().copied();
        let latest_revenue = annual.values().rev().find_map(|s| s.revenue);

        let mut quarters: Vec<_> = statements.quarterly.iter().collect();
        quarters.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        // 합계가 넘치면 TTM 없음
        let ttm_net_income = if quarters.len() >= TTM_QUARTERS {
            quarters
                .iter()
                .take(TTM_QUARTERS)
                .try_fold(Decimal::ZERO, |sum, q| sum.checked_add(q.net_income))
        } else {
            None
        };

        Self {
            annual,
            latest_fiscal_year,
            ttm_net_income,
            latest_revenue,
        }
    }

    pub fn latest_fiscal_year(&self) -> Option<i32> {
        self.latest_fiscal_year
    }

    pub fn ttm_net_income(&self) -> Option<Decimal> {
        self.ttm_net_income
    }

    /// 최신 회계 연도 이후 구간인지. 연간 실적이 없으면 모든 시점을 최신 구간으로 봅니다.
    fn is_trailing(&self, calendar_year: i32) -> bool {
        self.latest_fiscal_year
            .map_or(true, |latest| calendar_year >= latest)
    }

    /// 해당 달력 연도의 순이익.
    pub fn net_income_for(&self, calendar_year: i32, calendar: FiscalCalendar) -> Option<Decimal> {
        if self.is_trailing(calendar_year) {
            return self.ttm_net_income;
        }
        self.annual
            .get(&calendar.fiscal_year_for(calendar_year))
            .and_then(|s| s.net_income)
    }

    /// 해당 달력 연도의 매출.
    pub fn revenue_for(&self, calendar_year: i32, calendar: FiscalCalendar) -> Option<Decimal> {
        if self.is_trailing(calendar_year) {
            return self.latest_revenue;
        }
        self.annual
            .get(&calendar.fiscal_year_for(calendar_year))
            .and_then(|s| s.revenue)
    }
}

/// 양수 분모로만 나누고 소수 2자리로 반올림합니다.
fn ratio(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Decimal> {
    let denominator = denominator.filter(|d| *d > Decimal::ZERO)?;
    numerator?
        .checked_div(denominator)
        .map(|r| r.round_half_up(2))
}

/// 가격 이력에 시가총액/PER/PSR을 붙입니다.
///
/// 출력 순서는 입력 순서와 같습니다. 분모가 없거나 0 이하인 시점의 지표는 `None`이며
/// 시계열 전체를 중단하지 않습니다.
pub fn compute_valuation_series(
    history: &[HistoricalPoint],
    shares_outstanding: Decimal,
    statements: &FiscalStatements,
    calendar: FiscalCalendar,
) -> Vec<ValuationPoint> {
    let financials = PeriodFinancials::new(statements);
    debug!(
        points = history.len(),
        latest_fiscal_year = ?financials.latest_fiscal_year(),
        has_ttm = financials.ttm_net_income().is_some(),
        "Computing valuation series"
    );

    history
        .iter()
        .map(|point| {
            let year = point.date.year();
            let market_cap = (shares_outstanding > Decimal::ZERO)
                .then(|| point.close.checked_mul(shares_outstanding))
                .flatten();

            ValuationPoint {
                point: point.clone(),
                market_cap,
                per: ratio(market_cap, financials.net_income_for(year, calendar)),
                psr: ratio(market_cap, financials.revenue_for(year, calendar)),
            }
        })
        .collect()
}
