//! 시세 이력과 펀더멘털 데이터 모델.
//!
//! 가격 이력과 재무 수치는 외부 시세 제공자에서 받아오며, 이 crate는
//! 모양만 정의합니다. 금액 단위는 모두 円입니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 일별(또는 주/월별) 가격 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// 날짜
    pub date: NaiveDate,
    /// 종가
    pub close: Decimal,
    /// 고가
    #[serde(default)]
    pub high: Decimal,
    /// 저가
    #[serde(default)]
    pub low: Decimal,
    /// 시가
    #[serde(default)]
    pub open: Decimal,
    /// 거래량
    #[serde(default)]
    pub volume: u64,
}

impl HistoricalPoint {
    /// 종가만 있는 포인트 (테스트/수동 입력용).
    pub fn close_only(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            close,
            high: close,
            low: close,
            open: close,
            volume: 0,
        }
    }
}

/// 시가총액과 PER/PSR이 붙은 가격 포인트.
///
/// 분모가 0 이하이거나 알 수 없으면 해당 지표는 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationPoint {
    /// 원본 가격 포인트
    #[serde(flatten)]
    pub point: HistoricalPoint,
    /// 시가총액 (円)
    #[serde(rename = "marketCap", skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    /// 주가수익비율
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per: Option<Decimal>,
    /// 주가매출비율
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psr: Option<Decimal>,
}

/// 연간 결산 실적.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatement {
    /// 회계 연도 (결산 월이 속한 연도, 예: 2025년 3월 결산 → 2025)
    pub fiscal_year: i32,
    /// 매출액
    #[serde(default)]
    pub revenue: Option<Decimal>,
    /// 순이익
    #[serde(default)]
    pub net_income: Option<Decimal>,
}

/// 분기 순이익.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyStatement {
    /// 분기 말일
    pub period_end: NaiveDate,
    /// 분기 순이익
    pub net_income: Decimal,
}

/// 시계열 지표 계산에 필요한 재무 이력.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiscalStatements {
    /// 연간 실적
    #[serde(default)]
    pub annual: Vec<AnnualStatement>,
    /// 분기 순이익 (순서 무관)
    #[serde(default)]
    pub quarterly: Vec<QuarterlyStatement>,
}

/// 현재 시점의 펀더멘털 지표.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// 시가총액 (円)
    pub market_cap: Option<Decimal>,
    /// Trailing PER
    pub per: Option<Decimal>,
    /// 매출액 (円)
    pub revenue: Option<Decimal>,
    /// ROE (%)
    pub roe: Option<Decimal>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
    /// PBR
    pub pbr: Option<Decimal>,
    /// 발행주식수
    pub shares_outstanding: Option<Decimal>,
    /// 순이익 (円)
    pub net_income: Option<Decimal>,
}

/// 종목 하나의 시세 조회 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// 조회에 사용한 심볼 (접미사 포함, 예: "7203.T")
    pub symbol: String,
    /// 통화
    pub currency: String,
    /// 가격 이력 (오래된 것부터)
    pub history: Vec<HistoricalPoint>,
    /// 현재 펀더멘털
    pub fundamentals: Fundamentals,
}

/// 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "max")]
    Max,
}

impl HistoryPeriod {
    /// Yahoo Finance range 파라미터.
    pub fn as_range(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::Max => "max",
        }
    }
}

impl std::str::FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "max" => Ok(Self::Max),
            other => Err(format!("Unknown period: {}", other)),
        }
    }
}

/// 캔들 간격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryInterval {
    #[default]
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl HistoryInterval {
    /// Yahoo Finance interval 파라미터.
    pub fn as_interval(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }
}

impl std::str::FromStr for HistoryInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "daily" => Ok(Self::Daily),
            "1wk" | "1w" | "weekly" => Ok(Self::Weekly),
            "1mo" | "1m" | "monthly" => Ok(Self::Monthly),
            other => Err(format!("Unknown interval: {}", other)),
        }
    }
}
