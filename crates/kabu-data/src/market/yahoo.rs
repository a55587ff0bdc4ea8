//! Yahoo Finance 시세/펀더멘털 제공자.
//!
//! - 가격 이력: `get_quote_range` (interval: 1d/1wk/1mo, range: 1mo~max)
//! - 펀더멘털: `get_ticker_info`의 quote summary
//!   (시가총액, trailing PER, 매출, ROE, 배당수익률, PBR, 발행주식수)
//!
//! 펀더멘털 조회가 실패해도 가격 이력은 반환합니다.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use yahoo_finance_api as yahoo;

use kabu_core::{
    Fundamentals, HistoricalPoint, HistoryInterval, HistoryPeriod, MarketDataConfig,
    MarketSnapshot,
};

use super::{to_market_symbol, MarketDataProvider};
use crate::error::{DataError, Result};

/// f64를 Decimal로 변환 후 소수점 4자리로 반올림.
fn round_decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp(4))
}

/// 비율(0.0123)을 퍼센트(1.23)로 바꾸고 소수점 2자리로 반올림.
fn percent_from_ratio(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value * 100.0).map(|d| d.round_dp(2))
}

/// Yahoo Finance 제공자.
pub struct YahooMarketDataProvider {
    /// `get_ticker_info`가 `&mut`을 요구하므로 잠금으로 감쌉니다.
    connector: Mutex<yahoo::YahooConnector>,
    exchange_suffix: String,
    request_delay: Duration,
}

impl YahooMarketDataProvider {
    /// 새 제공자 생성.
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;

        Ok(Self {
            connector: Mutex::new(connector),
            exchange_suffix: config.exchange_suffix.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    /// 심볼의 통화 코드 추정.
    fn guess_currency(symbol: &str) -> &'static str {
        if symbol.ends_with(".T") {
            "JPY"
        } else if symbol.ends_with(".KS") || symbol.ends_with(".KQ") {
            "KRW"
        } else if symbol.ends_with(".L") {
            "GBP"
        } else {
            "USD"
        }
    }

    /// Yahoo Quote를 가격 포인트로 변환.
    fn quote_to_point(quote: &yahoo::Quote) -> Option<HistoricalPoint> {
        let date = Utc.timestamp_opt(quote.timestamp, 0).single()?.date_naive();
        Some(HistoricalPoint {
            date,
            close: round_decimal_from_f64(quote.close)?,
            high: round_decimal_from_f64(quote.high).unwrap_or_default(),
            low: round_decimal_from_f64(quote.low).unwrap_or_default(),
            open: round_decimal_from_f64(quote.open).unwrap_or_default(),
            volume: quote.volume,
        })
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> Result<(Vec<HistoricalPoint>, Option<String>)> {
        let response = self
            .connector
            .lock()
            .await
            .get_quote_range(symbol, interval.as_interval(), period.as_range())
            .await
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance API 오류 ({}): {}", symbol, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::ParseError(format!("Quote 파싱 오류 ({}): {}", symbol, e)))?;
        let currency = response.metadata().ok().and_then(|m| m.currency.clone());

        let mut history: Vec<HistoricalPoint> =
            quotes.iter().filter_map(Self::quote_to_point).collect();
        history.sort_by_key(|p| p.date);

        debug!(symbol = symbol, points = history.len(), "Price history received");
        Ok((history, currency))
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let summary = self
            .connector
            .lock()
            .await
            .get_ticker_info(symbol)
            .await
            .map_err(|e| {
                DataError::FetchError(format!("Yahoo ticker info 조회 실패 ({}): {}", symbol, e))
            })?;

        let quote_summary = summary.quote_summary.ok_or_else(|| {
            DataError::NotFound(format!("Yahoo ticker info 결과 없음: {}", symbol))
        })?;
        let result_data = quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| {
                DataError::NotFound(format!("Yahoo ticker info 결과 비어있음: {}", symbol))
            })?;

        let summary_detail = result_data.summary_detail.as_ref();
        let market_cap = summary_detail
            .and_then(|sd| sd.market_cap)
            .and_then(Decimal::from_u64);
        let per = summary_detail
            .and_then(|sd| sd.trailing_pe)
            .and_then(round_decimal_from_f64);
        let dividend_yield = summary_detail
            .and_then(|sd| sd.trailing_annual_dividend_yield)
            .and_then(percent_from_ratio);

        let key_stats = result_data.default_key_statistics.as_ref();
        let pbr = key_stats
            .and_then(|ks| ks.price_to_book)
            .and_then(round_decimal_from_f64);
        let shares_outstanding = key_stats
            .and_then(|ks| ks.shares_outstanding)
            .map(|v| Decimal::from(v as i64));

        let financial_data = result_data.financial_data.as_ref();
        let roe = financial_data
            .and_then(|fd| fd.return_on_equity)
            .and_then(percent_from_ratio);
        let revenue = financial_data
            .and_then(|fd| fd.total_revenue)
            .and_then(Decimal::from_i64);

        Ok(Fundamentals {
            market_cap,
            per,
            revenue,
            roe,
            dividend_yield,
            pbr,
            shares_outstanding,
            net_income: implied_net_income(market_cap, per),
        })
    }
}

/// 시가총액 ÷ PER로 순이익을 역산합니다. PER이 0 이하이면 `None`.
fn implied_net_income(market_cap: Option<Decimal>, per: Option<Decimal>) -> Option<Decimal> {
    let per = per.filter(|p| *p > Decimal::ZERO)?;
    market_cap?.checked_div(per).map(|v| v.round_dp(0))
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn fetch_snapshot(
        &self,
        identifier: &str,
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> Result<MarketSnapshot> {
        let symbol = to_market_symbol(identifier, &self.exchange_suffix);
        if symbol.is_empty() {
            return Err(DataError::InvalidData("empty identifier".to_string()));
        }

        info!(
            symbol = %symbol,
            period = period.as_range(),
            interval = interval.as_interval(),
            "Fetching market data"
        );

        let (history, currency) = self.fetch_history(&symbol, period, interval).await?;
        let fundamentals = match self.fetch_fundamentals(&symbol).await {
            Ok(f) => f,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Fundamentals unavailable, returning history only");
                Fundamentals::default()
            }
        };

        if history.is_empty() && fundamentals == Fundamentals::default() {
            return Err(DataError::NotFound(format!("No market data for {}", symbol)));
        }

        Ok(MarketSnapshot {
            currency: currency.unwrap_or_else(|| Self::guess_currency(&symbol).to_string()),
            symbol,
            history,
            fundamentals,
        })
    }

    fn request_delay(&self) -> Duration {
        self.request_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_guess_currency() {
        assert_eq!(YahooMarketDataProvider::guess_currency("7203.T"), "JPY");
        assert_eq!(YahooMarketDataProvider::guess_currency("005930.KS"), "KRW");
        assert_eq!(YahooMarketDataProvider::guess_currency("AAPL"), "USD");
    }

    #[test]
    fn test_percent_from_ratio() {
        assert_eq!(percent_from_ratio(0.1234), Some(dec!(12.34)));
        assert_eq!(percent_from_ratio(f64::NAN), None);
    }

    #[test]
    fn test_implied_net_income() {
        assert_eq!(implied_net_income(Some(dec!(1000)), Some(dec!(8))), Some(dec!(125)));
        assert_eq!(implied_net_income(Some(dec!(1000)), Some(dec!(-5))), None);
        assert_eq!(implied_net_income(None, Some(dec!(8))), None);
    }
}
