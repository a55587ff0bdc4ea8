//! 시세/펀더멘털 제공자.
//!
//! 숫자로만 된 종목 코드(예: "7203")는 조회 전에 거래소 접미사(".T")를 붙입니다.

mod yahoo;

pub use yahoo::YahooMarketDataProvider;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

use kabu_core::{HistoryInterval, HistoryPeriod, MarketSnapshot};

use crate::error::Result;

/// 여러 종목 조회 결과. 키는 호출자가 넘긴 원래 식별자입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketDataBatch {
    /// 성공한 종목
    pub snapshots: BTreeMap<String, MarketSnapshot>,
    /// 실패한 종목과 에러 메시지
    pub errors: BTreeMap<String, String>,
}

/// 시세 이력과 현재 펀더멘털을 제공하는 외부 협력자.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 종목 하나를 조회합니다.
    async fn fetch_snapshot(
        &self,
        identifier: &str,
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> Result<MarketSnapshot>;

    /// 종목 사이 대기 시간.
    fn request_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// 여러 종목을 순서대로 조회합니다. 개별 실패는 `errors`에 모읍니다.
    async fn fetch(
        &self,
        identifiers: &[String],
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> MarketDataBatch {
        let mut batch = MarketDataBatch::default();
        for (i, identifier) in identifiers.iter().enumerate() {
            if i > 0 && !self.request_delay().is_zero() {
                tokio::time::sleep(self.request_delay()).await;
            }
            match self.fetch_snapshot(identifier, period, interval).await {
                Ok(snapshot) => {
                    batch.snapshots.insert(identifier.clone(), snapshot);
                }
                Err(e) => {
                    warn!(identifier = %identifier, error = %e, "Market data fetch failed");
                    batch.errors.insert(identifier.clone(), e.to_string());
                }
            }
        }
        batch
    }
}

/// 조회용 심볼로 변환합니다.
///
/// 숫자로만 된 식별자에만 접미사를 붙입니다.
///
/// ```
/// use kabu_data::to_market_symbol;
///
/// assert_eq!(to_market_symbol("7203", ".T"), "7203.T");
/// assert_eq!(to_market_symbol("AAPL", ".T"), "AAPL");
/// ```
pub fn to_market_symbol(identifier: &str, exchange_suffix: &str) -> String {
    let identifier = identifier.trim();
    if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{}", identifier, exchange_suffix)
    } else {
        identifier.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use kabu_core::Fundamentals;

    #[test]
    fn test_to_market_symbol() {
        assert_eq!(to_market_symbol(" 7203 ", ".T"), "7203.T");
        assert_eq!(to_market_symbol("12345", ".T"), "12345.T");
        assert_eq!(to_market_symbol("7203.T", ".T"), "7203.T");
        assert_eq!(to_market_symbol("130A", ".T"), "130A");
        assert_eq!(to_market_symbol("", ".T"), "");
    }

    struct FakeProvider;

    #[async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn fetch_snapshot(
            &self,
            identifier: &str,
            _period: HistoryPeriod,
            _interval: HistoryInterval,
        ) -> Result<MarketSnapshot> {
            if identifier == "0000" {
                return Err(DataError::NotFound(identifier.to_string()));
            }
            Ok(MarketSnapshot {
                symbol: to_market_symbol(identifier, ".T"),
                currency: "JPY".to_string(),
                history: Vec::new(),
                fundamentals: Fundamentals::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_batch_collects_failures() {
        let ids = vec!["7203".to_string(), "0000".to_string(), "6758".to_string()];
        let batch = FakeProvider
            .fetch(&ids, HistoryPeriod::OneYear, HistoryInterval::Daily)
            .await;
        assert_eq!(batch.snapshots.len(), 2);
        assert_eq!(batch.snapshots["6758"].symbol, "6758.T");
        assert!(batch.errors["0000"].contains("Not found"));
    }
}
