//! 애플리케이션 공유 상태.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use kabu_analytics::FiscalCalendar;
use kabu_core::AppConfig;
use kabu_data::{ChatCompletionOracle, MarketDataProvider, YahooMarketDataProvider};
use kabu_parser::TableParser;

/// 모든 핸들러가 공유하는 상태.
///
/// 파서와 계산은 상태가 없으므로 잠금 없이 공유합니다.
#[derive(Clone)]
pub struct AppState {
    /// 비교표 파서 (오라클 선택)
    pub parser: TableParser,
    /// 시세 제공자 (생성 실패 시 None)
    pub market: Option<Arc<dyn MarketDataProvider>>,
    /// 회계 연도 대응 규칙
    pub calendar: FiscalCalendar,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 구성 요소로부터 상태를 만듭니다.
    pub fn new(
        parser: TableParser,
        market: Option<Arc<dyn MarketDataProvider>>,
        calendar: FiscalCalendar,
    ) -> Self {
        Self {
            parser,
            market,
            calendar,
            started_at: Utc::now(),
        }
    }

    /// 설정으로부터 외부 협력자를 만들어 상태를 구성합니다.
    ///
    /// 오라클이나 시세 제공자를 만들 수 없으면 경고만 남기고 없이 시작합니다.
    pub fn from_config(config: &AppConfig) -> Self {
        let parser = match ChatCompletionOracle::from_config(&config.oracle) {
            Ok(Some(oracle)) => {
                info!(model = %config.oracle.model, "LLM oracle enabled");
                TableParser::with_oracle(Arc::new(oracle))
            }
            Ok(None) => {
                info!("LLM oracle disabled, using heuristic parser only");
                TableParser::heuristic_only()
            }
            Err(e) => {
                warn!(error = %e, "Failed to create LLM oracle, using heuristic parser only");
                TableParser::heuristic_only()
            }
        };

        let market: Option<Arc<dyn MarketDataProvider>> =
            match YahooMarketDataProvider::new(&config.market_data) {
                Ok(provider) => Some(Arc::new(provider)),
                Err(e) => {
                    warn!(error = %e, "Market data provider unavailable");
                    None
                }
            };

        Self::new(parser, market, FiscalCalendar::from_config(&config.analytics))
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 외부 협력자 없는 테스트용 상태.
pub fn create_test_state() -> AppState {
    AppState::new(TableParser::heuristic_only(), None, FiscalCalendar::default())
}
