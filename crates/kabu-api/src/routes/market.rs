//! 시세 이력 endpoint.
//!
//! `GET /api/v1/market/history?symbols=7203,7267&period=1y&interval=1d`

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use kabu_core::{HistoryInterval, HistoryPeriod};
use kabu_data::MarketDataBatch;

use crate::error::{api_error, ApiResult};
use crate::state::AppState;

/// 시세 이력 쿼리.
#[derive(Debug, Deserialize)]
pub struct MarketHistoryQuery {
    /// 쉼표로 구분한 종목 코드/심볼
    #[serde(default)]
    pub symbols: String,
    /// 조회 기간 (기본 1y)
    #[serde(default)]
    pub period: Option<String>,
    /// 캔들 간격 (기본 1d)
    #[serde(default)]
    pub interval: Option<String>,
}

impl MarketHistoryQuery {
    /// 공백과 빈 항목을 제거한 종목 목록.
    pub fn symbol_list(&self) -> Vec<String> {
        self.symbols
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// GET /api/v1/market/history
///
/// 일부 종목만 실패하면 `errors`에 담아 200으로 반환하고,
/// 모든 종목이 실패하면 502를 반환합니다.
pub async fn market_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MarketHistoryQuery>,
) -> ApiResult<MarketDataBatch> {
    let Some(provider) = state.market.as_ref() else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "MARKET_DATA_UNAVAILABLE",
            "시세 제공자가 초기화되지 않았습니다",
        ));
    };

    let symbols = query.symbol_list();
    if symbols.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "symbols 파라미터가 필요합니다",
        ));
    }

    let period: HistoryPeriod = match query.period.as_deref() {
        Some(p) => p
            .parse()
            .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", e))?,
        None => HistoryPeriod::default(),
    };
    let interval: HistoryInterval = match query.interval.as_deref() {
        Some(i) => i
            .parse()
            .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", e))?,
        None => HistoryInterval::default(),
    };

    let batch = provider.fetch(&symbols, period, interval).await;
    if batch.snapshots.is_empty() {
        warn!(symbols = ?symbols, "Market data fetch failed for every symbol");
        let message = batch
            .errors
            .iter()
            .map(|(symbol, error)| format!("{}: {}", symbol, error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(api_error(StatusCode::BAD_GATEWAY, "MARKET_DATA_ERROR", message));
    }

    Ok(Json(batch))
}

/// 시세 라우터.
pub fn market_router() -> Router<Arc<AppState>> {
    Router::new().route("/history", get(market_history))
}
