//! API 라우트.
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 구성 요소 상태 (readiness)
//! - `/api/v1/tables` - 비교표 파싱, 피어 비교
//! - `/api/v1/valuation` - 시계열 PER/PSR, 단면 PSR
//! - `/api/v1/market` - 시세 이력/펀더멘털

pub mod health;
pub mod market;
pub mod tables;
pub mod valuation;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use market::{market_router, MarketHistoryQuery};
pub use tables::{tables_router, CompareRequest, ParseRequest, ParseResponse};
pub use valuation::{valuation_router, PsrRequest, PsrResponse, SeriesRequest, SeriesResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// API 라우터 (미들웨어 제외).
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .nest("/api/v1/tables", tables_router())
        .nest("/api/v1/valuation", valuation_router())
        .nest("/api/v1/market", market_router())
}
