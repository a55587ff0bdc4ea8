//! 비교표 파싱/파생 지표 REST API.
//!
//! # 라우트 구조
//!
//! - `/health`, `/health/ready` - 헬스 체크
//! - `/api/v1/tables` - 비교표 파싱, 피어 비교
//! - `/api/v1/valuation` - 시계열 PER/PSR, 단면 PSR
//! - `/api/v1/market` - 시세 이력/펀더멘털

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;
