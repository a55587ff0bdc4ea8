//! 밸류에이션 endpoint.
//!
//! - `POST /api/v1/valuation/series` - 가격 이력 + 재무제표로 시점별 PER/PSR
//! - `POST /api/v1/valuation/psr` - 기업가치/매출 셀 문자열로 단면 PSR

use axum::{extract::State, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kabu_analytics::{calculate_psr, compute_valuation_series, FiscalCalendar, PeriodFinancials};
use kabu_core::{FiscalStatements, HistoricalPoint, ValuationPoint};

use crate::error::ApiResult;
use crate::state::AppState;

/// 시계열 밸류에이션 요청.
#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    /// 가격 이력
    pub history: Vec<HistoricalPoint>,
    /// 발행주식수 (0 이하이면 시가총액/지표 없음)
    pub shares_outstanding: Decimal,
    /// 연간/분기 재무제표
    #[serde(default)]
    pub statements: FiscalStatements,
    /// 회계 연도 오프셋 (없으면 서버 설정)
    #[serde(default)]
    pub fiscal_year_offset: Option<i32>,
}

/// 시계열 밸류에이션 응답.
#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub points: Vec<ValuationPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_fiscal_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttm_net_income: Option<Decimal>,
}

/// 단면 PSR 요청.
#[derive(Debug, Deserialize)]
pub struct PsrRequest {
    /// 기업가치 셀 (예: "124,976億円")
    pub enterprise_value: String,
    /// 매출 셀 (예: "4,509,500", 백만엔 단위)
    pub sales: String,
}

/// 단면 PSR 응답. 계산할 수 없으면 "N/A".
#[derive(Debug, Serialize, Deserialize)]
pub struct PsrResponse {
    pub psr: String,
}

/// POST /api/v1/valuation/series
pub async fn valuation_series(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeriesRequest>,
) -> ApiResult<SeriesResponse> {
    let calendar = request
        .fiscal_year_offset
        .map(FiscalCalendar::new)
        .unwrap_or(state.calendar);

    let financials = PeriodFinancials::new(&request.statements);
    let points = compute_valuation_series(
        &request.history,
        request.shares_outstanding,
        &request.statements,
        calendar,
    );

    Ok(Json(SeriesResponse {
        points,
        latest_fiscal_year: financials.latest_fiscal_year(),
        ttm_net_income: financials.ttm_net_income(),
    }))
}

/// POST /api/v1/valuation/psr
pub async fn single_psr(Json(request): Json<PsrRequest>) -> Json<PsrResponse> {
    Json(PsrResponse {
        psr: calculate_psr(&request.enterprise_value, &request.sales),
    })
}

/// 밸류에이션 라우터.
pub fn valuation_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/series", post(valuation_series))
        .route("/psr", post(single_psr))
}
