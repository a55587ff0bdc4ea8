//! 비교표 파싱/피어 비교 endpoint.
//!
//! - `POST /api/v1/tables/parse` - 붙여넣은 텍스트를 구조화된 표로 변환
//! - `POST /api/v1/tables/compare` - 표(또는 텍스트)에서 대상 기업 스냅샷과 평균 계산

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use kabu_analytics::{compare_peers, PeerComparison, PeerTarget};
use kabu_core::ParsedTable;
use kabu_parser::{ParseError, ParseSource, RowAlignment};

use crate::error::{api_error, ApiError, ApiResult};
use crate::state::AppState;

/// 파싱 요청.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    /// 붙여넣은 원문
    #[serde(default)]
    pub text: String,
    /// 휴리스틱 진단 정보 포함 여부
    #[serde(default)]
    pub include_diagnostics: bool,
}

/// 휴리스틱 진단 정보.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    pub header_detected: bool,
    pub alignments: Vec<RowAlignment>,
}

/// 파싱 응답. `headers`와 `rows`는 최상위 필드로 펼칩니다.
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    #[serde(flatten)]
    pub table: ParsedTable,
    pub source: ParseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<ParseDiagnostics>,
}

/// 피어 비교 요청. `table`이 있으면 `text`보다 우선합니다.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub table: Option<ParsedTable>,
    /// 비교 대상 (비어 있으면 모든 행)
    #[serde(default)]
    pub targets: Vec<PeerTarget>,
}

fn parse_error_response(e: ParseError) -> ApiError {
    match e {
        ParseError::EmptyInput => api_error(StatusCode::BAD_REQUEST, "EMPTY_INPUT", e.to_string()),
    }
}

/// POST /api/v1/tables/parse
pub async fn parse_table(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ParseRequest>,
) -> ApiResult<ParseResponse> {
    let outcome = state
        .parser
        .parse_detailed(&request.text)
        .await
        .map_err(parse_error_response)?;

    debug!(
        source = ?outcome.source,
        headers = outcome.table.headers.len(),
        rows = outcome.table.rows.len(),
        "Table parsed"
    );

    let diagnostics = request.include_diagnostics.then(|| ParseDiagnostics {
        header_detected: outcome.header_detected,
        alignments: outcome.alignments,
    });

    Ok(Json(ParseResponse {
        table: outcome.table,
        source: outcome.source,
        diagnostics,
    }))
}

/// POST /api/v1/tables/compare
pub async fn compare_table(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompareRequest>,
) -> ApiResult<PeerComparison> {
    let table = match (request.table, request.text) {
        (Some(table), _) => table,
        (None, Some(text)) => state.parser.parse(&text).await.map_err(parse_error_response)?,
        (None, None) => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                "text 또는 table 중 하나가 필요합니다",
            ))
        }
    };

    Ok(Json(compare_peers(&table, &request.targets)))
}

/// 비교표 라우터.
pub fn tables_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/parse", post(parse_table))
        .route("/compare", post(compare_table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    const TABLE_TEXT: &str = "コード 銘柄名 企業価値 時価総額 PER (会) 売上 ROE 特徴語\n\
        7203 トヨタ自動車 124,976億円 35兆円 8.5倍 4,509,500 12.1% 好調\n\
        7267 本田 技研工業 9,800億円 7兆円 N/A 2,000,000 8.3 % EV\n";

    fn app() -> Router {
        tables_router().with_state(Arc::new(create_test_state()))
    }

    async fn post_json(uri: &str, body: Value) -> Response {
        app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_parse_returns_flat_table() {
        let response = post_json("/parse", json!({ "text": TABLE_TEXT })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["source"], "heuristic");
        assert_eq!(json["headers"][0], "企業価値");
        assert_eq!(json["rows"][0]["code"], "7203");
        assert_eq!(json["rows"][1]["name"], "本田 技研工業");
        assert_eq!(json["rows"][1]["ROE"], "8.3%");
        assert!(json.get("diagnostics").is_none());
    }

    #[tokio::test]
    async fn test_parse_with_diagnostics() {
        let response = post_json(
            "/parse",
            json!({ "text": TABLE_TEXT, "include_diagnostics": true }),
        )
        .await;
        let json = body_json(response).await;
        assert_eq!(json["diagnostics"]["header_detected"], true);
        assert_eq!(json["diagnostics"]["alignments"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_parse_empty_input() {
        let response = post_json("/parse", json!({ "text": "  \n " })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "EMPTY_INPUT");
    }

    #[tokio::test]
    async fn test_parse_missing_text_is_empty_input() {
        let response = post_json("/parse", json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compare_from_text() {
        let response = post_json(
            "/compare",
            json!({ "text": TABLE_TEXT, "targets": [{ "code": "7203" }, { "name": "本田" }, { "code": "9999" }] }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["companies"].as_array().unwrap().len(), 2);
        assert_eq!(json["companies"][0]["metrics"]["PSR"], "2.77");
        assert_eq!(json["unmatched"][0]["code"], "9999");
        assert_eq!(json["averages"]["ROE"], "10.2");
    }

    #[tokio::test]
    async fn test_compare_from_table() {
        let response = post_json(
            "/compare",
            json!({
                "table": {
                    "headers": ["PER"],
                    "rows": [
                        { "code": "1111", "name": "A", "PER": "10倍" },
                        { "code": "2222", "name": "B", "PER": "20倍" }
                    ]
                }
            }),
        )
        .await;
        let json = body_json(response).await;
        assert_eq!(json["averages"]["PER"], "15");
    }

    #[tokio::test]
    async fn test_compare_requires_input() {
        let response = post_json("/compare", json!({ "targets": [] })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_INPUT");
    }
}
