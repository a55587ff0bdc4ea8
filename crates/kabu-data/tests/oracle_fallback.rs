//! 실제 HTTP 오라클이 실패해도 파서가 휴리스틱 결과를 돌려주는지 확인합니다.

use std::sync::Arc;
use std::time::Duration;

use kabu_data::ChatCompletionOracle;
use kabu_parser::{ParseSource, TableParser};

#[tokio::test]
async fn unreachable_oracle_falls_back_to_heuristic() {
    let oracle = ChatCompletionOracle::new(
        "http://127.0.0.1:9/v1/chat/completions",
        "test-model",
        "key",
        Duration::from_millis(500),
    )
    .unwrap();
    let parser = TableParser::with_oracle(Arc::new(oracle));

    let outcome = parser
        .parse_detailed("企業価値 PER\n7203 トヨタ自動車 124,976 億円 8.5 倍")
        .await
        .unwrap();

    assert_eq!(outcome.source, ParseSource::Heuristic);
    let row = &outcome.table.rows[0];
    assert_eq!(row.name, "トヨタ自動車");
    assert_eq!(row.get("企業価値"), Some("124,976億円"));
    assert_eq!(row.get("PER"), Some("8.5倍"));
}
