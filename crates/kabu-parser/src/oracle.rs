//! 외부 텍스트→JSON 오라클 인터페이스와 결과 검증.
//!
//! 오라클은 최선 노력(best-effort) 가속기입니다. 응답은 검증을 통과할 때만
//! 채택하고, 그 외에는 호출자가 휴리스틱 파서로 넘어갑니다.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use kabu_core::{contains_validation_keyword, ParsedRow, ParsedTable, IDENTIFIER_COLUMN_LABELS};

use crate::error::OracleError;

/// 검증을 통과하기 위한 최소 헤더 수.
pub const MIN_ORACLE_HEADERS: usize = 5;

/// 오라클에 보내는 고정 지시문.
pub const ORACLE_INSTRUCTION: &str = r#"You convert copy-pasted Japanese stock comparison tables into JSON.
Rules:
- Preserve every factual column exactly as written. Do not drop, merge, or rename columns.
- Keep numbers joined with their units (e.g. "4,855億円", "8.5倍", "2.3%").
- Do NOT include identifier columns (code, company name, action) in "headers".
  Put the 4-5 digit code in each row's "code" key and the company name in "name".
- Convert full-width ％ to %.
- Use "N/A" for unavailable cells.
- Keep the original column order.
Reply with exactly one JSON object:
{"headers": ["..."], "rows": [{"code": "7203", "name": "...", "<header>": "<value>"}]}"#;

/// 텍스트→텍스트 오라클 기능.
///
/// 구현체는 단일 요청만 수행합니다. 재시도/백오프는 하지 않습니다.
#[async_trait]
pub trait TableOracle: Send + Sync {
    /// 지시문과 정규화된 텍스트를 보내고 자유 형식 응답을 받습니다.
    async fn complete(&self, instruction: &str, text: &str) -> Result<String, OracleError>;

    /// 로그용 이름.
    fn name(&self) -> &str;
}

/// 첫 `{`부터 마지막 `}`까지 잘라냅니다. 앞뒤 설명문을 허용합니다.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

/// 오라클 응답 전체를 파싱하고 검증합니다.
pub fn parse_oracle_reply(reply: &str) -> Result<ParsedTable, OracleError> {
    if reply.trim().is_empty() {
        return Err(OracleError::EmptyReply);
    }
    let json = extract_json_object(reply).ok_or(OracleError::NoJsonObject)?;
    let value: Value = serde_json::from_str(json)?;
    validate_oracle_value(&value)
}

/// JSON 값을 검증하고 [`ParsedTable`]로 변환합니다.
///
/// 채택 조건:
/// - `headers`가 문자열 배열이고, 식별자 라벨을 뺀 뒤 5개 이상
/// - 헤더 문자열에 재무 키워드(PER, 時価, 企業価値, ROE, 売上)가 하나 이상
/// - `rows`가 비어 있지 않은 객체 배열
///
/// 헤더 수는 `コード`/`銘柄名` 같은 식별자 라벨을 제거한 뒤에 셉니다. 식별자는
/// 행의 `code`/`name` 필드로 옮겨지므로, 원본 배열 길이가 5 이상이어도 실제 지표
/// 헤더가 5개 미만이면 거절합니다. 의도된 동작입니다.
///
/// 행 값은 문자열로 맞추고, `headers`에 없는 키는 버립니다.
pub fn validate_oracle_value(value: &Value) -> Result<ParsedTable, OracleError> {
    let headers = value
        .get("headers")
        .and_then(Value::as_array)
        .ok_or_else(|| OracleError::Rejected("missing headers array".into()))?;

    let headers = headers
        .iter()
        .map(|h| {
            h.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| OracleError::Rejected(format!("non-string header: {}", h)))
        })
        .collect::<Result<Vec<String>, _>>()?
        .into_iter()
        .filter(|h| !h.is_empty() && !IDENTIFIER_COLUMN_LABELS.contains(&h.as_str()))
        .collect::<Vec<_>>();

    if headers.len() < MIN_ORACLE_HEADERS {
        return Err(OracleError::Rejected(format!(
            "expected at least {} headers, got {}",
            MIN_ORACLE_HEADERS,
            headers.len()
        )));
    }
    if !contains_validation_keyword(&headers) {
        return Err(OracleError::Rejected("no financial keyword in headers".into()));
    }

    let rows = value
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| OracleError::Rejected("missing rows array".into()))?;

    let rows: Vec<ParsedRow> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(|object| coerce_row(object, &headers))
        .collect();

    if rows.is_empty() {
        return Err(OracleError::Rejected("rows is empty".into()));
    }

    Ok(ParsedTable::new(headers, rows))
}

fn coerce_row(object: &serde_json::Map<String, Value>, headers: &[String]) -> ParsedRow {
    let code = object
        .get("code")
        .and_then(scalar_to_string)
        .filter(|c| !c.is_empty());
    let name = object.get("name").and_then(scalar_to_string).unwrap_or_default();

    let values: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|h| {
            object
                .get(h)
                .and_then(scalar_to_string)
                .map(|v| (h.clone(), v))
        })
        .collect();

    ParsedRow { code, name, values }
}

/// 문자열/숫자/불리언만 문자열로 바꿉니다. null과 복합 값은 미관측으로 취급합니다.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
