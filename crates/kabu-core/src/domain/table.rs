//! 파싱된 비교표.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::keywords::is_free_text_header;

/// 비교표의 한 행.
///
/// JSON으로는 `{"code": "7203", "name": "トヨタ自動車", "PER (会)": "8.5倍", ...}`
/// 처럼 평평한 객체로 직렬화됩니다. `values`에 없는 헤더는 "관측되지 않음"이며,
/// 명시적인 `"N/A"` 값과는 구분됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRow {
    /// 4~5자리 종목 코드
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// 표시 이름 (공백 포함 가능)
    #[serde(default)]
    pub name: String,
    /// 헤더 → 원문 값
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,
}

impl ParsedRow {
    /// 이름만 가진 빈 행을 생성합니다.
    pub fn new(code: Option<String>, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// 헤더 값 조회.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    /// 헤더 값 설정 (빌더용).
    pub fn with_value(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(header.into(), value.into());
        self
    }
}

/// 헤더와 행으로 구성된 파싱 결과.
///
/// 파싱 호출마다 새로 만들어지며 반환 후에는 변경하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    /// 원문 컬럼 순서의 헤더 (마지막은 자유 텍스트 컬럼일 수 있음)
    pub headers: Vec<String>,
    /// 행 목록
    pub rows: Vec<ParsedRow>,
}

impl ParsedTable {
    /// 새 테이블을 생성합니다.
    pub fn new(headers: Vec<String>, rows: Vec<ParsedRow>) -> Self {
        Self { headers, rows }
    }

    /// 행이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 마지막 헤더가 자유 텍스트 컬럼이면 그 이름을 반환합니다.
    pub fn free_text_header(&self) -> Option<&str> {
        self.headers
            .last()
            .map(String::as_str)
            .filter(|h| is_free_text_header(h))
    }

    /// 숫자 값이 들어가는 헤더 (자유 텍스트 컬럼 제외).
    pub fn numeric_headers(&self) -> &[String] {
        let count = self.headers.len() - usize::from(self.free_text_header().is_some());
        &self.headers[..count]
    }

    /// 코드 → 정확한 이름 → 이름 포함 순으로 행을 찾습니다.
    pub fn find_row(&self, code: Option<&str>, name: Option<&str>) -> Option<&ParsedRow> {
        if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(row) = self.rows.iter().find(|r| r.code.as_deref() == Some(code)) {
                return Some(row);
            }
        }

        let name = name.map(str::trim).filter(|n| !n.is_empty())?;
        self.rows
            .iter()
            .find(|r| r.name == name)
            .or_else(|| {
                self.rows
                    .iter()
                    .find(|r| !r.name.is_empty() && (r.name.contains(name) || name.contains(&r.name)))
            })
    }
}
