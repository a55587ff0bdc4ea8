//! 휴리스틱 헤더/행 파서.
//!
//! 회사명에 공백이 들어갈 수 있어 토큰화만으로는 이름과 숫자 컬럼을 나눌 수
//! 없습니다. 헤더 수만큼 연속된 숫자형 토큰 구간을 찾아 그 앞을 이름으로
//! 보고, 찾지 못하면 위치 기반 매핑으로 물러납니다.
//!
//! 단계: 숫자 구간 매칭 → 위치 매핑 → 합성 컬럼명(`col_1`, `col_2`, ...).
//! 어떤 입력에도 실패하지 않습니다.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kabu_core::{is_free_text_header, ParsedRow, ParsedTable};

use crate::classify::is_numeric_like;
use crate::tokenizer::{tokenize_header, tokenize_row};

/// 헤더 줄 앵커. 라틴 앵커(PER/PBR/ROE)는 더 긴 영단어의 일부이면 안 됩니다.
static HEADER_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z])(?:PER|PBR|ROE)(?:[^A-Za-z]|$)|時価総額|企業価値")
        .expect("valid header anchor regex")
});

/// 4~5자리 종목 코드.
static SECURITY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4,5}$").expect("valid security code regex"));

/// 행 하나가 어떤 방식으로 정렬되었는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowAlignment {
    /// 숫자 구간 매칭 성공. `offset`은 코드 뒤 토큰 기준 구간 시작 위치
    NumericRun { offset: usize },
    /// 숫자 구간이 없어 위치 기반으로 매핑
    Positional,
    /// 헤더가 없어 `col_N` 컬럼명을 합성
    Synthesized,
}

impl RowAlignment {
    /// 숫자 구간 매칭 이외의 경로를 탔는지.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::NumericRun { .. })
    }
}

/// 진단 정보를 포함한 휴리스틱 파싱 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicParse {
    /// 파싱된 테이블
    pub table: ParsedTable,
    /// 헤더 줄을 찾았는지
    pub header_detected: bool,
    /// 행별 정렬 방식 (`table.rows`와 같은 순서)
    pub alignments: Vec<RowAlignment>,
}

impl HeuristicParse {
    /// 폴백 경로로 만들어진 행 수.
    pub fn fallback_count(&self) -> usize {
        self.alignments.iter().filter(|a| a.is_fallback()).count()
    }

    /// 모든 행이 숫자 구간 매칭으로 정렬되었는지.
    pub fn is_fully_aligned(&self) -> bool {
        self.header_detected && self.fallback_count() == 0
    }
}

/// 텍스트를 휴리스틱으로 파싱합니다.
pub fn parse_heuristic(text: &str) -> ParsedTable {
    parse_with_diagnostics(text).table
}

/// 텍스트를 휴리스틱으로 파싱하고 행별 정렬 방식을 함께 반환합니다.
pub fn parse_with_diagnostics(text: &str) -> HeuristicParse {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let header_index = lines.iter().position(|line| HEADER_ANCHOR.is_match(line));
    let (headers, data_lines) = match header_index {
        Some(idx) => (tokenize_header(lines[idx]), &lines[idx + 1..]),
        None => {
            debug!("No header line detected; synthesizing column names");
            (Vec::new(), &lines[..])
        }
    };

    let layout = ColumnLayout::new(&headers);
    let mut rows = Vec::with_capacity(data_lines.len());
    let mut alignments = Vec::with_capacity(data_lines.len());

    for line in data_lines {
        let tokens = tokenize_row(line);
        if tokens.is_empty() {
            continue;
        }
        let (row, alignment) = layout.parse_row(tokens);
        if alignment.is_fallback() {
            debug!(line = %line, ?alignment, "Row fell back from numeric-run alignment");
        }
        rows.push(row);
        alignments.push(alignment);
    }

    debug!(
        headers = headers.len(),
        rows = rows.len(),
        header_detected = header_index.is_some(),
        "Heuristic parse complete"
    );

    HeuristicParse {
        table: ParsedTable::new(headers, rows),
        header_detected: header_index.is_some(),
        alignments,
    }
}

/// 헤더로부터 계산한 컬럼 배치.
struct ColumnLayout<'a> {
    headers: &'a [String],
    /// 숫자 값이 들어가는 앞쪽 헤더 수
    numeric_count: usize,
    /// 끝의 자유 텍스트 헤더
    free_text: Option<&'a str>,
}

impl<'a> ColumnLayout<'a> {
    fn new(headers: &'a [String]) -> Self {
        let free_text = headers
            .last()
            .map(String::as_str)
            .filter(|h| is_free_text_header(h));
        Self {
            headers,
            numeric_count: headers.len() - usize::from(free_text.is_some()),
            free_text,
        }
    }

    fn parse_row(&self, tokens: Vec<String>) -> (ParsedRow, RowAlignment) {
        let mut tokens = tokens.into_iter().peekable();
        let code = tokens.next_if(|t| SECURITY_CODE.is_match(t));
        let rest: Vec<String> = tokens.collect();

        if self.headers.is_empty() {
            return (Self::synthesized(code, &rest), RowAlignment::Synthesized);
        }

        match self.find_numeric_run(&rest) {
            Some(offset) => (self.aligned(code, &rest, offset), RowAlignment::NumericRun { offset }),
            None => (self.positional(code, &rest), RowAlignment::Positional),
        }
    }

    /// 숫자 구간 시작 위치. 가장 왼쪽 후보가 우선입니다.
    fn find_numeric_run(&self, rest: &[String]) -> Option<usize> {
        let n = self.numeric_count;
        if rest.len() <= n {
            return None;
        }
        (1..=rest.len() - n).find(|&i| rest[i..i + n].iter().all(|t| is_numeric_like(t)))
    }

    fn aligned(&self, code: Option<String>, rest: &[String], offset: usize) -> ParsedRow {
        let end = offset + self.numeric_count;
        let mut row = ParsedRow::new(code, rest[..offset].join(" "));

        for (header, value) in self.headers.iter().zip(&rest[offset..end]) {
            row.values.insert(header.clone(), value.clone());
        }

        if let Some(free_text) = self.free_text {
            let trailing = rest[end..].join(" ");
            if !trailing.is_empty() {
                row.values.insert(free_text.to_string(), trailing);
            }
        }
        row
    }

    fn positional(&self, code: Option<String>, rest: &[String]) -> ParsedRow {
        let name = rest.first().cloned().unwrap_or_default();
        let mut row = ParsedRow::new(code, name);
        for (header, value) in self.headers.iter().zip(rest.iter().skip(1)) {
            row.values.insert(header.clone(), value.clone());
        }
        row
    }

    fn synthesized(code: Option<String>, rest: &[String]) -> ParsedRow {
        let name = rest.first().cloned().unwrap_or_default();
        let mut row = ParsedRow::new(code, name);
        for (i, value) in rest.iter().skip(1).enumerate() {
            row.values.insert(format!("col_{}", i + 1), value.clone());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "コード 銘柄名 企業価値 時価総額 PER (会) 売上 特徴語";

    #[test]
    fn test_row_realignment() {
        let text = format!(
            "{}\n7203 トヨタ自動車 124,976億円 35兆円 8.5倍 45,095億円 好調",
            HEADER
        );
        let parsed = parse_with_diagnostics(&text);
        let table = &parsed.table;

        assert_eq!(table.headers, vec!["企業価値", "時価総額", "PER (会)", "売上", "特徴語"]);
        let row = &table.rows[0];
        assert_eq!(row.code.as_deref(), Some("7203"));
        assert_eq!(row.name, "トヨタ自動車");
        assert_eq!(row.get("企業価値"), Some("124,976億円"));
        assert_eq!(row.get("売上"), Some("45,095億円"));
        assert_eq!(row.get("特徴語"), Some("好調"));
        for header in table.numeric_headers() {
            assert!(!row.get(header).unwrap_or_default().contains("トヨタ"));
        }
        assert_eq!(parsed.alignments, vec![RowAlignment::NumericRun { offset: 1 }]);
    }

    #[test]
    fn test_multi_word_name() {
        let text = format!(
            "{}\n6758 ソニー グループ 18,000億円 17兆円 18.2倍 130,208億円 ゲーム 半導体",
            HEADER
        );
        let table = parse_heuristic(&text);
        let row = &table.rows[0];
        assert_eq!(row.name, "ソニー グループ");
        assert_eq!(row.get("企業価値"), Some("18,000億円"));
        assert_eq!(row.get("特徴語"), Some("ゲーム 半導体"));
    }

    #[test]
    fn test_spaced_units_are_collapsed_before_alignment() {
        let text = format!(
            "{}\n7203 トヨタ自動車 124,976 億円 35 兆円 8.5 倍 45,095 億円",
            HEADER
        );
        let table = parse_heuristic(&text);
        let row = &table.rows[0];
        assert_eq!(row.name, "トヨタ自動車");
        assert_eq!(row.get("時価総額"), Some("35兆円"));
        assert_eq!(row.get("PER (会)"), Some("8.5倍"));
        assert!(row.get("特徴語").is_none());
    }

    #[test]
    fn test_missing_values_count_as_numeric() {
        let text = format!("{}\n9999 テスト 商事 - N/A 12.0倍 - 新興", HEADER);
        let table = parse_heuristic(&text);
        let row = &table.rows[0];
        assert_eq!(row.name, "テスト 商事");
        assert_eq!(row.get("企業価値"), Some("-"));
        assert_eq!(row.get("時価総額"), Some("N/A"));
        assert_eq!(row.get("特徴語"), Some("新興"));
    }

    #[test]
    fn test_leftmost_offset_wins() {
        // 이름이 숫자형이어도 가장 짧은 이름이 선택된다
        let text = "企業価値 PER\n1234 100 200 300";
        let parsed = parse_with_diagnostics(text);
        let row = &parsed.table.rows[0];
        assert_eq!(row.name, "100");
        assert_eq!(row.get("企業価値"), Some("200"));
        assert_eq!(row.get("PER"), Some("300"));
    }

    #[test]
    fn test_positional_fallback() {
        let text = "企業価値 PER ROE\n7203 トヨタ 好調 8.5倍";
        let parsed = parse_with_diagnostics(text);
        let row = &parsed.table.rows[0];
        assert_eq!(parsed.alignments, vec![RowAlignment::Positional]);
        assert_eq!(row.name, "トヨタ");
        assert_eq!(row.get("企業価値"), Some("好調"));
        assert_eq!(row.get("PER"), Some("8.5倍"));
        // 토큰이 모자라면 잘린다
        assert!(row.get("ROE").is_none());
        assert_eq!(parsed.fallback_count(), 1);
    }

    #[test]
    fn test_no_header_synthesizes_columns() {
        let text = "7203 トヨタ 8.5倍 2.3%\n本田 9.1倍";
        let parsed = parse_with_diagnostics(text);
        assert!(!parsed.header_detected);
        assert!(parsed.table.headers.is_empty());
        assert_eq!(parsed.table.rows.len(), 2);

        let first = &parsed.table.rows[0];
        assert_eq!(first.code.as_deref(), Some("7203"));
        assert_eq!(first.name, "トヨタ");
        assert_eq!(first.get("col_1"), Some("8.5倍"));
        assert_eq!(first.get("col_2"), Some("2.3%"));

        let second = &parsed.table.rows[1];
        assert!(second.code.is_none());
        assert_eq!(second.name, "本田");
        assert_eq!(parsed.alignments, vec![RowAlignment::Synthesized; 2]);
    }

    #[test]
    fn test_lines_before_header_are_ignored() {
        let text = "比較表\n\n企業価値 PER\n  \n7203 トヨタ 1億円 8倍\n";
        let table = parse_heuristic(text);
        assert_eq!(table.headers, vec!["企業価値", "PER"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_header_anchor_not_inside_word() {
        assert!(!HEADER_ANCHOR.is_match("SUPERMARKET PERIOD"));
        assert!(HEADER_ANCHOR.is_match("PER (会) PBR"));
        assert!(HEADER_ANCHOR.is_match("会社名 時価総額"));
        assert!(HEADER_ANCHOR.is_match("予想PER"));
    }

    #[test]
    fn test_code_only_row() {
        let text = "企業価値 PER\n7203";
        let parsed = parse_with_diagnostics(text);
        let row = &parsed.table.rows[0];
        assert_eq!(row.code.as_deref(), Some("7203"));
        assert_eq!(row.name, "");
        assert!(row.values.is_empty());
    }

    #[test]
    fn test_row_keys_subset_of_headers() {
        let text = format!(
            "{}\n7203 トヨタ自動車 124,976億円 35兆円 8.5倍 45,095億円 好調\n1111 謎 テキスト だけ",
            HEADER
        );
        let table = parse_heuristic(&text);
        for row in &table.rows {
            for key in row.values.keys() {
                assert!(table.headers.contains(key), "{} not in headers", key);
            }
        }
    }

    #[test]
    fn test_empty_text() {
        let parsed = parse_with_diagnostics("   \n  ");
        assert!(parsed.table.headers.is_empty());
        assert!(parsed.table.rows.is_empty());
    }
}
