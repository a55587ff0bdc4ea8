//! 비교표 파싱 명령.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use kabu_core::{OracleConfig, ParsedTable};
use kabu_data::ChatCompletionOracle;
use kabu_parser::{ParseOutcome, ParseSource, RowAlignment, TableParser};

use super::output::{read_input, render_table, write_output, OutputFormat};

/// 표 출력 시 셀 최대 폭.
const MAX_CELL_WIDTH: usize = 30;

/// 파싱 설정.
#[derive(Debug)]
pub struct ParseConfig {
    /// 입력 파일 (없으면 stdin)
    pub input: Option<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// LLM 오라클 사용 안 함
    pub no_oracle: bool,
    /// 진단 정보 출력
    pub diagnostics: bool,
    /// 출력 파일 경로
    pub output: Option<String>,
}

#[derive(Serialize)]
struct ParseJson<'a> {
    #[serde(flatten)]
    table: &'a ParsedTable,
    source: ParseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_detected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alignments: Option<&'a [RowAlignment]>,
}

/// 설정에 따라 파서를 만듭니다. 오라클을 만들 수 없으면 휴리스틱만 씁니다.
pub fn build_parser(oracle: &OracleConfig, no_oracle: bool) -> TableParser {
    if no_oracle {
        return TableParser::heuristic_only();
    }
    match ChatCompletionOracle::from_config(oracle) {
        Ok(Some(oracle)) => TableParser::with_oracle(Arc::new(oracle)),
        Ok(None) => TableParser::heuristic_only(),
        Err(e) => {
            warn!(error = %e, "Failed to create LLM oracle, using heuristic parser only");
            TableParser::heuristic_only()
        }
    }
}

/// 입력을 파싱하고 출력합니다. 파싱된 행 수를 반환합니다.
pub async fn run_parse(config: ParseConfig, oracle: &OracleConfig) -> Result<usize> {
    let text = read_input(config.input.as_deref())?;
    let parser = build_parser(oracle, config.no_oracle);

    let outcome = parser
        .parse_detailed(&text)
        .await
        .context("Failed to parse comparison table")?;
    info!(
        source = ?outcome.source,
        rows = outcome.table.rows.len(),
        "Comparison table parsed"
    );

    let content = match config.format {
        OutputFormat::Json => format_json(&outcome, config.diagnostics)?,
        OutputFormat::Table => format_parsed_table(&outcome, config.diagnostics),
    };
    write_output(&content, config.output.as_deref())?;

    Ok(outcome.table.rows.len())
}

fn format_json(outcome: &ParseOutcome, diagnostics: bool) -> Result<String> {
    let json = ParseJson {
        table: &outcome.table,
        source: outcome.source,
        header_detected: diagnostics.then_some(outcome.header_detected),
        alignments: diagnostics.then_some(outcome.alignments.as_slice()),
    };
    serde_json::to_string_pretty(&json).context("Failed to serialize to JSON")
}

/// 코드/종목명 뒤에 헤더 순서대로 값을 나열합니다.
pub fn format_parsed_table(outcome: &ParseOutcome, diagnostics: bool) -> String {
    let table = &outcome.table;

    let mut headers = vec!["コード".to_string(), "銘柄名".to_string()];
    headers.extend(table.headers.iter().cloned());

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.code.clone().unwrap_or_else(|| "-".to_string()),
                row.name.clone(),
            ];
            cells.extend(
                table
                    .headers
                    .iter()
                    .map(|h| row.get(h).unwrap_or("").to_string()),
            );
            cells
        })
        .collect();

    let mut output = render_table(&headers, &rows, MAX_CELL_WIDTH);
    output.push_str(&format!(
        "\nTotal: {} rows (source: {})",
        table.rows.len(),
        match outcome.source {
            ParseSource::Oracle => "oracle",
            ParseSource::Heuristic => "heuristic",
        }
    ));

    if diagnostics && outcome.source == ParseSource::Heuristic {
        output.push_str(&format!("\nHeader detected: {}", outcome.header_detected));
        for (row, alignment) in table.rows.iter().zip(&outcome.alignments) {
            if alignment.is_fallback() {
                output.push_str(&format!("\n  {}: {:?}", row.name, alignment));
            }
        }
    }

    output
}
