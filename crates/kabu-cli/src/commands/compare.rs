//! 피어 비교 명령.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::info;

use kabu_analytics::{compare_peers, format_financial_value, PeerComparison, PeerTarget};
use kabu_core::OracleConfig;

use super::output::{read_input, render_table, write_output, OutputFormat};
use super::parse::build_parser;

/// 피어 비교 설정.
#[derive(Debug)]
pub struct CompareConfig {
    /// 입력 파일 (없으면 stdin)
    pub input: Option<String>,
    /// 비교 대상 종목 코드
    pub codes: Vec<String>,
    /// 비교 대상 종목명
    pub names: Vec<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// LLM 오라클 사용 안 함
    pub no_oracle: bool,
    /// 출력 파일 경로
    pub output: Option<String>,
}

impl CompareConfig {
    /// 코드 대상 뒤에 이름 대상을 붙입니다.
    pub fn targets(&self) -> Vec<PeerTarget> {
        self.codes
            .iter()
            .map(PeerTarget::code)
            .chain(self.names.iter().map(PeerTarget::name))
            .collect()
    }
}

/// 비교표를 파싱해 대상 기업을 비교합니다. 매칭된 기업 수를 반환합니다.
pub async fn run_compare(config: CompareConfig, oracle: &OracleConfig) -> Result<usize> {
    let text = read_input(config.input.as_deref())?;
    let parser = build_parser(oracle, config.no_oracle);
    let table = parser
        .parse(&text)
        .await
        .context("Failed to parse comparison table")?;

    let comparison = compare_peers(&table, &config.targets());
    info!(
        companies = comparison.companies.len(),
        unmatched = comparison.unmatched.len(),
        "Peer comparison complete"
    );

    let content = match config.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&comparison).context("Failed to serialize to JSON")?
        }
        OutputFormat::Table => format_comparison(&comparison),
    };
    write_output(&content, config.output.as_deref())?;

    Ok(comparison.companies.len())
}

/// 기업별 지표와 평균 행을 표로 만듭니다.
pub fn format_comparison(comparison: &PeerComparison) -> String {
    let metric_keys: Vec<String> = comparison
        .companies
        .iter()
        .flat_map(|c| c.metrics.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut headers = vec!["コード".to_string(), "銘柄名".to_string()];
    headers.extend(metric_keys.iter().cloned());

    let mut rows: Vec<Vec<String>> = comparison
        .companies
        .iter()
        .map(|company| {
            let mut cells = vec![
                company.code.clone().unwrap_or_else(|| "-".to_string()),
                company.name.clone(),
            ];
            cells.extend(
                metric_keys
                    .iter()
                    .map(|key| format_financial_value(company.metric(key), None)),
            );
            cells
        })
        .collect();

    let mut average_row = vec![String::new(), "平均".to_string()];
    average_row.extend(
        metric_keys
            .iter()
            .map(|key| format_financial_value(comparison.averages.get(key), None)),
    );
    rows.push(average_row);

    let mut output = render_table(&headers, &rows, 24);
    if !comparison.unmatched.is_empty() {
        output.push_str("\nNot found:");
        for target in &comparison.unmatched {
            let label = target
                .code
                .as_deref()
                .or(target.name.as_deref())
                .unwrap_or("?");
            output.push_str(&format!("\n  {}", label));
        }
    }
    output
}
