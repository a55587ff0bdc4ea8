//! 시세 이력 조회와 시계열 PER/PSR 명령.
//!
//! 재무제표 JSON 파일(`--statements`)을 주면 발행주식수와 함께 시점별
//! 시가총액/PER/PSR을 계산합니다.
//!
//! ```json
//! {
//!   "annual": [{ "fiscal_year": 2025, "revenue": "45095000000000", "net_income": "4944900000000" }],
//!   "quarterly": [{ "period_end": "2025-06-30", "net_income": "1180000000000" }]
//! }
//! ```

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use kabu_analytics::{compute_valuation_series, format_financial_value, FiscalCalendar};
use kabu_core::{
    FiscalStatements, HistoryInterval, HistoryPeriod, MarketDataConfig, MarketSnapshot,
    ValuationPoint,
};
use kabu_data::{MarketDataBatch, MarketDataProvider, YahooMarketDataProvider};

use super::output::{render_table, write_output, OutputFormat};

/// 시세 조회 설정.
#[derive(Debug)]
pub struct HistoryConfig {
    /// 종목 코드/심볼
    pub symbols: Vec<String>,
    /// 조회 기간
    pub period: HistoryPeriod,
    /// 캔들 간격
    pub interval: HistoryInterval,
    /// 재무제표 JSON 파일
    pub statements: Option<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 종목별 결과.
#[derive(Debug, Serialize)]
pub struct SymbolReport {
    pub identifier: String,
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
    /// 재무제표가 주어졌을 때만 계산
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<Vec<ValuationPoint>>,
}

/// 전체 결과.
#[derive(Debug, Serialize)]
pub struct HistoryReport {
    pub symbols: Vec<SymbolReport>,
    pub errors: std::collections::BTreeMap<String, String>,
}

/// 재무제표 JSON 파일을 읽습니다.
pub fn load_statements(path: &str) -> Result<FiscalStatements> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read statements file: {}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid statements JSON: {}", path))
}

/// 조회 결과에 시계열 지표를 붙입니다.
///
/// 발행주식수를 모르면 시가총액을 구할 수 없으므로 지표가 모두 비게 됩니다.
pub fn build_report(
    batch: MarketDataBatch,
    statements: Option<&FiscalStatements>,
    calendar: FiscalCalendar,
) -> HistoryReport {
    let symbols = batch
        .snapshots
        .into_iter()
        .map(|(identifier, snapshot)| {
            let valuation = statements.map(|statements| {
                let shares = snapshot
                    .fundamentals
                    .shares_outstanding
                    .unwrap_or(Decimal::ZERO);
                if shares <= Decimal::ZERO {
                    warn!(symbol = %snapshot.symbol, "Shares outstanding unknown, valuation metrics unavailable");
                }
                compute_valuation_series(&snapshot.history, shares, statements, calendar)
            });
            SymbolReport {
                identifier,
                snapshot,
                valuation,
            }
        })
        .collect();

    HistoryReport {
        symbols,
        errors: batch.errors,
    }
}

/// 시세를 조회하고 출력합니다. 성공한 종목 수를 반환합니다.
pub async fn run_history(
    config: HistoryConfig,
    market: &MarketDataConfig,
    calendar: FiscalCalendar,
) -> Result<usize> {
    let statements = config
        .statements
        .as_deref()
        .map(load_statements)
        .transpose()?;

    let provider = YahooMarketDataProvider::new(market)?;
    let batch = provider
        .fetch(&config.symbols, config.period, config.interval)
        .await;
    info!(
        succeeded = batch.snapshots.len(),
        failed = batch.errors.len(),
        "Market data fetched"
    );

    if batch.snapshots.is_empty() {
        let details = batch
            .errors
            .iter()
            .map(|(symbol, error)| format!("{}: {}", symbol, error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(anyhow::anyhow!("Market data fetch failed: {}", details));
    }

    let report = build_report(batch, statements.as_ref(), calendar);
    let content = match config.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize to JSON")?
        }
        OutputFormat::Table => format_report(&report),
    };
    write_output(&content, config.output.as_deref())?;

    Ok(report.symbols.len())
}

fn optional(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// 종목별 요약과 가격(또는 밸류에이션) 표.
pub fn format_report(report: &HistoryReport) -> String {
    let mut output = String::new();

    for entry in &report.symbols {
        let snapshot = &entry.snapshot;
        let f = &snapshot.fundamentals;
        output.push_str(&format!(
            "{} ({}, {})\n",
            snapshot.symbol, entry.identifier, snapshot.currency
        ));
        output.push_str(&format!(
            "  時価総額 {}  PER {}  PBR {}  ROE {}  配当利回り {}\n\n",
            format_financial_value(f.market_cap, None),
            optional(f.per),
            optional(f.pbr),
            optional(f.roe),
            optional(f.dividend_yield),
        ));

        let table = match &entry.valuation {
            Some(points) => {
                let headers: Vec<String> = ["Date", "Close", "時価総額", "PER", "PSR"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let rows: Vec<Vec<String>> = points
                    .iter()
                    .map(|p| {
                        vec![
                            p.point.date.to_string(),
                            p.point.close.to_string(),
                            format_financial_value(p.market_cap, None),
                            optional(p.per),
                            optional(p.psr),
                        ]
                    })
                    .collect();
                render_table(&headers, &rows, 20)
            }
            None => {
                let headers: Vec<String> = ["Date", "Open", "High", "Low", "Close", "Volume"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let rows: Vec<Vec<String>> = snapshot
                    .history
                    .iter()
                    .map(|p| {
                        vec![
                            p.date.to_string(),
                            p.open.to_string(),
                            p.high.to_string(),
                            p.low.to_string(),
                            p.close.to_string(),
                            p.volume.to_string(),
                        ]
                    })
                    .collect();
                render_table(&headers, &rows, 20)
            }
        };
        output.push_str(&table);
        output.push('\n');
    }

    for (symbol, error) in &report.errors {
        output.push_str(&format!("Failed: {} ({})\n", symbol, error));
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kabu_core::{AnnualStatement, Fundamentals, HistoricalPoint};
    use rust_decimal_macros::dec;

    fn batch(shares: Option<Decimal>) -> MarketDataBatch {
        let mut batch = MarketDataBatch::default();
        batch.snapshots.insert(
            "7203".to_string(),
            MarketSnapshot {
                symbol: "7203.T".to_string(),
                currency: "JPY".to_string(),
                history: vec![HistoricalPoint::close_only(
                    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
                    dec!(10),
                )],
                fundamentals: Fundamentals {
                    shares_outstanding: shares,
                    ..Default::default()
                },
            },
        );
        batch
            .errors
            .insert("0000".to_string(), "Data not found: 0000.T".to_string());
        batch
    }

    fn statements() -> FiscalStatements {
        FiscalStatements {
            annual: vec![AnnualStatement {
                fiscal_year: 2025,
                revenue: Some(dec!(500)),
                net_income: Some(dec!(100)),
            }],
            quarterly: Vec::new(),
        }
    }

    #[test]
    fn test_build_report_with_statements() {
        let report = build_report(batch(Some(dec!(100))), Some(&statements()), FiscalCalendar::default());
        assert_eq!(report.symbols.len(), 1);
        assert_eq!(report.errors.len(), 1);

        let points = report.symbols[0].valuation.as_ref().unwrap();
        assert_eq!(points[0].market_cap, Some(dec!(1000)));
        assert_eq!(points[0].per, Some(dec!(10)));
        assert_eq!(points[0].psr, Some(dec!(2)));
    }

    #[test]
    fn test_build_report_without_shares() {
        let report = build_report(batch(None), Some(&statements()), FiscalCalendar::default());
        let points = report.symbols[0].valuation.as_ref().unwrap();
        assert_eq!(points[0].market_cap, None);
        assert_eq!(points[0].per, None);
    }

    #[test]
    fn test_format_report() {
        let report = build_report(batch(None), None, FiscalCalendar::default());
        assert!(report.symbols[0].valuation.is_none());

        let output = format_report(&report);
        assert!(output.starts_with("7203.T (7203, JPY)"));
        assert!(output.contains("2024-06-28"));
        assert!(output.ends_with("Failed: 0000 (Data not found: 0000.T)"));
    }

    #[test]
    fn test_load_statements_missing_file() {
        assert!(load_statements("/nonexistent/statements.json").is_err());
    }
}
