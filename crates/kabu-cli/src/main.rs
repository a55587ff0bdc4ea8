//! 비교표 파싱/밸류에이션 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 붙여넣은 비교표 파싱 (stdin)
//! pbpaste | kabu parse --format table
//!
//! # 파일에서 파싱, 오라클 없이 진단 정보 포함
//! kabu parse peers.txt --no-oracle --diagnostics
//!
//! # 단면 PSR
//! kabu psr "124,976億円" "4,509,500"
//!
//! # 피어 비교
//! kabu compare peers.txt --code 7203 --code 7267 --name 日産
//!
//! # 시세 이력과 시계열 PER/PSR
//! kabu history 7203 7267 -p 5y -i 1wk --statements toyota.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use kabu_analytics::FiscalCalendar;
use kabu_cli::commands::compare::{run_compare, CompareConfig};
use kabu_cli::commands::history::{run_history, HistoryConfig};
use kabu_cli::commands::output::OutputFormat;
use kabu_cli::commands::parse::{run_parse, ParseConfig};
use kabu_cli::commands::psr::psr_report;
use kabu_core::{init_logging, AppConfig, HistoryInterval, HistoryPeriod};

#[derive(Parser)]
#[command(name = "kabu")]
#[command(about = "Kabu CLI - 종목 비교표 파싱과 밸류에이션 지표", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 붙여넣은 비교표를 구조화된 표로 변환
    Parse {
        /// 입력 파일 (생략하거나 "-"이면 stdin)
        input: Option<String>,

        /// 출력 형식 (json, table)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// LLM 오라클을 쓰지 않고 휴리스틱 파서만 사용
        #[arg(long)]
        no_oracle: bool,

        /// 행별 정렬 방식 등 진단 정보 출력
        #[arg(long)]
        diagnostics: bool,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 기업가치/매출 셀로 PSR 계산
    Psr {
        /// 기업가치 (예: "124,976億円")
        enterprise_value: String,

        /// 매출 (예: "4,509,500", 단위 생략 시 百万円)
        sales: String,
    },

    /// 비교표에서 대상 기업 지표와 평균 비교
    Compare {
        /// 입력 파일 (생략하거나 "-"이면 stdin)
        input: Option<String>,

        /// 비교 대상 종목 코드 (반복 가능)
        #[arg(long = "code")]
        codes: Vec<String>,

        /// 비교 대상 종목명 (반복 가능, 부분 일치)
        #[arg(long = "name")]
        names: Vec<String>,

        /// 출력 형식 (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// LLM 오라클을 쓰지 않고 휴리스틱 파서만 사용
        #[arg(long)]
        no_oracle: bool,

        /// 출력 파일 경로
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 시세 이력 조회 (Yahoo Finance)
    History {
        /// 종목 코드/심볼 (예: 7203, AAPL)
        #[arg(required = true)]
        symbols: Vec<String>,

        /// 조회 기간 (1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, max)
        #[arg(short, long, default_value = "1y")]
        period: String,

        /// 캔들 간격 (1d, 1wk, 1mo)
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// 재무제표 JSON 파일 (지정 시 시계열 PER/PSR 계산)
        #[arg(long)]
        statements: Option<String>,

        /// 회계 연도 오프셋 (기본: 설정값)
        #[arg(long)]
        fiscal_year_offset: Option<i32>,

        /// 출력 형식 (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    match cli.command {
        Commands::Parse {
            input,
            format,
            no_oracle,
            diagnostics,
            output,
        } => {
            let parse_config = ParseConfig {
                input,
                format: OutputFormat::parse(&format)?,
                no_oracle,
                diagnostics,
                output,
            };
            match run_parse(parse_config, &config.oracle).await {
                Ok(count) => info!("Parsed {} rows", count),
                Err(e) => {
                    error!("Parse failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Psr {
            enterprise_value,
            sales,
        } => {
            println!("{}", psr_report(&enterprise_value, &sales));
        }

        Commands::Compare {
            input,
            codes,
            names,
            format,
            no_oracle,
            output,
        } => {
            let compare_config = CompareConfig {
                input,
                codes,
                names,
                format: OutputFormat::parse(&format)?,
                no_oracle,
                output,
            };
            match run_compare(compare_config, &config.oracle).await {
                Ok(count) => info!("Compared {} companies", count),
                Err(e) => {
                    error!("Compare failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::History {
            symbols,
            period,
            interval,
            statements,
            fiscal_year_offset,
            format,
            output,
        } => {
            let period: HistoryPeriod = period.parse().map_err(anyhow::Error::msg)?;
            let interval: HistoryInterval = interval.parse().map_err(anyhow::Error::msg)?;
            let calendar = fiscal_year_offset
                .map(FiscalCalendar::new)
                .unwrap_or_else(|| FiscalCalendar::from_config(&config.analytics));

            let history_config = HistoryConfig {
                symbols,
                period,
                interval,
                statements,
                format: OutputFormat::parse(&format)?,
                output,
            };
            match run_history(history_config, &config.market_data, calendar).await {
                Ok(count) => info!("Fetched {} symbols", count),
                Err(e) => {
                    error!("History failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
