//! 설정 관리.
//!
//! `config/default.toml`(선택) 위에 `KABU__` 접두사 환경 변수를 덮어써서
//! 애플리케이션 설정을 구성합니다.
//!
//! ```text
//! KABU__SERVER__PORT=8080
//! KABU__ORACLE__ENABLED=true
//! KABU__ANALYTICS__FISCAL_YEAR_OFFSET=0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// LLM 오라클 설정
    pub oracle: OracleConfig,
    /// 시세 데이터 설정
    pub market_data: MarketDataConfig,
    /// 파생 지표 설정
    pub analytics: AnalyticsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 60,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 필터 (예: "info", "kabu_parser=debug")
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM 오라클 설정.
///
/// 오라클은 선택 사항이며, 비활성화되어 있거나 API 키가 없으면
/// 휴리스틱 파서만 사용합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OracleConfig {
    /// 오라클 사용 여부
    pub enabled: bool,
    /// OpenAI 호환 chat completions 엔드포인트
    pub endpoint: String,
    /// 모델 이름
    pub model: String,
    /// API 키를 읽어올 환경 변수 이름
    pub api_key_env: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OracleConfig {
    /// 환경 변수에서 API 키를 읽습니다. 비어 있으면 `None`.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// 시세 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// 숫자로만 된 종목 코드에 붙일 거래소 접미사 (도쿄: ".T")
    pub exchange_suffix: String,
    /// 종목 간 요청 딜레이 (밀리초)
    pub request_delay_ms: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            exchange_suffix: ".T".to_string(),
            request_delay_ms: 300,
        }
    }
}

/// 파생 지표 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 달력 연도 → 회계 연도 오프셋.
    ///
    /// 3월 결산 기업은 Y년의 주가를 Y+1년 3월 결산 실적과 대응시키므로 기본값 1.
    pub fiscal_year_offset: i32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fiscal_year_offset: 1,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("KABU")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert!(!config.oracle.enabled);
        assert_eq!(config.market_data.exchange_suffix, ".T");
        assert_eq!(config.analytics.fiscal_year_offset, 1);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let parsed: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[oracle]\nenabled = true\n[analytics]\nfiscal_year_offset = 0\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(parsed.oracle.enabled);
        assert_eq!(parsed.oracle.model, "gpt-4o-mini");
        assert_eq!(parsed.analytics.fiscal_year_offset, 0);
    }
}
