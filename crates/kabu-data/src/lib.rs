//! 외부 협력자 구현.
//!
//! 이 crate는 다음을 제공합니다:
//! - OpenAI 호환 chat completions 오라클 ([`ChatCompletionOracle`])
//! - 시세/펀더멘털 제공자 트레이트와 Yahoo Finance 구현

pub mod error;
pub mod market;
pub mod oracle;

pub use error::{DataError, Result};
pub use market::{
    to_market_symbol, MarketDataBatch, MarketDataProvider, YahooMarketDataProvider,
};
pub use oracle::ChatCompletionOracle;
