//! 비교표/지표/시세 도메인 모델.

pub mod keywords;
mod market;
mod metrics;
mod table;

pub use keywords::*;
pub use market::*;
pub use metrics::*;
pub use table::*;
