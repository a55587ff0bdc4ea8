//! 공통 값 타입.

mod decimal;
mod unit;

pub use decimal::*;
pub use unit::*;
