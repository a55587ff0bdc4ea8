//! 텍스트→JSON 오라클 구현.

mod chat;

pub use chat::ChatCompletionOracle;
