//! 단면 PSR (기업가치 ÷ 매출).
//!
//! 비교표의 기업가치 셀은 항상 億円 단위이고 매출 셀은 百万円 숫자로 오는 것이
//! 기본 형식입니다. 두 값을 億円으로 맞춘 뒤 나눕니다.
//! 계산할 수 없으면 `null`이 아니라 `"N/A"` 문자열을 돌려줍니다.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use kabu_core::{DecimalExt, ValueUnit};

use crate::value::parse_financial_value;

/// 계산 불가 표시.
pub const PSR_UNAVAILABLE: &str = "N/A";

/// 億円 바로 앞의 첫 숫자 그룹 (부호 포함).
static ENTERPRISE_VALUE_OKU: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+\-−]?[0-9][0-9,]*(?:\.[0-9]+)?)億円").expect("valid enterprise value regex")
});

/// 百万円 숫자 (단위 생략 가능).
static SALES_MILLIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9][0-9,]*(?:\.[0-9]+)?)(?:百万円|百万)?$").expect("valid sales regex")
});

fn parse_digits(digits: &str) -> Option<Decimal> {
    let digits = digits.replace(',', "").replace('−', "-");
    Decimal::from_str(digits.trim_start_matches('+')).ok()
}

/// 기업가치 셀에서 億円 값을 꺼냅니다.
pub fn enterprise_value_oku(text: &str) -> Option<Decimal> {
    let captures = ENTERPRISE_VALUE_OKU.captures(text)?;
    parse_digits(captures.get(1)?.as_str())
}

/// 매출 셀을 億円으로 환산합니다.
///
/// 단위가 없거나 百万円이면 ×0.01, 다른 금액 단위(兆円/億円/千円/円)가 붙어 있으면
/// 일반 값 정규화 후 10^8로 나눕니다. 배수/퍼센트는 매출이 아니므로 `None`.
pub fn sales_oku(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if let Some(captures) = SALES_MILLIONS.captures(text) {
        let millions = parse_digits(captures.get(1)?.as_str())?;
        return Some(millions / Decimal::ONE_HUNDRED);
    }

    match ValueUnit::split_suffix(text) {
        Some((_, ValueUnit::Times | ValueUnit::Percent)) | None => None,
        Some(_) => parse_financial_value(text).map(|yen| yen / ValueUnit::Oku.scale()),
    }
}

/// PSR 값. 기업가치나 매출이 0 이하이면 `None`.
///
/// 순현금 기업의 음수 기업가치는 의미 있는 PSR이 아니므로 계산하지 않습니다.
pub fn psr_value(enterprise_value: &str, sales: &str) -> Option<Decimal> {
    let ev = enterprise_value_oku(enterprise_value)?;
    let sales = sales_oku(sales)?;
    if ev <= Decimal::ZERO || sales <= Decimal::ZERO {
        return None;
    }
    ev.checked_div(sales).map(|psr| psr.round_half_up(2))
}

/// PSR을 소수 2자리 문자열로 계산합니다. 계산할 수 없으면 `"N/A"`.
///
/// ```
/// use kabu_analytics::calculate_psr;
///
/// assert_eq!(calculate_psr("124,976億円", "4,509,500"), "2.77");
/// assert_eq!(calculate_psr("-", "4,509,500"), "N/A");
/// ```
pub fn calculate_psr(enterprise_value: &str, sales: &str) -> String {
    psr_value(enterprise_value, sales)
        .map(|psr| psr.to_fixed(2))
        .unwrap_or_else(|| PSR_UNAVAILABLE.to_string())
}
