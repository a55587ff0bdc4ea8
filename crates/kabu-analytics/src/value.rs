//! 재무 값 정규화.
//!
//! "124,976億円" → 12,497,600,000,000 처럼 단위 문자열을 기본 단위(円, 배수/퍼센트는
//! 그대로)로 바꾸고, 반대로 크기에 맞는 단위로 표시합니다.
//!
//! 단위 판별은 [`UNIT_SCALES`] 순서를 따릅니다. 긴 접미사를 먼저 보지 않으면
//! "8,500百万円"이 "円"으로만 떼어져 10^6 배율을 잃습니다.
//!
//! [`UNIT_SCALES`]: kabu_core::UNIT_SCALES

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use kabu_core::{group_thousands, is_missing_marker, DecimalExt, ValueUnit};

/// 쉼표/부호 정리 후 남아야 하는 숫자 형태.
static NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("valid numeral regex"));

/// 재무 값 문자열을 숫자로 파싱합니다.
///
/// 빈 문자열, 단독 대시, "N/A" 변형, 숫자가 아닌 나머지는 `None`입니다.
///
/// # Examples
///
/// ```
/// use kabu_analytics::parse_financial_value;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_financial_value("8,500百万円"), Some(Decimal::from(8_500_000_000i64)));
/// assert_eq!(parse_financial_value("N/A"), None);
/// ```
pub fn parse_financial_value(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() || is_missing_marker(text) {
        return None;
    }

    let (number, scale) = match ValueUnit::split_suffix(text) {
        Some((number, unit)) => (number, unit.scale()),
        None => (text, Decimal::ONE),
    };

    let cleaned = number.trim().replace(',', "").replace('−', "-");
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if !NUMERAL.is_match(cleaned) {
        return None;
    }

    Decimal::from_str(cleaned).ok()?.checked_mul(scale)
}

/// 숫자를 일본어 단위 문자열로 표시합니다.
///
/// 단위 힌트가 없으면 크기로 단위를 고릅니다.
/// - 10^12 이상: 兆円, 소수 2자리
/// - 10^8 이상: 億円, 정수
/// - 10^6 이상: 百万円, 정수
/// - 그 외: 천 단위 쉼표, 소수 최대 2자리
///
/// 단위 힌트가 있으면 크기와 무관하게 그 단위로 소수 2자리 표시합니다.
/// 값이 없으면 `"-"`.
pub fn format_financial_value(value: Option<Decimal>, unit: Option<ValueUnit>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };

    if let Some(unit) = unit {
        return format!("{}{}", (value / unit.scale()).to_grouped(2), unit.suffix());
    }

    let abs = value.abs();
    let auto = [
        (ValueUnit::Cho, 2),
        (ValueUnit::Oku, 0),
        (ValueUnit::Hyakuman, 0),
    ]
    .into_iter()
    .find(|(unit, _)| abs >= unit.scale());

    match auto {
        Some((unit, dp)) => format!("{}{}", (value / unit.scale()).to_grouped(dp), unit.suffix()),
        None => {
            let rounded = value.round_half_up(2).normalize();
            if rounded.is_zero() {
                "0".to_string()
            } else {
                group_thousands(&rounded.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_financial_value("124,976億円"), Some(dec!(12497600000000)));
        assert_eq!(parse_financial_value("35兆円"), Some(dec!(35000000000000)));
        assert_eq!(parse_financial_value("1.5兆"), Some(dec!(1500000000000)));
        assert_eq!(parse_financial_value("5億"), Some(dec!(500000000)));
        assert_eq!(parse_financial_value("1,200千円"), Some(dec!(1200000)));
        assert_eq!(parse_financial_value("3,000円"), Some(dec!(3000)));
        assert_eq!(parse_financial_value("8.5倍"), Some(dec!(8.5)));
        assert_eq!(parse_financial_value("2.31%"), Some(dec!(2.31)));
        assert_eq!(parse_financial_value("2.31％"), Some(dec!(2.31)));
        assert_eq!(parse_financial_value("1,234"), Some(dec!(1234)));
    }

    #[test]
    fn test_unit_order_sensitivity() {
        assert_eq!(parse_financial_value("8,500百万円"), Some(dec!(8500000000)));
        assert_eq!(parse_financial_value("8,500百万"), Some(dec!(8500000000)));
    }

    #[test]
    fn test_signs() {
        assert_eq!(parse_financial_value("-12.4%"), Some(dec!(-12.4)));
        assert_eq!(parse_financial_value("−3億円"), Some(dec!(-300000000)));
        assert_eq!(parse_financial_value("+0.5倍"), Some(dec!(0.5)));
    }

    #[test]
    fn test_missing_values() {
        for text in ["", "-", "−", "N/A", "n/a", "N / A", "  ", "—"] {
            assert_eq!(parse_financial_value(text), None, "{:?}", text);
        }
    }

    #[test]
    fn test_unparseable() {
        for text in ["億円", "abc", "1.2.3億円", "トヨタ", "12-3", "1e5"] {
            assert_eq!(parse_financial_value(text), None, "{:?}", text);
        }
    }

    #[test]
    fn test_format_auto_thresholds() {
        assert_eq!(format_financial_value(Some(dec!(35000000000000)), None), "35.00兆円");
        assert_eq!(format_financial_value(Some(dec!(12497600000000)), None), "12.50兆円");
        assert_eq!(format_financial_value(Some(dec!(4509500000000)), None), "45,095億円");
        assert_eq!(format_financial_value(Some(dec!(8500000000)), None), "85億円");
        assert_eq!(format_financial_value(Some(dec!(12345678)), None), "12百万円");
        assert_eq!(format_financial_value(Some(dec!(123456.789)), None), "123,456.79");
        assert_eq!(format_financial_value(Some(dec!(8.50)), None), "8.5");
        assert_eq!(format_financial_value(Some(dec!(-250000000)), None), "-3億円");
    }

    #[test]
    fn test_format_forced_unit() {
        assert_eq!(
            format_financial_value(Some(dec!(12497600000000)), Some(ValueUnit::Oku)),
            "124,976.00億円"
        );
        assert_eq!(format_financial_value(Some(dec!(8.5)), Some(ValueUnit::Times)), "8.50倍");
        assert_eq!(format_financial_value(Some(dec!(100)), Some(ValueUnit::Cho)), "0.00兆円");
        assert_eq!(format_financial_value(None, Some(ValueUnit::Percent)), "-");
    }

    #[test]
    fn test_format_none() {
        assert_eq!(format_financial_value(None, None), "-");
    }

    fn round_trip_units() -> impl Strategy<Value = ValueUnit> {
        prop_oneof![
            Just(ValueUnit::Cho),
            Just(ValueUnit::Oku),
            Just(ValueUnit::Yen),
            Just(ValueUnit::Times),
            Just(ValueUnit::Percent),
        ]
    }

    proptest! {
        #[test]
        fn prop_format_parse_round_trip(
            mantissa in -10_000_000_000i64..10_000_000_000i64,
            unit in round_trip_units(),
        ) {
            // 단위 기준 소수 4자리 값
            let in_unit = Decimal::new(mantissa, 4);
            let value = in_unit * unit.scale();

            let parsed = parse_financial_value(&format_financial_value(Some(value), Some(unit)))
                .expect("formatted value parses");
            let expected = in_unit.round_half_up(2) * unit.scale();
            prop_assert_eq!(parsed, expected);
        }
    }
}
