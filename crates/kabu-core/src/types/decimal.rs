//! 표시용 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal 표시 확장 트레이트.
pub trait DecimalExt {
    /// 사사오입(MidpointAwayFromZero)으로 반올림합니다.
    fn round_half_up(&self, dp: u32) -> Decimal;

    /// 소수점 자릿수를 고정한 문자열 ("2.77", "35.00").
    fn to_fixed(&self, dp: u32) -> String;

    /// 천 단위 쉼표가 들어간 고정 소수점 문자열 ("124,976", "1,234.50").
    fn to_grouped(&self, dp: u32) -> String;
}

impl DecimalExt for Decimal {
    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_fixed(&self, dp: u32) -> String {
        let mut value = self.round_half_up(dp);
        if value.is_zero() {
            // "-0.00" 방지
            value = Decimal::ZERO;
        }
        value.rescale(dp);
        value.to_string()
    }

    fn to_grouped(&self, dp: u32) -> String {
        group_thousands(&self.to_fixed(dp))
    }
}

/// 숫자 문자열의 정수부에 천 단위 쉼표를 넣습니다.
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
