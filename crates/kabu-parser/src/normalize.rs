//! 단위 정규화.
//!
//! 숫자와 뒤따르는 단위 사이의 공백을 없애 하나의 토큰으로 만듭니다.
//! 순수 함수이며 매칭되지 않는 부분은 그대로 통과합니다.

use once_cell::sync::Lazy;
use regex::Regex;

static NOT_AVAILABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bN\s*/\s*A\b").expect("valid N/A regex"));

/// 숫자 + (兆|億|百万|千) + 円. 단위 뒤에는 공백이나 줄 끝이 와야 합니다.
static COMPOUND_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9])\s*(兆|億|百万|千)\s*円(\s|$)").expect("valid compound unit regex")
});

/// 숫자 + 공백 + (円|倍|%).
static SINGLE_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9])\s+(円|倍|%)(\s|$)").expect("valid single unit regex"));

/// 텍스트의 단위 표기를 정규화합니다.
///
/// 적용 순서:
/// 1. `％` → `%`
/// 2. `n / a`, `N/ A` 등 → `N/A`
/// 3. `4,855 億 円` → `4,855億円` (兆, 億, 百万, 千)
/// 4. `8.5 倍` → `8.5倍` (円, 倍, %)
///
/// 여러 번 적용해도 결과가 같습니다.
pub fn normalize_units(text: &str) -> String {
    let text = text.replace('％', "%");
    let text = NOT_AVAILABLE.replace_all(&text, "N/A");
    let text = COMPOUND_UNIT.replace_all(&text, "${1}${2}円${3}");
    SINGLE_UNIT.replace_all(&text, "${1}${2}${3}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapse_compound_units() {
        assert_eq!(normalize_units("4,855 億円"), "4,855億円");
        assert_eq!(normalize_units("35 兆 円 8,500 百万円"), "35兆円 8,500百万円");
        assert_eq!(normalize_units("1.2 千円"), "1.2千円");
    }

    #[test]
    fn test_collapse_single_units() {
        assert_eq!(normalize_units("8.5 倍"), "8.5倍");
        assert_eq!(normalize_units("2.3 ％ 12 %"), "2.3% 12%");
        assert_eq!(normalize_units("3,000 円"), "3,000円");
    }

    #[test]
    fn test_not_available_variants() {
        assert_eq!(normalize_units("n/a N / A n /A"), "N/A N/A N/A");
        // 단어 안의 n/a는 건드리지 않는다
        assert_eq!(normalize_units("bn/ax"), "bn/ax");
    }

    #[test]
    fn test_unit_requires_boundary() {
        assert_eq!(normalize_units("7203 円谷"), "7203 円谷");
        assert_eq!(normalize_units("1 倍速"), "1 倍速");
    }

    #[test]
    fn test_other_text_unchanged() {
        let text = "トヨタ自動車 PER (会) 好調";
        assert_eq!(normalize_units(text), text);
    }

    proptest! {
        #[test]
        fn prop_idempotent_domain(s in "[0-9 ,.兆億百万千円倍%％NnAa/ト]{0,40}") {
            let once = normalize_units(&s);
            prop_assert_eq!(normalize_units(&once), once);
        }

        #[test]
        fn prop_idempotent_any(s in "\\PC{0,40}") {
            let once = normalize_units(&s);
            prop_assert_eq!(normalize_units(&once), once);
        }
    }
}
