//! 숫자형 토큰 판별.
//!
//! 행 재정렬의 기준이 되므로 부분 매칭은 허용하지 않습니다.
//! `3M`이나 `7and` 같은 이름 토큰은 숫자로 보지 않습니다.

use once_cell::sync::Lazy;
use regex::Regex;

use kabu_core::is_missing_marker;

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+\-−]?[0-9][0-9,]*(?:\.[0-9]+)?(?:兆円|億円|百万円|千円|円|倍|%|％)?$")
        .expect("valid numeric token regex")
});

/// 토큰이 숫자형(단위 접미사 허용) 또는 결측 표시인지 확인합니다.
pub fn is_numeric_like(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    is_missing_marker(token) || NUMERIC_TOKEN.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_tokens() {
        for token in [
            "124,976億円",
            "35兆円",
            "8.5倍",
            "2.31%",
            "2.31％",
            "-12.4%",
            "−3",
            "+0.5倍",
            "8,500百万円",
            "1,200千円",
            "3,000円",
            "7203",
        ] {
            assert!(is_numeric_like(token), "{}", token);
        }
    }

    #[test]
    fn test_missing_markers() {
        for token in ["-", "—", "−", "N/A", "n/a"] {
            assert!(is_numeric_like(token), "{}", token);
        }
    }

    #[test]
    fn test_text_tokens() {
        for token in ["", "   ", "トヨタ自動車", "3M", "7and", "1.2.3", "12億", "円", "倍", ",100"] {
            assert!(!is_numeric_like(token), "{:?}", token);
        }
    }
}
