//! 헤더/행 토큰화.

use once_cell::sync::Lazy;
use regex::Regex;

use kabu_core::IDENTIFIER_COLUMN_LABELS;

use crate::normalize::normalize_units;

/// 공백(탭 포함), `|`, `｜` 연속.
static DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s|｜]+").expect("valid delimiter regex"));

/// 괄호로만 이루어진 토큰. 반각/전각 모두.
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\(.+\)|（.+）)$").expect("valid parenthetical regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// 구분자로 나누고 빈 토큰을 버립니다.
pub fn split_tokens(line: &str) -> Vec<String> {
    DELIMITER
        .split(line)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// 헤더 줄 토큰화.
///
/// `PER` `(会)`처럼 쪼개진 괄호 토큰을 앞 토큰에 붙여 `PER (会)`로 복원하고,
/// 코드/이름/액션 컬럼 라벨은 제거합니다.
pub fn tokenize_header(line: &str) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for token in split_tokens(line) {
        match merged.last_mut() {
            Some(prev) if PARENTHETICAL.is_match(&token) => {
                prev.push(' ');
                prev.push_str(&token);
            }
            _ => merged.push(token),
        }
    }

    merged.retain(|t| !IDENTIFIER_COLUMN_LABELS.contains(&t.as_str()));
    merged
}

/// 데이터 줄 토큰화. 단위 정규화 후 공백을 접고 나눕니다.
pub fn tokenize_row(line: &str) -> Vec<String> {
    let normalized = normalize_units(line);
    let collapsed = WHITESPACE_RUN.replace_all(&normalized, " ");
    split_tokens(&collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_bars_and_tabs() {
        assert_eq!(
            split_tokens(" 7203 |トヨタ自動車\t8.5倍 ｜ 好調 "),
            vec!["7203", "トヨタ自動車", "8.5倍", "好調"]
        );
        assert!(split_tokens("  | \t ").is_empty());
    }

    #[test]
    fn test_header_reconstruction() {
        assert_eq!(
            tokenize_header("企業価値 時価総額 PER (会) 売上"),
            vec!["企業価値", "時価総額", "PER (会)", "売上"]
        );
    }

    #[test]
    fn test_header_fullwidth_parenthetical() {
        assert_eq!(
            tokenize_header("PER （会） PBR (実)"),
            vec!["PER （会）", "PBR (実)"]
        );
    }

    #[test]
    fn test_header_drops_identifier_labels() {
        assert_eq!(
            tokenize_header("コード 銘柄名 企業価値 PER アクション"),
            vec!["企業価値", "PER"]
        );
    }

    #[test]
    fn test_leading_parenthetical_is_kept() {
        assert_eq!(tokenize_header("(会) PER"), vec!["(会)", "PER"]);
    }

    #[test]
    fn test_row_tokenize_joins_units() {
        assert_eq!(
            tokenize_row("7203  トヨタ自動車   124,976 億円  8.5 倍"),
            vec!["7203", "トヨタ自動車", "124,976億円", "8.5倍"]
        );
    }
}
