//! 일본 재무 수치의 단위 접미사와 배율.
//!
//! 단위 판별은 반드시 [`UNIT_SCALES`]의 순서대로 수행해야 합니다.
//! "億円"을 "円"보다 먼저 검사하지 않으면 끝의 "円"만 떼어지고
//! 10^8 배율이 사라집니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 표시/파싱에 사용하는 값 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueUnit {
    /// 兆円 (10^12)
    #[serde(rename = "兆円")]
    Cho,
    /// 億円 (10^8)
    #[serde(rename = "億円")]
    Oku,
    /// 百万円 (10^6)
    #[serde(rename = "百万円")]
    Hyakuman,
    /// 千円 (10^3)
    #[serde(rename = "千円")]
    Sen,
    /// 円
    #[serde(rename = "円")]
    Yen,
    /// 倍 (PER, PBR 등 배수)
    #[serde(rename = "倍")]
    Times,
    /// %
    #[serde(rename = "%")]
    Percent,
}

/// (접미사, 단위) 목록. 긴 접미사가 항상 앞에 옵니다.
pub const UNIT_SCALES: &[(&str, ValueUnit)] = &[
    ("兆円", ValueUnit::Cho),
    ("兆", ValueUnit::Cho),
    ("億円", ValueUnit::Oku),
    ("億", ValueUnit::Oku),
    ("百万円", ValueUnit::Hyakuman),
    ("百万", ValueUnit::Hyakuman),
    ("千円", ValueUnit::Sen),
    ("千", ValueUnit::Sen),
    ("円", ValueUnit::Yen),
    ("倍", ValueUnit::Times),
    ("%", ValueUnit::Percent),
    ("％", ValueUnit::Percent),
];

/// 결측을 뜻하는 대시류 문자.
pub const MISSING_DASHES: &[&str] = &["-", "−", "–", "—", "―", "ー", "－"];

/// 결측 표시(단독 대시, 대소문자/공백 무관 "N/A")인지 확인합니다.
///
/// 빈 문자열은 결측 표시가 아닙니다. 호출자가 따로 처리합니다.
pub fn is_missing_marker(text: &str) -> bool {
    let trimmed = text.trim();
    if MISSING_DASHES.contains(&trimmed) {
        return true;
    }
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.eq_ignore_ascii_case("n/a")
}

impl ValueUnit {
    /// 기본 단위(円 또는 비율 그대로)로 환산하는 배율.
    pub fn scale(self) -> Decimal {
        match self {
            Self::Cho => Decimal::from(1_000_000_000_000i64),
            Self::Oku => Decimal::from(100_000_000i64),
            Self::Hyakuman => Decimal::from(1_000_000i64),
            Self::Sen => Decimal::from(1_000i64),
            Self::Yen | Self::Times | Self::Percent => Decimal::ONE,
        }
    }

    /// 표시용 접미사.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Cho => "兆円",
            Self::Oku => "億円",
            Self::Hyakuman => "百万円",
            Self::Sen => "千円",
            Self::Yen => "円",
            Self::Times => "倍",
            Self::Percent => "%",
        }
    }

    /// 문자열 끝의 단위 접미사를 찾아 (숫자 부분, 단위)로 나눕니다.
    ///
    /// 단위가 없으면 `None`.
    pub fn split_suffix(text: &str) -> Option<(&str, ValueUnit)> {
        UNIT_SCALES.iter().find_map(|(suffix, unit)| {
            text.strip_suffix(suffix).map(|number| (number, *unit))
        })
    }
}

impl std::fmt::Display for ValueUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

impl std::str::FromStr for ValueUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UNIT_SCALES
            .iter()
            .find(|(suffix, _)| *suffix == s.trim())
            .map(|(_, unit)| *unit)
            .ok_or_else(|| format!("Unknown unit: {}", s))
    }
}
