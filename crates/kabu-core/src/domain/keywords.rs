//! 헤더 감지와 결과 검증에 쓰는 고정 키워드.
//!
//! 설정이 아니라 계약 상수입니다. 데이터 제공처의 비교표 컬럼명이 바뀌지 않는 한
//! 변경하지 않습니다.

/// 인식하는 재무 키워드 전체 집합.
pub const FINANCIAL_KEYWORDS: &[&str] = &["PER", "PBR", "ROE", "時価総額", "企業価値", "時価", "売上"];

/// 헤더 행을 찾을 때 쓰는 앵커 키워드.
pub const HEADER_ANCHOR_KEYWORDS: &[&str] = &["PER", "PBR", "ROE", "時価総額", "企業価値"];

/// 오라클 결과 검증 시 헤더 문자열에 하나 이상 포함되어야 하는 키워드.
pub const VALIDATION_KEYWORDS: &[&str] = &["PER", "時価", "企業価値", "ROE", "売上"];

/// 헤더에서 제거하는 식별자/조작 컬럼 라벨.
///
/// 코드와 이름은 행의 예약 키(`code`, `name`)로만 노출됩니다.
pub const IDENTIFIER_COLUMN_LABELS: &[&str] = &[
    "コード",
    "銘柄コード",
    "証券コード",
    "Code",
    "code",
    "CODE",
    "銘柄名",
    "銘柄",
    "企業名",
    "会社名",
    "Name",
    "name",
    "Company",
    "アクション",
    "Action",
    "操作",
];

/// 숫자가 아닌 자유 텍스트(특징어) 컬럼 라벨. 헤더 맨 끝에 올 때만 예약 취급합니다.
pub const FREE_TEXT_HEADERS: &[&str] = &["特徴語", "特徴ワード", "特徴", "キーワード", "タグ"];

/// 행 레코드의 예약 키.
pub const RESERVED_ROW_KEYS: &[&str] = &["code", "name"];

/// 헤더가 자유 텍스트 컬럼 라벨인지 확인합니다.
pub fn is_free_text_header(header: &str) -> bool {
    FREE_TEXT_HEADERS.contains(&header.trim())
}

/// 헤더 목록을 이어 붙인 문자열에 검증 키워드가 하나라도 있는지 확인합니다.
pub fn contains_validation_keyword(headers: &[String]) -> bool {
    let joined = headers.join(" ");
    VALIDATION_KEYWORDS.iter().any(|kw| joined.contains(kw))
}
