//! 단면 PSR 계산 명령.

use kabu_analytics::{
    calculate_psr, enterprise_value_oku, format_financial_value, parse_financial_value, sales_oku,
};
use kabu_core::ValueUnit;

/// 기업가치와 매출 셀로 PSR 요약을 만듭니다.
///
/// ```text
/// 企業価値: 12.50兆円
/// 売上:     4.51兆円
/// PSR:      2.77
/// ```
pub fn psr_report(enterprise_value: &str, sales: &str) -> String {
    let psr = calculate_psr(enterprise_value, sales);

    let ev_display = format_financial_value(parse_financial_value(enterprise_value), None);
    // 단위 없는 매출은 백만円으로 봅니다
    let sales_display =
        format_financial_value(sales_oku(sales).map(|oku| oku * ValueUnit::Oku.scale()), None);

    let mut output = String::new();
    output.push_str(&format!("企業価値: {}\n", ev_display));
    output.push_str(&format!("売上:     {}\n", sales_display));
    output.push_str(&format!("PSR:      {}", psr));

    if enterprise_value_oku(enterprise_value).is_none() {
        output.push_str("\n(企業価値 not recognized as 億円/兆円 value)");
    }
    output
}
