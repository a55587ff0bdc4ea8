//! 파싱 → 스냅샷 → 평균까지의 흐름 검증.

use rust_decimal_macros::dec;

use kabu_analytics::{
    calculate_psr, compare_peers, format_financial_value, parse_financial_value, PeerTarget,
    PSR_METRIC,
};
use kabu_parser::parse_heuristic;

const TABLE_TEXT: &str = "\
コード 銘柄名 企業価値 時価総額 PER (会) 売上 ROE 特徴語
7203 トヨタ自動車 124,976億円 35兆円 8.5倍 4,509,500 12.1% 好調
7267 本田 技研工業 9,800億円 7兆円 N/A 2,000,000 8.3 % EV
7201 日産自動車 - 1.5兆円 12.0倍 - - 再建
";

#[test]
fn parsed_table_feeds_peer_comparison() {
    let table = parse_heuristic(TABLE_TEXT);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[1].name, "本田 技研工業");
    assert_eq!(table.rows[1].get("ROE"), Some("8.3%"));

    let result = compare_peers(
        &table,
        &[PeerTarget::code("7203"), PeerTarget::name("本田 技研工業"), PeerTarget::code("7201")],
    );
    assert!(result.unmatched.is_empty());

    let toyota = &result.companies[0];
    assert_eq!(toyota.metric("時価総額"), Some(dec!(35000000000000)));
    assert_eq!(toyota.metric(PSR_METRIC), Some(dec!(2.77)));

    let honda = &result.companies[1];
    assert_eq!(honda.metric("PER (会)"), None);
    assert_eq!(honda.metric(PSR_METRIC), Some(dec!(0.49)));

    let nissan = &result.companies[2];
    assert_eq!(nissan.metric(PSR_METRIC), None);

    // 本田의 PER은 N/A라 8.5와 12.0만 평균에 들어간다
    assert_eq!(result.averages.get("PER (会)"), Some(dec!(10.25)));
    assert_eq!(result.averages.get("ROE"), Some(dec!(10.2)));
    assert_eq!(result.averages.get("企業価値"), Some(dec!(6738800000000)));
}

#[test]
fn single_value_metric_has_no_average() {
    let table = parse_heuristic(TABLE_TEXT);
    let result = compare_peers(&table, &[PeerTarget::code("7203"), PeerTarget::code("7201")]);
    assert_eq!(result.averages.get("企業価値"), None);
    assert_eq!(result.averages.get(PSR_METRIC), None);
}

#[test]
fn psr_from_raw_cells() {
    let table = parse_heuristic(TABLE_TEXT);
    let toyota = &table.rows[0];
    let psr = calculate_psr(
        toyota.get("企業価値").unwrap_or_default(),
        toyota.get("売上").unwrap_or_default(),
    );
    assert_eq!(psr, "2.77");
}

#[test]
fn display_round_trip() {
    let value = parse_financial_value("124,976億円");
    assert_eq!(format_financial_value(value, None), "12.50兆円");
    assert_eq!(format_financial_value(parse_financial_value("-"), None), "-");
}
