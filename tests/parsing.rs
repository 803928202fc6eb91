use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use lotto_check::drawing::Provenance;
use lotto_check::error::FetchError;
use lotto_check::game::Tier;
use lotto_check::megamillions::{
    cash_value_display, jackpot_display, parse_detail_response, parse_paging_response,
};
use lotto_check::powerball::{extract_prize_tiers, parse_draw_page, parse_prize_page};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn requested() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 27).expect("valid date")
}

#[test]
fn paging_payload_is_unwrapped_twice() {
    let raw = read_fixture("megamillions_paging.json");
    let paging = parse_paging_response(&raw).expect("fixture should parse");
    assert_eq!(paging.rows.len(), 1);
    let row = &paging.rows[0];
    assert_eq!(row.play_date_ticks, 638917632000000000);
    assert_eq!([row.n1, row.n2, row.n3, row.n4, row.n5], [7, 18, 33, 41, 62]);
    assert_eq!(row.mball, 14);
    assert_eq!(row.megaplier, Some(-1));
}

#[test]
fn empty_paging_payloads_have_no_rows() {
    let raw = read_fixture("megamillions_paging_empty.json");
    assert!(parse_paging_response(&raw).expect("should parse").rows.is_empty());
    assert!(parse_paging_response("null").expect("null should parse").rows.is_empty());
    assert!(parse_paging_response(r#"{"d":""}"#).expect("blank d").rows.is_empty());
}

#[test]
fn paging_accepts_object_envelope() {
    let raw = r#"{"d":{"DrawingData":[{"PlayDate":"2025-08-26T00:00:00","PlayDateTicks":1,"N1":1,"N2":2,"N3":3,"N4":4,"N5":5,"MBall":6}]}}"#;
    let paging = parse_paging_response(raw).expect("object d should parse");
    assert_eq!(paging.rows[0].megaplier, None);
}

#[test]
fn broken_envelopes_are_malformed() {
    assert!(matches!(
        parse_paging_response("<html>oops</html>"),
        Err(FetchError::Malformed(_))
    ));
    assert!(matches!(
        parse_detail_response(r#"{"d":"{not json"}"#),
        Err(FetchError::Malformed(_))
    ));
    assert!(matches!(
        parse_detail_response(r#"{"d":null}"#),
        Err(FetchError::Malformed(_))
    ));
}

#[test]
fn detail_jackpot_shapes_resolve_by_precedence() {
    let pool = parse_detail_response(&read_fixture("megamillions_detail.json")).expect("pool");
    assert_eq!(jackpot_display(pool.jackpot.as_ref()), "$480 Million");
    assert_eq!(
        cash_value_display(pool.jackpot.as_ref()).as_deref(),
        Some("$216.3 Million")
    );
    assert_eq!(pool.drawing.megaplier, Some(3));

    let text = parse_detail_response(&read_fixture("megamillions_detail_string_jackpot.json"))
        .expect("string");
    assert_eq!(jackpot_display(text.jackpot.as_ref()), "$480 Million");
    assert_eq!(cash_value_display(text.jackpot.as_ref()), None);

    let number = parse_detail_response(&read_fixture("megamillions_detail_numeric_jackpot.json"))
        .expect("number");
    assert_eq!(jackpot_display(number.jackpot.as_ref()), "$25 Thousand");

    let odd = parse_detail_response(
        r#"{"d":"{\"Drawing\":{\"N1\":1,\"N2\":2,\"N3\":3,\"N4\":4,\"N5\":5,\"MBall\":6},\"Jackpot\":true}"}"#,
    )
    .expect("unexpected jackpot shape still parses");
    assert_eq!(jackpot_display(odd.jackpot.as_ref()), "Unknown");
}

#[test]
fn powerball_page_yields_full_drawing() {
    let html = read_fixture("powerball_draw.html");
    let drawing = parse_draw_page(&html, requested()).expect("fixture should parse");
    assert_eq!(drawing.primary, [10, 20, 30, 40, 50]);
    assert_eq!(drawing.bonus, 25);
    assert_eq!(drawing.multiplier, Some(2));
    assert_eq!(drawing.draw_date, requested());
    assert_eq!(drawing.provenance, Provenance::PowerballScrape);
    let jackpot = drawing.jackpot.expect("jackpot on page");
    assert_eq!(jackpot.estimated, "$750 Million");
    assert_eq!(jackpot.cash_value.as_deref(), Some("$337.5 Million"));
}

#[test]
fn powerball_optional_fields_default() {
    let html = read_fixture("powerball_minimal.html");
    let other_day = NaiveDate::from_ymd_opt(2025, 8, 30).expect("valid date");
    let drawing = parse_draw_page(&html, other_day).expect("balls are enough");
    assert_eq!(drawing.primary, [1, 2, 3, 4, 5]);
    assert_eq!(drawing.bonus, 6);
    assert_eq!(drawing.multiplier, None);
    assert_eq!(drawing.draw_date, other_day);
    assert!(drawing.jackpot.is_none());
}

#[test]
fn powerball_missing_mandatory_fields_is_no_data() {
    let four_balls = r#"
        <div class="form-control col white-balls item-powerball">1</div>
        <div class="form-control col white-balls item-powerball">2</div>
        <div class="form-control col white-balls item-powerball">3</div>
        <div class="form-control col white-balls item-powerball">4</div>
        <div class="form-control col powerball item-powerball">6</div>"#;
    match parse_draw_page(four_balls, requested()) {
        Err(FetchError::NoData(msg)) => assert!(msg.contains("found 4")),
        other => panic!("expected NoData, got {other:?}"),
    }

    let html = read_fixture("powerball_minimal.html").replace(
        r#"<div class="form-control col powerball item-powerball">6</div>"#,
        "",
    );
    assert!(matches!(
        parse_draw_page(&html, requested()),
        Err(FetchError::NoData(_))
    ));
}

#[test]
fn structured_prize_rows_use_class_tokens() {
    let info = parse_prize_page(&read_fixture("powerball_draw.html"), requested());
    assert_eq!(info.estimated_jackpot, "$750 Million");
    assert_eq!(info.cash_value, "$337.5 Million");
    assert_eq!(info.tiers.len(), 9);

    let tiers: Vec<Tier> = info.tiers.iter().map(|r| r.tier).collect();
    assert_eq!(tiers, Tier::CANONICAL.to_vec());
    assert!(info.tiers.iter().all(|r| !r.position_mismatch));

    assert_eq!(info.tiers[0].prize, "Grand Prize");
    assert_eq!(info.tiers[3].prize, "$100");
    assert_eq!(info.tiers[4].prize, "$100");
    assert_eq!(info.tiers[5].winners, 2901);
    assert_eq!(info.tiers[5].multiplier_winners, 704);
    assert_eq!(info.tiers[8].multiplier_prize, "$8");
}

#[test]
fn grouped_cells_fall_back_to_position() {
    let rows = extract_prize_tiers(&read_fixture("powerball_grouped.html"));
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[3].tier, Tier::Four);
    assert_eq!(rows[4].tier, Tier::ThreeBonus);
    assert!(!rows[3].position_mismatch);
    assert!(!rows[4].position_mismatch);
    assert_eq!(rows[4].winners, 140);
    assert_eq!(rows[4].multiplier_winners, 0);

    // Upstream shows $4 where 2+1 should pay $7.
    assert_eq!(rows[6].tier, Tier::TwoBonus);
    assert!(rows[6].position_mismatch);
}

#[test]
fn missing_table_synthesizes_placeholder() {
    let info = parse_prize_page(&read_fixture("powerball_minimal.html"), requested());
    assert_eq!(info.tiers.len(), 9);
    assert!(info.tiers.iter().all(|r| r.winners == 0));
    assert_eq!(info.tiers[0].prize, "Grand Prize");
    assert_eq!(info.tiers[2].prize, "$50,000");
    assert!(info.estimated_jackpot.is_empty());
}

#[test]
fn repeated_prize_table_keeps_first_row_per_tier() {
    let html = read_fixture("powerball_draw.html");
    let doubled = format!("{html}\n{html}");
    let rows = extract_prize_tiers(&doubled);
    assert_eq!(rows.len(), 9);
    let tiers: Vec<Tier> = rows.iter().map(|r| r.tier).collect();
    assert_eq!(tiers, Tier::CANONICAL.to_vec());
    assert_eq!(rows[5].winners, 2901);
}

#[test]
fn page_title_date_overrides_requested_date() {
    let html = read_fixture("powerball_draw.html");
    let later = NaiveDate::from_ymd_opt(2025, 8, 30).expect("valid date");
    let drawing = parse_draw_page(&html, later).expect("fixture should parse");
    assert_eq!(drawing.draw_date, requested());
}

#[test]
fn paging_rows_ignore_audit_fields() {
    let raw = r#"{"d":"{\"DrawingData\":[{\"PlayDate\":\"2025-08-26T00:00:00\",\"PlayDateTicks\":7,\"N1\":1,\"N2\":2,\"N3\":3,\"N4\":4,\"N5\":5,\"MBall\":6,\"UpdatedBy\":\"SERVICE\",\"UpdatedTime\":\"2025-08-26T23:14:05\",\"Extra\":null}]}"}"#;
    let paging = parse_paging_response(raw).expect("audit fields are skipped");
    assert_eq!(paging.rows[0].play_date_ticks, 7);
    assert_eq!(paging.rows[0].mball, 6);
}
