use proptest::prelude::*;
use serde_json::{json, Value};
use tariff_core::color::metric_value;
use tariff_core::domain::{known_regions, CountryRecord, Metric, RegionFilter};
use tariff_core::normalize::normalize_countries;

fn raw_number_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-500_000.0f64..500_000.0).prop_map(|value| json!(value)),
        (-500_000i64..500_000).prop_map(|value| json!(value.to_string())),
        Just(json!("")),
        Just(json!("   ")),
        Just(json!("n/a")),
        Just(json!("NaN")),
        Just(json!("inf")),
        Just(json!(true)),
        Just(Value::Null),
        Just(json!({ "nested": 1 })),
    ]
}

fn optional_text_strategy() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        3 => "[A-Za-z ]{1,12}".prop_map(|text| Some(json!(text))),
        1 => Just(None),
        1 => Just(Some(json!(""))),
        1 => Just(Some(json!(42))),
    ]
}

#[derive(Debug, Clone)]
struct RawRow {
    has_id: bool,
    name: Option<Value>,
    region: Option<&'static str>,
    gdp: Value,
    trade: Value,
    tariff: Value,
}

fn row_strategy() -> impl Strategy<Value = RawRow> {
    (
        prop::bool::weighted(0.85),
        optional_text_strategy(),
        prop::option::of(prop_oneof![
            Just("Asia"),
            Just("Europe"),
            Just("G20"),
            Just("Non-G20"),
            Just("North America"),
        ]),
        raw_number_strategy(),
        raw_number_strategy(),
        raw_number_strategy(),
    )
        .prop_map(|(has_id, name, region, gdp, trade, tariff)| RawRow {
            has_id,
            name,
            region,
            gdp,
            trade,
            tariff,
        })
}

fn to_json(rows: &[RawRow]) -> Value {
    let rows: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut object = json!({
                "country_gdp": [{ "gdp_2023": row.gdp.clone(), "gdp_2024_estimate": row.gdp.clone() }],
                "us_trade_data": [{
                    "trade_balance": row.trade.clone(),
                    "share_of_us_imports": row.trade.clone(),
                    "share_of_us_exports": row.tariff.clone(),
                    "reciprocal_tariff": row.tariff.clone(),
                    "tariffs_to_us": row.gdp.clone(),
                }],
            });
            if row.has_id {
                // Synthetic ids are unique and never collide with geodata codes.
                object["id"] = json!(format!("Q{index}"));
            }
            if let Some(name) = &row.name {
                object["name"] = name.clone();
            }
            if let Some(region) = row.region {
                object["region"] = json!(region);
            }
            object
        })
        .collect();
    Value::Array(rows)
}

fn has_usable_name(row: &RawRow) -> bool {
    row.name
        .as_ref()
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty())
}

fn count_matching(records: &[CountryRecord], filter: &RegionFilter) -> usize {
    records.iter().filter(|record| filter.matches(record)).count()
}

proptest! {
    #[test]
    fn normalized_numbers_are_never_nan(rows in prop::collection::vec(row_strategy(), 0..24)) {
        let normalized = normalize_countries(&to_json(&rows)).expect("array input");

        for record in &normalized.records {
            for metric in Metric::ALL {
                if let Some(value) = metric_value(record, metric) {
                    prop_assert!(value.is_finite(), "{metric:?} = {value}");
                }
            }
        }
    }

    #[test]
    fn rows_without_id_or_name_are_excluded(rows in prop::collection::vec(row_strategy(), 0..24)) {
        let normalized = normalize_countries(&to_json(&rows)).expect("array input");
        let expected = rows.iter().filter(|row| row.has_id && has_usable_name(row)).count();

        prop_assert_eq!(normalized.records.len(), expected);
        prop_assert_eq!(normalized.records.len() + normalized.dropped.len(), rows.len());
        for record in &normalized.records {
            prop_assert!(!record.id.is_empty());
            prop_assert!(!record.name.trim().is_empty());
        }
    }

    #[test]
    fn normalization_is_pure(rows in prop::collection::vec(row_strategy(), 0..16)) {
        let raw = to_json(&rows);
        let before = raw.clone();
        let first = normalize_countries(&raw).expect("array input");
        let second = normalize_countries(&raw).expect("array input");

        prop_assert_eq!(&raw, &before);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn g20_split_partitions_without_dropping(rows in prop::collection::vec(row_strategy(), 0..24)) {
        let records = normalize_countries(&to_json(&rows)).expect("array input").records;

        let g20 = count_matching(&records, &RegionFilter::G20);
        let non_g20 = count_matching(&records, &RegionFilter::NonG20);
        prop_assert_eq!(g20 + non_g20, records.len());
        prop_assert_eq!(count_matching(&records, &RegionFilter::All), records.len());

        // The policy grouping never leaks into the geographic region.
        for region in known_regions(&records) {
            prop_assert!(
                ["Asia", "Europe", "North America"].contains(&region.as_str()),
                "unexpected region {region}"
            );
        }
    }

    #[test]
    fn numeric_strings_normalize_to_the_same_number(value in -500_000i64..500_000, name in "[A-Za-z]{1,12}") {
        let raw = json!([{
            "id": "Q0",
            "name": name,
            "country_gdp": [{ "gdp_2023": value.to_string(), "gdp_2024_estimate": format!(" {value} ") }],
            "us_trade_data": [{ "trade_balance": value.to_string() }],
        }]);
        let records = normalize_countries(&raw).expect("array input").records;

        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].gdp.actual_2023, Some(value as f64));
        prop_assert_eq!(records[0].gdp.estimate_2024, Some(value as f64));
        prop_assert_eq!(records[0].us_trade_balance, Some(value as f64));
    }
}
