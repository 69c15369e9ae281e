//! Reshapes the loosely typed country dataset into [`CountryRecord`]s.
//!
//! The remote document is a JSON array where every country carries nested
//! one-row tables (`country_gdp`, `us_trade_data`) and tagged row lists
//! (`country_sectors`, `country_insights`, `country_reactions`). Any field may
//! be missing or malformed; numbers become `None` rather than NaN, and a row
//! that cannot be read is dropped without failing the whole dataset.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{CountryRecord, Gdp, NationalReaction, PolicyGroup};
use crate::error::{DatasetError, RecordError};
use crate::geo::Geodata;

type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub records: Vec<CountryRecord>,
    pub dropped: Vec<DroppedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub index: usize,
    pub id: Option<String>,
    pub reason: RecordError,
}

/// Coerces a JSON value to a finite number.
///
/// Numbers and numeric strings pass; everything else, including empty
/// strings and booleans, is `None`.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

pub fn normalize_json(text: &str) -> Result<Normalized, DatasetError> {
    let raw: Value = serde_json::from_str(text)?;
    normalize_countries(&raw)
}

/// Normalizes against the bundled geodata table.
pub fn normalize_countries(raw: &Value) -> Result<Normalized, DatasetError> {
    normalize_with(raw, Geodata::shared())
}

pub fn normalize_with(raw: &Value, geodata: &Geodata) -> Result<Normalized, DatasetError> {
    let rows = raw.as_array().ok_or(DatasetError::NotAnArray {
        found: json_kind(raw),
    })?;

    let mut normalized = Normalized::default();
    let mut seen = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let outcome = normalize_row(row, geodata).and_then(|record| {
            if seen.insert(record.id.to_uppercase()) {
                Ok(record)
            } else {
                Err(RecordError::DuplicateId(record.id))
            }
        });

        match outcome {
            Ok(record) => normalized.records.push(record),
            Err(reason) => {
                let id = row
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                warn!(index, id = ?id, reason = %reason, "dropping country row");
                normalized.dropped.push(DroppedRow { index, id, reason });
            }
        }
    }

    debug!(
        kept = normalized.records.len(),
        dropped = normalized.dropped.len(),
        "normalized country dataset"
    );

    Ok(normalized)
}

fn normalize_row(row: &Value, geodata: &Geodata) -> Result<CountryRecord, RecordError> {
    let row = row.as_object().ok_or(RecordError::NotAnObject)?;

    let id = required_text(row, "id")?;
    let name = required_text(row, "name")?;

    let gdp_row = first_row(row, "country_gdp")?;
    let trade_row = first_row(row, "us_trade_data")?;

    let (region, policy_groups) = split_region(row, &id, geodata);

    Ok(CountryRecord {
        region,
        policy_groups,
        gdp: Gdp {
            actual_2023: number_field(gdp_row, &["gdp_2023", "actual_2023"]),
            estimate_2024: number_field(
                gdp_row,
                &["gdp_2024_estimate", "gdp_2024", "estimate_2024"],
            ),
        },
        us_trade_balance: number_field(trade_row, &["trade_balance", "us_trade_balance"]),
        share_of_us_imports: number_field(trade_row, &["share_of_us_imports"]),
        share_of_us_exports: number_field(trade_row, &["share_of_us_exports"]),
        reciprocal_tariff: number_field(trade_row, &["reciprocal_tariff"])
            .or_else(|| number_field(Some(row), &["reciprocal_tariff"])),
        tariffs_to_us: number_field(trade_row, &["tariffs_to_us", "tariff_to_us"])
            .or_else(|| number_field(Some(row), &["tariffs_to_us", "tariff_to_us"])),
        impacted_sectors: ordered_texts(
            list_rows(row, "country_sectors")?,
            &["sector_name", "sector", "name"],
        ),
        key_insights: ordered_texts(list_rows(row, "country_insights")?, &["insight", "text"]),
        national_reaction: reactions(list_rows(row, "country_reactions")?),
        id,
        name,
    })
}

fn required_text(row: &Row, field: &'static str) -> Result<String, RecordError> {
    row.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(RecordError::MissingField(field))
}

/// First element of a nested one-row table, `None` when absent or empty.
fn first_row<'a>(row: &'a Row, field: &'static str) -> Result<Option<&'a Row>, RecordError> {
    let shape_error = RecordError::UnexpectedShape {
        field,
        expected: "array of objects",
    };

    match row.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(Value::Array(items)) => match items.first() {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(inner)) => Ok(Some(inner)),
            Some(_) => Err(shape_error),
        },
        Some(_) => Err(shape_error),
    }
}

fn list_rows<'a>(row: &'a Row, field: &'static str) -> Result<&'a [Value], RecordError> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(RecordError::UnexpectedShape {
            field,
            expected: "array",
        }),
    }
}

fn number_field(row: Option<&Row>, keys: &[&str]) -> Option<f64> {
    let row = row?;
    keys.iter()
        .find_map(|key| row.get(*key).filter(|value| !value.is_null()))
        .and_then(|value| coerce_number(Some(value)))
}

fn text_of(value: &Value, keys: &[&str]) -> Option<String> {
    let text = match value {
        Value::String(text) => text.as_str(),
        Value::Object(row) => keys
            .iter()
            .find_map(|key| row.get(*key).and_then(Value::as_str))?,
        _ => return None,
    };

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn display_order(value: &Value) -> Option<f64> {
    let row = value.as_object()?;
    number_field(Some(row), &["display_order", "sort_order"])
}

/// Texts in input order, or by `display_order` when any row has one.
fn ordered_texts(rows: &[Value], keys: &[&str]) -> Vec<String> {
    let mut entries: Vec<(Option<f64>, String)> = rows
        .iter()
        .filter_map(|row| text_of(row, keys).map(|text| (display_order(row), text)))
        .collect();

    if entries.iter().any(|(order, _)| order.is_some()) {
        entries.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    entries.into_iter().map(|(_, text)| text).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ReactionKind {
    Retaliatory,
    DomesticSupport,
}

impl ReactionKind {
    fn parse(tag: &str) -> Option<Self> {
        let tag: String = tag
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match tag.as_str() {
            "retaliatory" | "retaliation" => Some(Self::Retaliatory),
            "domesticsupport" | "domestic" => Some(Self::DomesticSupport),
            _ => None,
        }
    }
}

const REACTION_TEXT_KEYS: [&str; 3] = ["reaction", "description", "text"];

fn reactions(rows: &[Value]) -> NationalReaction {
    let mut retaliatory = Vec::new();
    let mut domestic_support = Vec::new();

    for row in rows {
        let Some(fields) = row.as_object() else {
            continue;
        };

        let tag = ["reaction_type", "type", "category"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str));

        match tag.and_then(ReactionKind::parse) {
            Some(ReactionKind::Retaliatory) => retaliatory.push(row.clone()),
            Some(ReactionKind::DomesticSupport) => domestic_support.push(row.clone()),
            None if tag.is_none() => {
                // Untagged rows carry one column per reaction kind.
                retaliatory.extend(column_values(fields, "retaliatory"));
                domestic_support.extend(column_values(fields, "domestic_support"));
            }
            None => {}
        }
    }

    NationalReaction {
        retaliatory: ordered_texts(&retaliatory, &REACTION_TEXT_KEYS),
        domestic_support: ordered_texts(&domestic_support, &REACTION_TEXT_KEYS),
    }
}

fn column_values(fields: &Row, key: &str) -> Vec<Value> {
    match fields.get(key) {
        Some(Value::Array(items)) => items.clone(),
        Some(value @ Value::String(_)) => vec![value.clone()],
        _ => Vec::new(),
    }
}

/// Separates the overloaded raw `region` into a geographic region and
/// policy groupings.
fn split_region(row: &Row, id: &str, geodata: &Geodata) -> (Option<String>, Vec<PolicyGroup>) {
    let geo = geodata.lookup(id);
    let raw_region = row
        .get("region")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let mut g20 = geo.is_some_and(|country| country.g20);
    let region = match raw_region.map(|value| (value, g20_label(value))) {
        Some((_, Some(member))) => {
            g20 = member;
            geo.map(|country| country.continent.clone())
        }
        Some((value, None)) => Some(value.to_string()),
        None => geo.map(|country| country.continent.clone()),
    };

    if let Some(explicit) = ["g20", "is_g20"]
        .iter()
        .find_map(|key| row.get(*key).and_then(Value::as_bool))
    {
        g20 = explicit;
    }

    let groups = if g20 { vec![PolicyGroup::G20] } else { Vec::new() };
    (region, groups)
}

/// `Some(true)` for a G20 label, `Some(false)` for a non-G20 label.
fn g20_label(value: &str) -> Option<bool> {
    if PolicyGroup::parse(value) == Some(PolicyGroup::G20) {
        return Some(true);
    }
    let lowered = value.to_lowercase();
    let rest = lowered
        .strip_prefix("non")
        .map(|rest| rest.trim_start_matches(['-', ' ', '_']))?;
    (PolicyGroup::parse(rest) == Some(PolicyGroup::G20)).then_some(false)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(raw: &Value) -> Normalized {
        normalize_countries(raw).expect("array input")
    }

    #[test]
    fn canada_scenario() {
        let raw = json!([{
            "id": "CA",
            "name": "Canada",
            "country_gdp": [{"gdp_2023": "2107", "gdp_2024_estimate": null}],
            "us_trade_data": [{"trade_balance": -60801}]
        }]);

        let normalized = normalize(&raw);
        assert!(normalized.dropped.is_empty());

        let record = &normalized.records[0];
        assert_eq!(record.id, "CA");
        assert_eq!(record.name, "Canada");
        assert_eq!(record.gdp.actual_2023, Some(2107.0));
        assert_eq!(record.gdp.estimate_2024, None);
        assert_eq!(record.us_trade_balance, Some(-60801.0));
        assert_eq!(record.share_of_us_imports, None);
        assert_eq!(record.share_of_us_exports, None);
        assert_eq!(record.reciprocal_tariff, None);
        assert_eq!(record.tariffs_to_us, None);
        assert!(record.impacted_sectors.is_empty());
        assert!(record.key_insights.is_empty());
        assert_eq!(record.national_reaction, NationalReaction::default());
    }

    #[test]
    fn coerce_number_rejects_non_numeric_values() {
        assert_eq!(coerce_number(Some(&json!("12.5"))), Some(12.5));
        assert_eq!(coerce_number(Some(&json!(" 7 "))), Some(7.0));
        assert_eq!(coerce_number(Some(&json!(3))), Some(3.0));
        assert_eq!(coerce_number(Some(&json!("abc"))), None);
        assert_eq!(coerce_number(Some(&json!(""))), None);
        assert_eq!(coerce_number(Some(&json!("NaN"))), None);
        assert_eq!(coerce_number(Some(&json!("inf"))), None);
        assert_eq!(coerce_number(Some(&json!(true))), None);
        assert_eq!(coerce_number(Some(&json!(null))), None);
        assert_eq!(coerce_number(Some(&json!([1]))), None);
        assert_eq!(coerce_number(None), None);
    }

    #[test]
    fn rows_without_id_or_name_are_dropped() {
        let raw = json!([
            {"id": "MX", "name": "Mexico"},
            {"name": "Nowhere"},
            {"id": "ZZ"},
            {"id": "  ", "name": "Blank"},
            "not an object"
        ]);

        let normalized = normalize(&raw);
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].id, "MX");

        let reasons: Vec<_> = normalized.dropped.iter().map(|row| row.reason.clone()).collect();
        assert_eq!(
            reasons,
            [
                RecordError::MissingField("id"),
                RecordError::MissingField("name"),
                RecordError::MissingField("id"),
                RecordError::NotAnObject,
            ]
        );
    }

    #[test]
    fn malformed_nested_shape_drops_only_that_row() {
        let raw = json!([
            {"id": "JP", "name": "Japan", "country_sectors": 5},
            {"id": "KR", "name": "South Korea", "country_gdp": ["oops"]},
            {"id": "VN", "name": "Vietnam"}
        ]);

        let normalized = normalize(&raw);
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].id, "VN");
        assert_eq!(normalized.dropped.len(), 2);
        assert_eq!(normalized.dropped[0].id.as_deref(), Some("JP"));
    }

    #[test]
    fn duplicate_ids_keep_the_first_row() {
        let raw = json!([
            {"id": "CN", "name": "China"},
            {"id": "cn", "name": "China again"}
        ]);

        let normalized = normalize(&raw);
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].name, "China");
        assert_eq!(
            normalized.dropped[0].reason,
            RecordError::DuplicateId("cn".to_string())
        );
    }

    #[test]
    fn non_array_dataset_is_rejected() {
        let err = normalize_countries(&json!({"countries": []})).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnArray { found: "object" }));
    }

    #[test]
    fn sectors_and_insights_follow_display_order() {
        let raw = json!([{
            "id": "VN",
            "name": "Vietnam",
            "country_sectors": [
                {"sector_name": "Furniture", "display_order": 2},
                {"sector_name": "Electronics", "display_order": 1},
                {"sector_name": "   "}
            ],
            "country_insights": ["First", {"insight": "Second"}, 42]
        }]);

        let record = &normalize(&raw).records[0];
        assert_eq!(record.impacted_sectors, ["Electronics", "Furniture"]);
        assert_eq!(record.key_insights, ["First", "Second"]);
    }

    #[test]
    fn reactions_are_split_by_tag() {
        let raw = json!([{
            "id": "CN",
            "name": "China",
            "country_reactions": [
                {"reaction_type": "retaliatory", "reaction": "34% tariff on US goods"},
                {"reaction_type": "domestic_support", "reaction": "Stimulus for exporters"},
                {"type": "Retaliatory", "description": "Export controls on rare earths"},
                {"reaction_type": "unknown", "reaction": "ignored"},
                {"retaliatory": ["Entity list additions"], "domestic_support": "Tax rebates"}
            ]
        }]);

        let reaction = &normalize(&raw).records[0].national_reaction;
        assert_eq!(
            reaction.retaliatory,
            [
                "34% tariff on US goods",
                "Export controls on rare earths",
                "Entity list additions"
            ]
        );
        assert_eq!(reaction.domestic_support, ["Stimulus for exporters", "Tax rebates"]);
    }

    #[test]
    fn g20_region_becomes_policy_group_with_geographic_region() {
        let raw = json!([
            {"id": "JP", "name": "Japan", "region": "G20"},
            {"id": "VN", "name": "Vietnam", "region": "Asia"},
            {"id": "DE", "name": "Germany", "region": "Europe"},
            {"id": "XX", "name": "Atlantis", "region": "g20"},
            {"id": "CA", "name": "Canada", "region": "North America", "g20": false}
        ]);

        let records = normalize(&raw).records;
        assert_eq!(records[0].region.as_deref(), Some("Asia"));
        assert!(records[0].is_g20());
        assert_eq!(records[1].region.as_deref(), Some("Asia"));
        assert!(!records[1].is_g20());
        assert!(records[2].is_g20());
        assert_eq!(records[3].region, None);
        assert!(records[3].is_g20());
        assert!(!records[4].is_g20());
    }

    #[test]
    fn non_g20_region_label_is_not_a_geographic_region() {
        let raw = json!([
            {"id": "VN", "name": "Vietnam", "region": "Non-G20"},
            {"id": "BR", "name": "Brazil", "region": "non-g20"},
            {"id": "XX", "name": "Atlantis", "region": "Non G20"},
            {"id": "IN", "name": "India", "region": "Non-G20", "is_g20": true}
        ]);

        let records = normalize(&raw).records;
        assert_eq!(records[0].region.as_deref(), Some("Asia"));
        assert!(!records[0].is_g20());
        assert_eq!(records[1].region.as_deref(), Some("South America"));
        assert!(!records[1].is_g20());
        assert_eq!(records[2].region, None);
        assert!(records[3].is_g20());
        assert_eq!(crate::domain::known_regions(&records), ["Asia", "South America"]);
    }

    #[test]
    fn tariffs_fall_back_to_top_level_fields() {
        let raw = json!([{
            "id": "VN",
            "name": "Vietnam",
            "reciprocal_tariff": "46",
            "us_trade_data": [{"tariffs_to_us": 90, "share_of_us_imports": "4.2"}]
        }]);

        let record = &normalize(&raw).records[0];
        assert_eq!(record.reciprocal_tariff, Some(46.0));
        assert_eq!(record.tariffs_to_us, Some(90.0));
        assert_eq!(record.share_of_us_imports, Some(4.2));
    }

    #[test]
    fn normalize_json_reports_invalid_json() {
        assert!(matches!(normalize_json("[{"), Err(DatasetError::Json(_))));
    }
}
