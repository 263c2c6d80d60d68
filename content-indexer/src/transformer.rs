//! Field transformers applied to a single value before it is written to a
//! document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};

/// Output format of date-time values.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Output format of date-only values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mapping format of time-only fields.
pub const TIME_FORMAT: &str = "HH:mm:ss";

/// Date-time layouts accepted on input, tried in order.
const DATE_TIME_INPUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y%m%d%H%M%S",
];

/// Date-only layouts accepted on input, tried in order.
const DATE_INPUTS: [&str; 4] = ["%Y%m%d", "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

lazy_static! {
    static ref SCRIPT_STYLE: Regex =
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").unwrap();
    static ref BLOCK_TAG: Regex =
        Regex::new(r"(?i)<\s*(br|/p|/div|/li|/h[1-6]|/tr)\b[^>]*>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref NUMERIC_ENTITY: Regex = Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A pure value converter attached to a field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTransformer {
    /// Normalize dates to an ISO-8601 layout the search engine parses.
    Date,
    /// Strip markup down to plain searchable text.
    Html,
    /// Convert `{lat, lng}` map pins to `{lat, lon}` geo points.
    GeoPoint,
}

impl FieldTransformer {
    /// Transform a field value. Arrays are transformed element-wise.
    pub fn transform(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.transform(item)).collect())
            }
            _ => match self {
                FieldTransformer::Date => normalize_date(value),
                FieldTransformer::Html => strip_html(value),
                FieldTransformer::GeoPoint => geo_point(value),
            },
        }
    }
}

/// Normalize a date value.
///
/// Unparseable and empty strings become `null` so that one bad value does not
/// get the whole document rejected by the date mapping.
fn normalize_date(value: &Value) -> Value {
    let raw = match value {
        Value::String(raw) => raw.trim(),
        Value::Null => return Value::Null,
        // Epoch seconds
        Value::Number(n) => {
            return n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| json!(dt.naive_utc().format(DATE_TIME_FORMAT).to_string()))
                .unwrap_or(Value::Null)
        }
        _ => return Value::Null,
    };

    if raw.is_empty() {
        return Value::Null;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return json!(dt.naive_utc().format(DATE_TIME_FORMAT).to_string());
    }

    for layout in DATE_TIME_INPUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return json!(dt.format(DATE_TIME_FORMAT).to_string());
        }
    }

    for layout in DATE_INPUTS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, layout) {
            return json!(date.format(DATE_FORMAT).to_string());
        }
    }

    // Time pickers store bare times
    if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        return json!(time.format("%H:%M:%S").to_string());
    }

    Value::Null
}

fn strip_html(value: &Value) -> Value {
    let Value::String(raw) = value else {
        return value.clone();
    };

    let text = SCRIPT_STYLE.replace_all(raw, " ");
    let text = BLOCK_TAG.replace_all(&text, " ");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = WHITESPACE.replace_all(&text, " ");

    Value::String(text.trim().to_string())
}

fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&hellip;", "...")
        .replace("&amp;", "&")
}

fn geo_point(value: &Value) -> Value {
    let Value::Object(pin) = value else {
        return Value::Null;
    };

    let lat = pin.get("lat").and_then(coordinate);
    let lon = pin
        .get("lon")
        .or_else(|| pin.get("lng"))
        .and_then(coordinate);

    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let mut point = Map::new();
            point.insert("lat".to_string(), json!(lat));
            point.insert("lon".to_string(), json!(lon));
            Value::Object(point)
        }
        _ => Value::Null,
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_formats() {
        let date = FieldTransformer::Date;
        assert_eq!(date.transform(&json!("20240131")), json!("2024-01-31"));
        assert_eq!(date.transform(&json!("2024-01-31")), json!("2024-01-31"));
        assert_eq!(
            date.transform(&json!("2024-01-31 09:30:00")),
            json!("2024-01-31T09:30:00")
        );
        assert_eq!(
            date.transform(&json!("2024-01-31T09:30:00+02:00")),
            json!("2024-01-31T07:30:00")
        );
    }

    #[test]
    fn test_invalid_date_becomes_null() {
        let date = FieldTransformer::Date;
        assert_eq!(date.transform(&json!("next tuesday")), Value::Null);
        assert_eq!(date.transform(&json!("")), Value::Null);
        assert_eq!(date.transform(&json!(true)), Value::Null);
    }

    #[test]
    fn test_strip_html() {
        let html = FieldTransformer::Html;
        let value = json!(
            "<p>Fish &amp; chips</p><script>alert(1)</script><p>at&nbsp;<b>noon</b>&#33;</p>"
        );
        assert_eq!(html.transform(&value), json!("Fish & chips at noon!"));
    }

    #[test]
    fn test_html_leaves_non_strings() {
        assert_eq!(FieldTransformer::Html.transform(&json!(3)), json!(3));
    }

    #[test]
    fn test_arrays_are_transformed_element_wise() {
        let value = json!(["<i>a</i>", "<i>b</i>"]);
        assert_eq!(FieldTransformer::Html.transform(&value), json!(["a", "b"]));
    }

    #[test]
    fn test_geo_point() {
        let pin = json!({ "address": "Main St", "lat": "52.37", "lng": 4.89 });
        assert_eq!(
            FieldTransformer::GeoPoint.transform(&pin),
            json!({ "lat": 52.37, "lon": 4.89 })
        );
        assert_eq!(
            FieldTransformer::GeoPoint.transform(&json!({ "address": "nowhere" })),
            Value::Null
        );
    }
}
