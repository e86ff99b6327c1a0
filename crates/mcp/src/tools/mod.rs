pub mod entities;
pub mod holidays;
pub mod projects;
pub mod staffs;
mod registry;

pub use entities::EntitySearchTool;
pub use holidays::{HolidaysLeftTool, NextHolidaysTool};
pub use projects::{ProjectStatusTool, ProjectTeamTool, StaffProjectsTool};
pub use staffs::{StaffsQueryTool, StaffsWorkedTogetherTool};
pub use registry::{
    json_schema_boolean, json_schema_number, json_schema_object, json_schema_string, Tool,
    ToolRegistry,
};

use anyhow::{bail, Result};
use freispace_client::FreispaceClient;

/// GET an analytics endpoint and apply the shared response checks: an empty
/// payload (null, false, zero, or an empty string) means no data, and
/// anything other than exactly 200 is a failure (201/204 included).
pub(crate) async fn fetch_analytics(
    client: &FreispaceClient,
    endpoint: &str,
) -> Result<serde_json::Value> {
    let response = client.get(endpoint).await?;

    if is_empty_payload(&response.data) {
        bail!("No data received from the API");
    }

    if response.status != 200 {
        bail!("Unexpected status code: {}", response.status);
    }

    Ok(response.data)
}

/// Scalar payloads that carry no data. Empty arrays and objects still count
/// as data; tools render their own "no results" messages for those.
fn is_empty_payload(data: &serde_json::Value) -> bool {
    match data {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Append query pairs to an endpoint path.
pub(crate) fn with_query(endpoint: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return endpoint.to_string();
    }
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{}?{}", endpoint, query)
}

/// Deserialize tool arguments. A null/absent argument object reads as empty
/// so tools with only optional arguments accept bare invocations.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(arguments: serde_json::Value) -> Result<T> {
    use anyhow::Context;
    let arguments = if arguments.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).context("Invalid tool arguments")
}

/// A scalar payload field rendered as text: strings bare, numbers as-is,
/// anything else (or an empty string) the fallback.
pub(crate) fn scalar_or(value: &serde_json::Value, fallback: &str) -> String {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => fallback.to_string(),
    }
}

/// A string field rendered with a fallback when absent or empty.
pub(crate) fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}

/// A numeric field rendered with "N/A" when absent.
pub(crate) fn num_or_na(value: &Option<f64>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "N/A".to_string(),
    }
}

/// Parse a backend date field, either a plain `YYYY-MM-DD` or an RFC 3339
/// timestamp. Unparseable values read as absent.
pub(crate) fn parse_day(value: &str) -> Option<chrono::NaiveDate> {
    use chrono::{DateTime, NaiveDate};
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Pretty-printed raw JSON embedded as a fenced code block. Used when the
/// payload exists but is not a recognized shape.
pub(crate) fn raw_json_block(value: &serde_json::Value) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    format!("```json\n{}\n```\n", pretty)
}

/// "s" when a count reads as plural.
pub(crate) fn plural(count: f64) -> &'static str {
    if count == 1.0 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_payloads_cover_all_falsy_scalars() {
        assert!(is_empty_payload(&json!(null)));
        assert!(is_empty_payload(&json!(false)));
        assert!(is_empty_payload(&json!(0)));
        assert!(is_empty_payload(&json!(0.0)));
        assert!(is_empty_payload(&json!("")));

        assert!(!is_empty_payload(&json!(true)));
        assert!(!is_empty_payload(&json!(1)));
        assert!(!is_empty_payload(&json!("x")));
        assert!(!is_empty_payload(&json!([])));
        assert!(!is_empty_payload(&json!({})));
    }

    #[test]
    fn test_with_query_encodes_values() {
        let endpoint = with_query("/tools/analytics/get-staffs-worked-together", &[("name", "Jane Doe")]);
        assert_eq!(
            endpoint,
            "/tools/analytics/get-staffs-worked-together?name=Jane+Doe"
        );
    }

    #[test]
    fn test_with_query_empty_pairs_leaves_endpoint_alone() {
        assert_eq!(
            with_query("/tools/analytics/get-staffs", &[]),
            "/tools/analytics/get-staffs"
        );
    }

    #[test]
    fn test_text_or_treats_empty_as_absent() {
        assert_eq!(text_or(&Some("x".to_string()), "N/A"), "x");
        assert_eq!(text_or(&Some(String::new()), "N/A"), "N/A");
        assert_eq!(text_or(&None, "N/A"), "N/A");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1.0), "");
        assert_eq!(plural(0.0), "s");
        assert_eq!(plural(2.0), "s");
    }
}
