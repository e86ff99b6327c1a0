// Entity search tool across suites, resources, and staff

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    fetch_analytics, json_schema_boolean, json_schema_object, json_schema_string, parse_args,
    raw_json_block, scalar_or, text_or, with_query, Tool,
};
use anyhow::{bail, Result};
use freispace_client::FreispaceClient;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

const ENTITY_SEARCH_DESCRIPTION: &str = "\
Use this tool to search for suites, resources, and staff members by name. This tool provides comprehensive entity search functionality across all organizational assets, including:

- Suite search results (rooms, studios, workspaces)
- Resource search results (equipment, licenses, tools)
- Staff search results (employees, team members)
- Availability filtering options (available only, booked only)

This is useful when you need to:
- Find available suites, resources, or staff for new bookings
- Search for specific entities by name or partial name
- Check availability status of organizational assets
- Locate staff members, equipment, or workspaces
- Generate resource availability reports
- Plan resource allocation and scheduling

The tool accepts a required name parameter and optional availability filters to narrow down results based on current booking status.
";

/// Tool searching suites, resources, and staff by name.
pub struct EntitySearchTool {
    client: Arc<FreispaceClient>,
}

impl EntitySearchTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct EntitySearchArgs {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    available_only: Option<bool>,
    #[serde(default)]
    booked_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct EntitySearchData {
    #[serde(default)]
    suites: Option<EntityCategory>,
    #[serde(default)]
    resources: Option<EntityCategory>,
    #[serde(default)]
    staffs: Option<EntityCategory>,
}

#[derive(Debug, Deserialize)]
struct EntityCategory {
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    items: Option<Vec<EntityItem>>,
}

impl EntityCategory {
    fn amount(&self) -> f64 {
        self.amount
            .unwrap_or_else(|| self.items.as_ref().map(|i| i.len()).unwrap_or(0) as f64)
    }
}

#[derive(Debug, Deserialize)]
struct EntityItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    number: serde_json::Value,
    #[serde(default)]
    title: Option<String>,
}

#[async_trait::async_trait]
impl Tool for EntitySearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_entities_by_name".to_string(),
            description: ENTITY_SEARCH_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string(
                        "The name or partial name to search for across suites, resources, and staff"
                    ),
                    "available_only": json_schema_boolean(
                        "Filter to show only entities that are currently available (not booked)"
                    ),
                    "booked_only": json_schema_boolean(
                        "Filter to show only entities that are currently booked (not available)"
                    )
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: EntitySearchArgs = parse_args(arguments)?;
        let name = match args.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => bail!("Search name is required"),
        };
        let available_only = args.available_only.unwrap_or(false);
        let booked_only = args.booked_only.unwrap_or(false);

        let mut pairs: Vec<(&str, &str)> = vec![("name", &name)];
        // Boolean flags are only sent when true.
        if available_only {
            pairs.push(("available-only", "true"));
        }
        if booked_only {
            pairs.push(("booked-only", "true"));
        }
        let endpoint = with_query("/tools/analytics/get-entities-by-name", &pairs);
        let data = fetch_analytics(&self.client, &endpoint).await?;

        Ok(CallToolResult::text(format_entity_search(
            &name,
            available_only,
            booked_only,
            &data,
        )))
    }
}

fn write_entity_section(
    text: &mut String,
    heading: &str,
    category: &EntityCategory,
    with_title: bool,
) -> f64 {
    let Some(items) = category.items.as_ref().filter(|i| !i.is_empty()) else {
        return 0.0;
    };

    let _ = writeln!(text, "## {} ({})\n", heading, category.amount());
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(text, "{}. **{}**", index + 1, text_or(&item.name, "N/A"));
        let _ = writeln!(text, "   - ID: {}", scalar_or(&item.id, "N/A"));
        if with_title {
            let _ = writeln!(text, "   - Title: {}", text_or(&item.title, "N/A"));
        }
        let number = scalar_or(&item.number, "");
        if !number.is_empty() {
            let _ = writeln!(text, "   - Number: {}", number);
        }
        text.push('\n');
    }

    category.amount()
}

fn format_entity_search(
    name: &str,
    available_only: bool,
    booked_only: bool,
    data: &serde_json::Value,
) -> String {
    let mut text = format!("# Entity Search Results for \"{}\"\n\n", name);

    if available_only || booked_only {
        text.push_str("**Search Filters Applied:**\n");
        if available_only {
            text.push_str("- Available Only: Yes (showing unbooked entities)\n");
        }
        if booked_only {
            text.push_str("- Booked Only: Yes (showing booked entities)\n");
        }
        text.push('\n');
    }

    let Ok(parsed) = serde_json::from_value::<EntitySearchData>(data.clone()) else {
        text.push_str("**Raw Data:**\n\n");
        text.push_str(&raw_json_block(data));
        return text;
    };

    let mut total_entities = 0.0;

    if let Some(suites) = &parsed.suites {
        total_entities += write_entity_section(&mut text, "Suites", suites, false);
    }
    if let Some(resources) = &parsed.resources {
        total_entities += write_entity_section(&mut text, "Resources", resources, false);
    }
    if let Some(staffs) = &parsed.staffs {
        total_entities += write_entity_section(&mut text, "Staff Members", staffs, true);
    }

    if total_entities > 0.0 {
        text.push_str("**Search Summary:**\n");
        let _ = writeln!(text, "- Total Entities Found: {}", total_entities);
        if let Some(suites) = &parsed.suites {
            let _ = writeln!(text, "- Suites: {}", suites.amount());
        }
        if let Some(resources) = &parsed.resources {
            let _ = writeln!(text, "- Resources: {}", resources.amount());
        }
        if let Some(staffs) = &parsed.staffs {
            let _ = writeln!(text, "- Staff Members: {}", staffs.amount());
        }
    } else {
        let _ = writeln!(text, "**No entities found matching \"{}\"**", name);
        if available_only || booked_only {
            text.push_str("Try removing the availability filters to see all matching entities.\n");
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> Arc<FreispaceClient> {
        let config = freispace_client::ClientConfig::new(url::Url::parse(base_url).unwrap());
        Arc::new(FreispaceClient::new(config).unwrap())
    }

    #[test]
    fn test_sections_and_summary() {
        let data = json!({
            "suites": {"amount": 1, "items": [{"name": "Studio A", "id": "su1", "number": "101"}]},
            "resources": {"amount": 2, "items": [
                {"name": "Camera", "id": "r1"},
                {"name": "Tripod", "id": "r2"}
            ]},
            "staffs": {"amount": 1, "items": [{"name": "Alice", "id": "s1", "title": "Editor"}]}
        });
        let text = format_entity_search("a", false, false, &data);

        assert!(text.starts_with("# Entity Search Results for \"a\"\n\n"));
        assert!(text.contains("## Suites (1)\n\n1. **Studio A**\n   - ID: su1\n   - Number: 101"));
        assert!(text.contains("## Resources (2)"));
        assert!(text.contains("## Staff Members (1)\n\n1. **Alice**\n   - ID: s1\n   - Title: Editor"));
        assert!(text.contains("**Search Summary:**\n- Total Entities Found: 4\n- Suites: 1\n- Resources: 2\n- Staff Members: 1\n"));
        // No filter block when no filters were applied.
        assert!(!text.contains("**Search Filters Applied:**"));
    }

    #[test]
    fn test_empty_categories_render_no_results_message() {
        let data = json!({
            "suites": {"amount": 0, "items": []},
            "resources": {"amount": 0, "items": []},
            "staffs": {"amount": 0, "items": []}
        });
        let text = format_entity_search("ghost", false, false, &data);

        assert!(text.contains("**No entities found matching \"ghost\"**"));
        assert!(!text.contains("## Suites"));
        assert!(!text.contains("**Search Summary:**"));
    }

    #[test]
    fn test_filter_hint_when_filters_active() {
        let data = json!({"suites": {"amount": 0, "items": []}});
        let text = format_entity_search("ghost", true, false, &data);

        assert!(text.contains("**Search Filters Applied:**\n- Available Only: Yes (showing unbooked entities)\n"));
        assert!(text.contains("Try removing the availability filters to see all matching entities.\n"));
    }

    #[test]
    fn test_both_filters_echoed() {
        let data = json!({});
        let text = format_entity_search("x", true, true, &data);
        assert!(text.contains("- Available Only: Yes (showing unbooked entities)"));
        assert!(text.contains("- Booked Only: Yes (showing booked entities)"));
    }

    #[tokio::test]
    async fn test_search_name_required() {
        let tool = EntitySearchTool::new(test_client("http://127.0.0.1:1"));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Search name is required");
    }

    #[tokio::test]
    async fn test_false_flags_are_omitted_from_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/analytics/get-entities-by-name"))
            .and(query_param("name", "Studio"))
            .and(query_param("available-only", "true"))
            .and(query_param_is_missing("booked-only"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = EntitySearchTool::new(test_client(&server.uri()));
        let result = tool
            .execute(json!({"name": "Studio", "available_only": true, "booked_only": false}))
            .await
            .unwrap();
        assert!(result.is_error.is_none());
    }
}
