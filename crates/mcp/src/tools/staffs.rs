// Staff directory and collaboration query tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    fetch_analytics, json_schema_object, json_schema_string, num_or_na, parse_args, plural,
    raw_json_block, scalar_or, text_or, with_query, Tool,
};
use anyhow::{bail, Result};
use freispace_client::FreispaceClient;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

const STAFFS_QUERY_DESCRIPTION: &str = "\
Use this tool to retrieve a comprehensive list of all staff members in the organization. This tool provides detailed information about the entire workforce, including:

- Complete staff directory with all employees
- Individual staff member details (name, title, role, number)
- Organizational structure and role distribution
- Contact information and identifiers

This is useful when you need to:
- Get an overview of all staff members
- Find specific employees by browsing the complete list
- Understand the organizational structure and roles
- Get staff numbers and titles for reference
- Answer questions about who works in the company

Use this tool when users ask about:
- \"/staff\" command or similar requests
- \"Who are the staff members?\" or \"List all employees\"
- \"What roles do we have in the company?\"
- General inquiries about the workforce or team members
- Looking for specific people without knowing their exact names
";

const WORKED_TOGETHER_DESCRIPTION: &str = "\
Use this tool to find detailed collaboration information for a specific staff member. This tool provides comprehensive data about who a staff member has worked with, including:

- Target staff member details (name, title, role)
- Collaboration summary (total collaborations, unique colleagues, bookings, projects)
- Detailed list of colleagues they've worked with
- Specific bookings/assignments where they collaborated
- Projects they've been involved in together

This is useful when you need to:
- Analyze working relationships and team dynamics
- Find out who a specific person has collaborated with
- Get insights into project participation and booking history
- Understand network connections within the organization

Provide the staff member's name as input to get their complete collaboration profile.
";

/// Tool listing the complete staff directory with a role distribution.
pub struct StaffsQueryTool {
    client: Arc<FreispaceClient>,
}

impl StaffsQueryTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct StaffEntry {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    id: serde_json::Value,
}

#[async_trait::async_trait]
impl Tool for StaffsQueryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "staffs_query".to_string(),
            description: STAFFS_QUERY_DESCRIPTION.to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let data = fetch_analytics(&self.client, "/tools/analytics/get-staffs").await?;
        Ok(CallToolResult::text(format_staff_directory(&data)))
    }
}

fn format_staff_directory(data: &serde_json::Value) -> String {
    let mut text = String::from("# Staff Directory\n\n");

    let staffs: Option<Vec<StaffEntry>> = serde_json::from_value(data.clone()).ok();

    match staffs {
        Some(staffs) if !staffs.is_empty() => {
            let _ = writeln!(text, "**Total Staff Members: {}**\n", staffs.len());
            text.push_str("**Staff List:**\n\n");

            for (index, staff) in staffs.iter().enumerate() {
                let _ = writeln!(
                    text,
                    "{}. **{}**",
                    index + 1,
                    text_or(&staff.display_name, "Unknown")
                );
                let _ = writeln!(text, "   - Title: {}", text_or(&staff.title, "N/A"));
                if let Some(number) = &staff.number {
                    if !number.trim().is_empty() {
                        let _ = writeln!(text, "   - Number: {}", number);
                    }
                }
                let _ = writeln!(text, "   - ID: {}", scalar_or(&staff.id, "N/A"));
                text.push('\n');
            }

            // Count by title, first-seen order, then a stable sort keeps ties
            // in that order.
            let mut title_counts: Vec<(String, usize)> = Vec::new();
            for staff in &staffs {
                let title = text_or(&staff.title, "No Title").to_string();
                match title_counts.iter_mut().find(|(t, _)| *t == title) {
                    Some((_, count)) => *count += 1,
                    None => title_counts.push((title, 1)),
                }
            }
            title_counts.sort_by(|a, b| b.1.cmp(&a.1));

            text.push_str("**Role Distribution:**\n\n");
            for (index, (title, count)) in title_counts.iter().enumerate() {
                let _ = writeln!(
                    text,
                    "{}. {}: {} staff member{}",
                    index + 1,
                    title,
                    count,
                    plural(*count as f64)
                );
            }
        }
        _ => {
            text.push_str("**No staff members found or unexpected data format.**\n\n");
            text.push_str("**Raw Data:**\n\n");
            text.push_str(&raw_json_block(data));
        }
    }

    text
}

/// Tool reporting who a staff member has collaborated with.
pub struct StaffsWorkedTogetherTool {
    client: Arc<FreispaceClient>,
}

impl StaffsWorkedTogetherTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct WorkedTogetherArgs {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CollaborationData {
    #[serde(default)]
    target_staff: Option<StaffDetails>,
    #[serde(default)]
    summary: Option<CollaborationSummary>,
    #[serde(default)]
    colleagues: Option<Vec<Colleague>>,
}

#[derive(Debug, Deserialize)]
struct StaffDetails {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CollaborationSummary {
    #[serde(default)]
    total_collaborations: Option<f64>,
    #[serde(default)]
    unique_colleagues: Option<f64>,
    #[serde(default)]
    bookings_involved: Option<f64>,
    #[serde(default)]
    projects_involved: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Colleague {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    bookings: Option<Vec<BookingRef>>,
    #[serde(default)]
    projects: Option<Vec<ProjectRef>>,
}

#[derive(Debug, Deserialize)]
struct BookingRef {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    duration: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: serde_json::Value,
}

#[async_trait::async_trait]
impl Tool for StaffsWorkedTogetherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "staffs_worked_together_query".to_string(),
            description: WORKED_TOGETHER_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string(
                        "The name of the staff member to query collaboration data for"
                    )
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: WorkedTogetherArgs = parse_args(arguments)?;
        let name = match args.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => bail!("Staff name is required"),
        };

        let endpoint = with_query(
            "/tools/analytics/get-staffs-worked-together",
            &[("name", name)],
        );
        let data = fetch_analytics(&self.client, &endpoint).await?;

        Ok(CallToolResult::text(format_collaboration_report(
            name, &data,
        )))
    }
}

fn format_collaboration_report(name: &str, data: &serde_json::Value) -> String {
    let parsed: Option<CollaborationData> = serde_json::from_value(data.clone()).ok();

    let Some(parsed) = parsed else {
        let mut text = format!("# Collaboration Report for {}\n\n", name);
        text.push_str("**Raw Data:**\n\n");
        text.push_str(&raw_json_block(data));
        return text;
    };

    let display_name = parsed
        .target_staff
        .as_ref()
        .and_then(|s| s.display_name.as_deref())
        .filter(|s| !s.is_empty())
        .unwrap_or(name);
    let mut text = format!("# Collaboration Report for {}\n\n", display_name);

    if let Some(staff) = &parsed.target_staff {
        text.push_str("**Staff Details:**\n");
        let _ = writeln!(text, "- Name: {}", text_or(&staff.display_name, "N/A"));
        let _ = writeln!(text, "- Title: {}", text_or(&staff.title, "N/A"));
        let _ = writeln!(text, "- Number: {}\n", text_or(&staff.number, "N/A"));
    }

    if let Some(summary) = &parsed.summary {
        text.push_str("**Collaboration Summary:**\n");
        let _ = writeln!(
            text,
            "- Total Collaborations: {}",
            num_or_na(&summary.total_collaborations)
        );
        let _ = writeln!(
            text,
            "- Unique Colleagues: {}",
            num_or_na(&summary.unique_colleagues)
        );
        let _ = writeln!(
            text,
            "- Bookings Involved: {}",
            num_or_na(&summary.bookings_involved)
        );
        let _ = writeln!(
            text,
            "- Projects Involved: {}\n",
            num_or_na(&summary.projects_involved)
        );
    }

    if let Some(colleagues) = &parsed.colleagues {
        if !colleagues.is_empty() {
            text.push_str("**Colleagues Worked With:**\n");
            for (index, colleague) in colleagues.iter().enumerate() {
                let _ = write!(
                    text,
                    "\n{}. **{}** ({})\n",
                    index + 1,
                    text_or(&colleague.display_name, "N/A"),
                    text_or(&colleague.title, "N/A")
                );

                if let Some(bookings) = &colleague.bookings {
                    if !bookings.is_empty() {
                        let _ = writeln!(text, "   Shared Bookings ({}):", bookings.len());
                        for booking in bookings {
                            let _ = writeln!(
                                text,
                                "   - {} ({})",
                                text_or(&booking.name, "N/A"),
                                scalar_or(&booking.duration, "N/A")
                            );
                        }
                    }
                }

                if let Some(projects) = &colleague.projects {
                    if !projects.is_empty() {
                        let _ = writeln!(text, "   Shared Projects ({}):", projects.len());
                        for project in projects {
                            let number = scalar_or(&project.number, "");
                            let suffix = if number.is_empty() {
                                String::new()
                            } else {
                                format!(" (#{})", number)
                            };
                            let _ = writeln!(
                                text,
                                "   - {}{}",
                                text_or(&project.name, "N/A"),
                                suffix
                            );
                        }
                    }
                }
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> Arc<FreispaceClient> {
        let config = freispace_client::ClientConfig::new(url::Url::parse(base_url).unwrap());
        Arc::new(FreispaceClient::new(config).unwrap())
    }

    #[test]
    fn test_directory_lists_staff_and_role_distribution() {
        let data = json!([
            {"display_name": "Alice", "title": "Editor", "number": "42", "id": "s1"},
            {"display_name": "Bob", "title": "Editor", "id": "s2"},
            {"display_name": "Carol", "title": "Producer", "id": "s3"}
        ]);
        let text = format_staff_directory(&data);

        assert!(text.starts_with("# Staff Directory\n\n"));
        assert!(text.contains("**Total Staff Members: 3**"));
        assert!(text.contains("1. **Alice**\n   - Title: Editor\n   - Number: 42\n   - ID: s1"));
        // No number line for Bob.
        assert!(text.contains("2. **Bob**\n   - Title: Editor\n   - ID: s2"));
        // Distribution sorted descending by count, with pluralization.
        assert!(text.contains("**Role Distribution:**\n\n1. Editor: 2 staff members\n2. Producer: 1 staff member\n"));
    }

    #[test]
    fn test_directory_missing_fields_fall_back() {
        let data = json!([{"number": "  "}]);
        let text = format_staff_directory(&data);
        assert!(text.contains("1. **Unknown**\n   - Title: N/A\n   - ID: N/A"));
        // Blank number is suppressed entirely.
        assert!(!text.contains("- Number:"));
        assert!(text.contains("1. No Title: 1 staff member\n"));
    }

    #[test]
    fn test_directory_empty_renders_no_results_with_raw_data() {
        let data = json!([]);
        let text = format_staff_directory(&data);
        assert!(text.contains("**No staff members found or unexpected data format.**"));
        assert!(text.contains("**Raw Data:**"));
        assert!(text.contains("```json\n[]\n```"));
    }

    #[test]
    fn test_directory_unrecognized_shape_embeds_raw_json() {
        let data = json!({"unexpected": true});
        let text = format_staff_directory(&data);
        assert!(text.contains("**No staff members found or unexpected data format.**"));
        assert!(text.contains("\"unexpected\": true"));
    }

    #[test]
    fn test_directory_formatting_is_deterministic() {
        let data = json!([{"display_name": "Alice", "title": "Editor", "id": "s1"}]);
        assert_eq!(format_staff_directory(&data), format_staff_directory(&data));
    }

    #[test]
    fn test_collaboration_report_sections() {
        let data = json!({
            "target_staff": {"display_name": "Alice", "title": "Editor", "number": "42"},
            "summary": {
                "total_collaborations": 7,
                "unique_colleagues": 3,
                "bookings_involved": 5,
                "projects_involved": 2
            },
            "colleagues": [
                {
                    "display_name": "Bob",
                    "title": "Producer",
                    "bookings": [{"name": "Edit Session", "duration": "2h"}],
                    "projects": [{"name": "Launch Film", "number": "P-7"}]
                }
            ]
        });
        let text = format_collaboration_report("Alice", &data);

        assert!(text.starts_with("# Collaboration Report for Alice\n\n"));
        assert!(text.contains("- Total Collaborations: 7"));
        assert!(text.contains("- Unique Colleagues: 3"));
        assert!(text.contains("1. **Bob** (Producer)"));
        assert!(text.contains("   Shared Bookings (1):\n   - Edit Session (2h)"));
        assert!(text.contains("   Shared Projects (1):\n   - Launch Film (#P-7)"));
    }

    #[test]
    fn test_collaboration_report_falls_back_to_query_name() {
        let data = json!({"summary": {"total_collaborations": 0}});
        let text = format_collaboration_report("Dana", &data);
        assert!(text.starts_with("# Collaboration Report for Dana\n\n"));
        assert!(!text.contains("**Staff Details:**"));
    }

    #[tokio::test]
    async fn test_worked_together_requires_name() {
        // Validation fails before any HTTP call; the base URL is never hit.
        let tool = StaffsWorkedTogetherTool::new(test_client("http://127.0.0.1:1"));

        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Staff name is required");

        let err = tool.execute(json!({"name": ""})).await.unwrap_err();
        assert_eq!(err.to_string(), "Staff name is required");

        let err = tool.execute(serde_json::Value::Null).await.unwrap_err();
        assert_eq!(err.to_string(), "Staff name is required");
    }

    #[tokio::test]
    async fn test_worked_together_queries_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/analytics/get-staffs-worked-together"))
            .and(query_param("name", "Alice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"target_staff": {"display_name": "Alice"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tool = StaffsWorkedTogetherTool::new(test_client(&server.uri()));
        let result = tool.execute(json!({"name": "Alice"})).await.unwrap();
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_non_200_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/analytics/get-staffs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let tool = StaffsQueryTool::new(test_client(&server.uri()));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Unexpected status code: 201");
    }

    #[tokio::test]
    async fn test_null_payload_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/analytics/get-staffs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .mount(&server)
            .await;

        let tool = StaffsQueryTool::new(test_client(&server.uri()));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "No data received from the API");
    }

    #[tokio::test]
    async fn test_falsy_scalar_payload_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/analytics/get-staffs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
            .mount(&server)
            .await;

        let tool = StaffsQueryTool::new(test_client(&server.uri()));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "No data received from the API");
    }
}
