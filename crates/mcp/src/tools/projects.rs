// Project analytics query tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    fetch_analytics, json_schema_object, json_schema_string, num_or_na, parse_args, parse_day,
    plural, raw_json_block, scalar_or, text_or, with_query, Tool,
};
use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use freispace_client::FreispaceClient;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

const PROJECT_STATUS_DESCRIPTION: &str = "\
Use this tool to retrieve comprehensive project status analytics and statistics. This tool provides detailed information about a specific project's performance and booking status, including:

- Project details (name, number, byline, description)
- Historical booking statistics (past bookings with status breakdown)
- Future booking projections (upcoming bookings with status distribution)
- Percentage-based analysis of project activity

This is useful when you need to:
- Analyze project performance and activity levels
- Understand booking patterns and project status distribution
- Get insights into project workload and resource allocation
- Track project progress through booking status analysis
- Generate project reports and status summaries

Provide the project name as input to get comprehensive project analytics and status information.
";

const STAFF_PROJECTS_DESCRIPTION: &str = "\
Use this tool to retrieve a comprehensive list of all projects assigned to a specific staff member. This tool provides detailed information about project assignments, including:

- Complete project details (name, number, ID)
- Project timeline information (start date, end date, duration)
- Project assignment overview for the specified staff member
- Project workload distribution and time allocation

This is useful when you need to:
- Understand a staff member's current project workload
- Analyze project assignments and time commitments
- Get insights into staff member's project portfolio
- Track project participation and involvement
- Generate staff project reports and summaries
- Assess resource allocation and project distribution

Provide the staff member's name as input to get their complete project assignment list and project details.
";

const PROJECT_TEAM_DESCRIPTION: &str = "\
Use this tool to retrieve a comprehensive list of all staff members who have worked on a specific project. This tool provides detailed information about project participation and staff involvement, including:

- Complete list of staff members assigned to the project
- Individual staff details (name, title, role)
- Number of bookings each staff member had on the project
- Project team composition and workload distribution

This is useful when you need to:
- Identify all team members who worked on a specific project
- Analyze project team composition and roles
- Understand staff workload distribution across projects
- Generate project team reports and summaries
- Track project participation and involvement
- Assess team performance and resource allocation

Provide the project name as input to get a complete list of all staff members who have been involved with that project through bookings and assignments.
";

#[derive(Debug, Deserialize)]
struct NameArgs {
    #[serde(default)]
    name: Option<String>,
}

fn require_name(args: &NameArgs, what: &str) -> Result<String> {
    match args.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => bail!("{} name is required", what),
    }
}

/// Tool reporting booking statistics for a single project.
pub struct ProjectStatusTool {
    client: Arc<FreispaceClient>,
}

impl ProjectStatusTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectStatsData {
    #[serde(default)]
    project: Option<ProjectInfo>,
    #[serde(default)]
    bookings_past: Option<BookingStats>,
    #[serde(default)]
    bookings_future: Option<BookingStats>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: serde_json::Value,
    #[serde(default)]
    byline: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookingStats {
    #[serde(default)]
    number: Option<f64>,
    #[serde(default)]
    percentage: serde_json::Value,
    #[serde(default)]
    by_status: Option<serde_json::Map<String, serde_json::Value>>,
}

#[async_trait::async_trait]
impl Tool for ProjectStatusTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_project_status".to_string(),
            description: PROJECT_STATUS_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string("The name of the project to query status analytics for")
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NameArgs = parse_args(arguments)?;
        let name = require_name(&args, "Project")?;

        let endpoint = with_query("/tools/analytics/get-project-stats", &[("name", &name)]);
        let data = fetch_analytics(&self.client, &endpoint).await?;

        Ok(CallToolResult::text(format_project_status(&name, &data)))
    }
}

fn write_booking_stats(text: &mut String, heading: &str, stats: &BookingStats, empty_label: &str) {
    let _ = writeln!(text, "**{}:**", heading);
    let _ = writeln!(text, "- Total: {}", num_or_na(&stats.number));
    let _ = writeln!(text, "- Percentage: {}%", scalar_or(&stats.percentage, "N/A"));

    match &stats.by_status {
        Some(by_status) if !by_status.is_empty() => {
            text.push_str("- Status Breakdown:\n");
            for (status, count) in by_status {
                let _ = writeln!(text, "  - {}: {}", status, scalar_or(count, "N/A"));
            }
        }
        _ => {
            let _ = writeln!(text, "- Status Breakdown: {}", empty_label);
        }
    }
    text.push('\n');
}

fn format_project_status(name: &str, data: &serde_json::Value) -> String {
    let Ok(parsed) = serde_json::from_value::<ProjectStatsData>(data.clone()) else {
        let mut text = format!("# Project Status Report for {}\n\n", name);
        text.push_str("**Raw Data:**\n\n");
        text.push_str(&raw_json_block(data));
        return text;
    };

    let project_name = parsed
        .project
        .as_ref()
        .and_then(|p| p.name.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or(name);
    let mut text = format!("# Project Status Report for {}\n\n", project_name);

    if let Some(project) = &parsed.project {
        text.push_str("**Project Details:**\n");
        let _ = writeln!(text, "- Name: {}", text_or(&project.name, "N/A"));
        let _ = writeln!(text, "- Number: {}", scalar_or(&project.number, "N/A"));
        let _ = writeln!(text, "- Byline: {}", text_or(&project.byline, "N/A"));
        if let Some(description) = &project.description {
            if !description.is_empty() {
                let _ = writeln!(text, "- Description: {}", description);
            }
        }
        text.push('\n');
    }

    if let Some(past) = &parsed.bookings_past {
        write_booking_stats(&mut text, "Past Bookings", past, "No past bookings");
    }

    if let Some(future) = &parsed.bookings_future {
        write_booking_stats(&mut text, "Future Bookings", future, "No future bookings");
    }

    let total_bookings = parsed
        .bookings_past
        .as_ref()
        .and_then(|b| b.number)
        .unwrap_or(0.0)
        + parsed
            .bookings_future
            .as_ref()
            .and_then(|b| b.number)
            .unwrap_or(0.0);
    if total_bookings > 0.0 {
        text.push_str("**Summary:**\n");
        let _ = writeln!(text, "- Total Bookings: {}", total_bookings);
        let _ = writeln!(
            text,
            "- Past Activity: {}%",
            parsed
                .bookings_past
                .as_ref()
                .map(|b| scalar_or(&b.percentage, "0"))
                .unwrap_or_else(|| "0".to_string())
        );
        let _ = writeln!(
            text,
            "- Future Activity: {}%",
            parsed
                .bookings_future
                .as_ref()
                .map(|b| scalar_or(&b.percentage, "0"))
                .unwrap_or_else(|| "0".to_string())
        );
    }

    text
}

/// Tool listing all projects assigned to a staff member.
pub struct StaffProjectsTool {
    client: Arc<FreispaceClient>,
}

impl StaffProjectsTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectAssignment {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: serde_json::Value,
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    timeframe: serde_json::Value,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    duration_days: Option<f64>,
}

#[async_trait::async_trait]
impl Tool for StaffProjectsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_staff_projects".to_string(),
            description: STAFF_PROJECTS_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string("The name of the staff member to query project assignments for")
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NameArgs = parse_args(arguments)?;
        let name = require_name(&args, "Staff")?;

        let endpoint = with_query("/tools/analytics/get-staff-projects", &[("name", &name)]);
        let data = fetch_analytics(&self.client, &endpoint).await?;

        let today = Utc::now().date_naive();
        Ok(CallToolResult::text(format_staff_projects(
            &name, &data, today,
        )))
    }
}

fn format_staff_projects(name: &str, data: &serde_json::Value, today: NaiveDate) -> String {
    let mut text = format!("# Project Assignments for {}\n\n", name);

    let raw_projects = data.get("projects");
    let projects: Option<Vec<ProjectAssignment>> =
        raw_projects.and_then(|p| serde_json::from_value(p.clone()).ok());

    match projects {
        Some(projects) if !projects.is_empty() => {
            let _ = writeln!(text, "**Total Projects Assigned: {}**\n", projects.len());
            text.push_str("**Project List:**\n\n");

            for (index, project) in projects.iter().enumerate() {
                let _ = writeln!(text, "{}. **{}**", index + 1, text_or(&project.name, "N/A"));
                let number = scalar_or(&project.number, "");
                if !number.is_empty() {
                    let _ = writeln!(text, "   - Project Number: {}", number);
                }
                let _ = writeln!(text, "   - Project ID: {}", scalar_or(&project.id, "N/A"));
                let _ = writeln!(text, "   - Timeframe: {}", scalar_or(&project.timeframe, "N/A"));
                let _ = writeln!(text, "   - Start Date: {}", text_or(&project.start, "N/A"));
                let _ = writeln!(text, "   - End Date: {}", text_or(&project.end, "N/A"));
                let duration = project.duration_days.unwrap_or(f64::NAN);
                let _ = writeln!(
                    text,
                    "   - Duration: {} day{}",
                    num_or_na(&project.duration_days),
                    plural(duration)
                );
                text.push('\n');
            }

            let total_duration: f64 = projects
                .iter()
                .map(|p| p.duration_days.unwrap_or(0.0))
                .sum();
            let active_projects = projects
                .iter()
                .filter(|p| {
                    p.end
                        .as_deref()
                        .and_then(parse_day)
                        .map(|end| end >= today)
                        .unwrap_or(false)
                })
                .count();

            text.push_str("**Summary Statistics:**\n");
            let _ = writeln!(text, "- Total Duration: {} days", total_duration);
            let _ = writeln!(text, "- Active Projects: {}", active_projects);
            let _ = writeln!(
                text,
                "- Average Project Duration: {} days",
                (total_duration / projects.len() as f64).round()
            );
        }
        _ => {
            text.push_str("**No projects found for this staff member.**\n\n");
            if let Some(raw) = raw_projects {
                text.push_str("**Raw Data:**\n\n");
                text.push_str(&raw_json_block(raw));
            }
        }
    }

    text
}

/// Tool listing all staff members who worked on a project.
pub struct ProjectTeamTool {
    client: Arc<FreispaceClient>,
}

impl ProjectTeamTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectTeamData {
    #[serde(default)]
    amount_staffs: Option<f64>,
    #[serde(default)]
    staffs: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TeamMember {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    amount_bookings: Option<f64>,
}

#[async_trait::async_trait]
impl Tool for ProjectTeamTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_staffs_worked_on_project".to_string(),
            description: PROJECT_TEAM_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string(
                        "The name of the project to query for staff members who worked on it"
                    )
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NameArgs = parse_args(arguments)?;
        let name = require_name(&args, "Project")?;

        let endpoint = with_query(
            "/tools/analytics/get-staffs-worked-on-project",
            &[("name", &name)],
        );
        let data = fetch_analytics(&self.client, &endpoint).await?;

        Ok(CallToolResult::text(format_project_team(&name, &data)))
    }
}

fn format_project_team(name: &str, data: &serde_json::Value) -> String {
    let mut text = format!("# Project Team for \"{}\"\n\n", name);

    let parsed: ProjectTeamData = serde_json::from_value(data.clone()).unwrap_or(ProjectTeamData {
        amount_staffs: None,
        staffs: None,
    });
    let staffs: Option<Vec<TeamMember>> = parsed
        .staffs
        .as_ref()
        .and_then(|s| serde_json::from_value(s.clone()).ok());

    match staffs {
        Some(staffs) if !staffs.is_empty() => {
            let amount_staffs = parsed.amount_staffs.unwrap_or(f64::NAN);
            let _ = writeln!(
                text,
                "**Total Team Members: {}**\n",
                num_or_na(&parsed.amount_staffs)
            );
            text.push_str("**Team Members:**\n\n");

            for (index, staff) in staffs.iter().enumerate() {
                let _ = writeln!(text, "{}. **{}**", index + 1, text_or(&staff.name, "N/A"));
                let _ = writeln!(text, "   - Title: {}", text_or(&staff.title, "N/A"));
                let _ = writeln!(
                    text,
                    "   - Bookings: {}",
                    num_or_na(&staff.amount_bookings)
                );
                text.push('\n');
            }

            let total_bookings: f64 = staffs
                .iter()
                .map(|s| s.amount_bookings.unwrap_or(0.0))
                .sum();

            // Unique titles in first-seen order.
            let mut unique_titles: Vec<&Option<String>> = Vec::new();
            for staff in &staffs {
                if !unique_titles.contains(&&staff.title) {
                    unique_titles.push(&staff.title);
                }
            }

            text.push_str("**Project Summary:**\n");
            let _ = writeln!(
                text,
                "- Total Staff Members: {}",
                num_or_na(&parsed.amount_staffs)
            );
            let _ = writeln!(text, "- Total Bookings: {}", total_bookings);
            let _ = writeln!(text, "- Unique Roles: {}", unique_titles.len());
            let _ = writeln!(
                text,
                "- Average Bookings per Staff: {}\n",
                (total_bookings / amount_staffs).round()
            );

            if !unique_titles.is_empty() {
                text.push_str("**Role Distribution:**\n");
                for (index, title) in unique_titles.iter().enumerate() {
                    let count = staffs.iter().filter(|s| &&s.title == title).count();
                    let _ = writeln!(
                        text,
                        "{}. {}: {} staff member{}",
                        index + 1,
                        text_or(title, "N/A"),
                        count,
                        plural(count as f64)
                    );
                }
            }
        }
        _ => {
            text.push_str("**No staff members found for this project.**\n\n");
            if let Some(raw) = &parsed.staffs {
                text.push_str("**Raw Data:**\n\n");
                text.push_str(&raw_json_block(raw));
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

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn test_client(base_url: &str) -> Arc<FreispaceClient> {
        let config = freispace_client::ClientConfig::new(url::Url::parse(base_url).unwrap());
        Arc::new(FreispaceClient::new(config).unwrap())
    }

    #[test]
    fn test_project_status_report() {
        let data = json!({
            "project": {
                "name": "Launch Film",
                "number": "P-7",
                "byline": "Q4 campaign",
                "description": "Flagship production"
            },
            "bookings_past": {
                "number": 12,
                "percentage": 60,
                "by_status": {"confirmed": 10, "cancelled": 2}
            },
            "bookings_future": {
                "number": 8,
                "percentage": 40,
                "by_status": {}
            }
        });
        let text = format_project_status("Launch Film", &data);

        assert!(text.starts_with("# Project Status Report for Launch Film\n\n"));
        assert!(text.contains("- Description: Flagship production"));
        assert!(text.contains("**Past Bookings:**\n- Total: 12\n- Percentage: 60%"));
        assert!(text.contains("  - confirmed: 10\n  - cancelled: 2"));
        assert!(text.contains("- Status Breakdown: No future bookings"));
        assert!(text.contains("**Summary:**\n- Total Bookings: 20\n- Past Activity: 60%\n- Future Activity: 40%"));
    }

    #[test]
    fn test_project_status_without_bookings_has_no_summary() {
        let data = json!({"project": {"name": "Idle"}});
        let text = format_project_status("Idle", &data);
        assert!(!text.contains("**Summary:**"));
        assert!(text.contains("- Number: N/A"));
    }

    #[test]
    fn test_staff_projects_listing_and_summary() {
        let data = json!({
            "projects": [
                {
                    "name": "Launch Film",
                    "number": "P-7",
                    "id": "p1",
                    "timeframe": "Q3",
                    "start": "2026-07-01",
                    "end": "2026-09-30",
                    "duration_days": 91
                },
                {
                    "name": "Archive",
                    "id": "p2",
                    "timeframe": "Q1",
                    "start": "2026-01-01",
                    "end": "2026-02-01",
                    "duration_days": 31
                }
            ]
        });
        let text = format_staff_projects("Alice", &data, day("2026-08-23"));

        assert!(text.starts_with("# Project Assignments for Alice\n\n"));
        assert!(text.contains("**Total Projects Assigned: 2**"));
        assert!(text.contains("   - Project Number: P-7"));
        // The second project has no number line.
        assert!(text.contains("2. **Archive**\n   - Project ID: p2"));
        assert!(text.contains("   - Duration: 91 days"));
        assert!(text.contains("- Total Duration: 122 days"));
        // Only the first project is still active on 2026-08-23.
        assert!(text.contains("- Active Projects: 1"));
        assert!(text.contains("- Average Project Duration: 61 days"));
    }

    #[test]
    fn test_staff_projects_empty_renders_raw_data() {
        let data = json!({"projects": []});
        let text = format_staff_projects("Alice", &data, day("2026-08-23"));
        assert!(text.contains("**No projects found for this staff member.**"));
        assert!(text.contains("```json\n[]\n```"));
    }

    #[test]
    fn test_staff_projects_missing_collection_has_no_raw_block() {
        let data = json!({});
        let text = format_staff_projects("Alice", &data, day("2026-08-23"));
        assert!(text.contains("**No projects found for this staff member.**"));
        assert!(!text.contains("**Raw Data:**"));
    }

    #[test]
    fn test_project_team_totals_and_average() {
        let data = json!({
            "amount_staffs": 3,
            "staffs": [
                {"name": "Alice", "title": "Editor", "amount_bookings": 2},
                {"name": "Bob", "title": "Editor", "amount_bookings": 3},
                {"name": "Carol", "title": "Producer", "amount_bookings": 4}
            ]
        });
        let text = format_project_team("Launch Film", &data);

        assert!(text.starts_with("# Project Team for \"Launch Film\"\n\n"));
        assert!(text.contains("**Total Team Members: 3**"));
        assert!(text.contains("- Total Bookings: 9"));
        assert!(text.contains("- Unique Roles: 2"));
        assert!(text.contains("- Average Bookings per Staff: 3"));
        assert!(text.contains("**Role Distribution:**\n1. Editor: 2 staff members\n2. Producer: 1 staff member\n"));
    }

    #[test]
    fn test_project_team_zero_staffs_average_is_nan() {
        // amount_staffs of zero leaves the division unguarded.
        let data = json!({
            "amount_staffs": 0,
            "staffs": [{"name": "Ghost", "amount_bookings": 1}]
        });
        let text = format_project_team("Launch Film", &data);
        assert!(text.contains("- Average Bookings per Staff: NaN"));
    }

    #[test]
    fn test_project_team_empty_is_no_results() {
        let data = json!({"amount_staffs": 0, "staffs": []});
        let text = format_project_team("Launch Film", &data);
        assert!(text.contains("**No staff members found for this project.**"));
        assert!(text.contains("```json\n[]\n```"));
    }

    #[tokio::test]
    async fn test_required_name_is_validated_before_any_request() {
        let client = test_client("http://127.0.0.1:1");

        let err = ProjectStatusTool::new(client.clone())
            .execute(json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Project name is required");

        let err = StaffProjectsTool::new(client.clone())
            .execute(json!({"name": ""}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Staff name is required");

        let err = ProjectTeamTool::new(client)
            .execute(serde_json::Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Project name is required");
    }

    #[tokio::test]
    async fn test_project_status_queries_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/analytics/get-project-stats"))
            .and(query_param("name", "Launch Film"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"project": {"name": "Launch Film"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tool = ProjectStatusTool::new(test_client(&server.uri()));
        let result = tool.execute(json!({"name": "Launch Film"})).await.unwrap();
        assert!(result.is_error.is_none());
    }
}
