// Holiday schedule and quota query tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    fetch_analytics, json_schema_number, json_schema_object, json_schema_string, num_or_na,
    parse_args, parse_day, raw_json_block, scalar_or, text_or, with_query, Tool,
};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use freispace_client::FreispaceClient;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

const NEXT_HOLIDAYS_DESCRIPTION: &str = "\
Use this tool to get information about the next upcoming holidays for a staff member. This tool provides:

- Staff member details (name, title, ID, number)
- Holiday start and end dates
- Holiday duration (length in days)
- Additional comments about the holiday

If no name is provided, the tool will return the next holidays for the assigned staff of the user.

This is useful when you need to:
- Check when someone will be on holiday next
- Plan project timelines around staff availability
- Get upcoming absence information for team planning
- Understand holiday schedules for resource allocation

Optionally provide a staff member's name to get their specific holiday information.
";

const HOLIDAYS_LEFT_DESCRIPTION: &str = "\
Use this tool to get information about remaining holiday quota for a staff member. This tool provides:

- Staff member details (name, title, ID, number)
- Year being queried
- Holidays taken so far
- Total holiday quota for the year
- Remaining holiday days left

If no name is provided, the tool will return the holiday quota information for the assigned staff of the user.
If no year is provided, the current year is used.

This is useful when you need to:
- Check how many holiday days someone has left
- Plan holiday requests and availability
- Monitor holiday usage across the team
- Understand remaining holiday allowances for resource planning

Optionally provide a staff member's name and/or year to get their specific holiday quota information.
";

#[derive(Debug, Deserialize)]
struct HolidayStaff {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    number: Option<String>,
}

fn write_staff_block(text: &mut String, staff: &HolidayStaff) {
    text.push_str("**Staff Member:**\n");
    let _ = writeln!(text, "- Name: {}", text_or(&staff.display_name, "N/A"));
    let _ = writeln!(text, "- Title: {}", text_or(&staff.title, "N/A"));
    let _ = writeln!(text, "- ID: {}", scalar_or(&staff.id, "N/A"));
    if let Some(number) = &staff.number {
        if !number.is_empty() {
            let _ = writeln!(text, "- Number: {}", number);
        }
    }
    text.push('\n');
}

/// Tool reporting a staff member's next upcoming holiday.
pub struct NextHolidaysTool {
    client: Arc<FreispaceClient>,
}

impl NextHolidaysTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct NextHolidaysArgs {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NextHolidayData {
    #[serde(default)]
    staff: Option<HolidayStaff>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    comment: Option<String>,
}

#[async_trait::async_trait]
impl Tool for NextHolidaysTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "staffs_next_holidays_query".to_string(),
            description: NEXT_HOLIDAYS_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string(
                        "The name of the staff member to query holiday data for. \
                         If not provided, uses the assigned staff of the user."
                    )
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NextHolidaysArgs = parse_args(arguments)?;

        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(name) = args.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name));
        }
        let endpoint = with_query("/tools/analytics/get-staffs-next-holidays", &pairs);
        let data = fetch_analytics(&self.client, &endpoint).await?;

        let today = Utc::now().date_naive();
        Ok(CallToolResult::text(format_next_holiday(&data, today)))
    }
}

fn format_next_holiday(data: &serde_json::Value, today: NaiveDate) -> String {
    let mut text = String::from("# Next Holiday Information\n\n");

    let Ok(parsed) = serde_json::from_value::<NextHolidayData>(data.clone()) else {
        text.push_str("**Raw Data:**\n\n");
        text.push_str(&raw_json_block(data));
        return text;
    };

    if let Some(staff) = &parsed.staff {
        write_staff_block(&mut text, staff);
    }

    text.push_str("**Holiday Details:**\n");
    let _ = writeln!(text, "- Start Date: {}", text_or(&parsed.start, "N/A"));
    let _ = writeln!(text, "- End Date: {}", text_or(&parsed.end, "N/A"));
    let length = parsed.length.unwrap_or(f64::NAN);
    let _ = writeln!(
        text,
        "- Duration: {} day{}",
        num_or_na(&parsed.length),
        if length == 1.0 { "" } else { "s" }
    );

    if let Some(comment) = &parsed.comment {
        if !comment.trim().is_empty() {
            let _ = writeln!(text, "- Comment: {}", comment);
        }
    }

    if let Some(start) = parsed.start.as_deref().and_then(parse_day) {
        let days_until = (start - today).num_days();
        if days_until > 0 {
            let _ = writeln!(text, "- Days until holiday: {}", days_until);
        } else if days_until == 0 {
            text.push_str("- Holiday starts today!\n");
        } else if let Some(end) = parsed.end.as_deref().and_then(parse_day) {
            let days_until_end = (end - today).num_days();
            if days_until_end >= 0 {
                let _ = writeln!(
                    text,
                    "- Currently on holiday (ends in {} day{})",
                    days_until_end + 1,
                    if days_until_end == 0 { "" } else { "s" }
                );
            } else {
                text.push_str("- This holiday has already ended\n");
            }
        } else {
            text.push_str("- This holiday has already ended\n");
        }
    }

    text
}

/// Tool reporting a staff member's remaining holiday quota for a year.
pub struct HolidaysLeftTool {
    client: Arc<FreispaceClient>,
}

impl HolidaysLeftTool {
    pub fn new(client: Arc<FreispaceClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct HolidaysLeftArgs {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    year: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HolidayQuotaData {
    #[serde(default)]
    staff: Option<HolidayStaff>,
    #[serde(default)]
    year: serde_json::Value,
    #[serde(default)]
    quota_total: Option<f64>,
    #[serde(default)]
    taken: Option<f64>,
    #[serde(default)]
    left: Option<f64>,
}

#[async_trait::async_trait]
impl Tool for HolidaysLeftTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "staffs_holidays_left_query".to_string(),
            description: HOLIDAYS_LEFT_DESCRIPTION.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string(
                        "The name of the staff member to query holiday quota for. \
                         If not provided, uses the assigned staff of the user."
                    ),
                    "year": json_schema_number(
                        "The year to query holiday quota for. \
                         If not provided, uses the current year."
                    )
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: HolidaysLeftArgs = parse_args(arguments)?;

        let year = args.year.map(|y| y.to_string());
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(year) = year.as_deref() {
            pairs.push(("year", year));
        }
        if let Some(name) = args.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name));
        }
        let endpoint = with_query("/tools/analytics/get-staffs-left-holidays", &pairs);
        let data = fetch_analytics(&self.client, &endpoint).await?;

        Ok(CallToolResult::text(format_holiday_quota(&data)))
    }
}

fn format_holiday_quota(data: &serde_json::Value) -> String {
    let mut text = String::from("# Holiday Quota Information\n\n");

    let Ok(parsed) = serde_json::from_value::<HolidayQuotaData>(data.clone()) else {
        text.push_str("**Raw Data:**\n\n");
        text.push_str(&raw_json_block(data));
        return text;
    };

    if let Some(staff) = &parsed.staff {
        write_staff_block(&mut text, staff);
    }

    let year = scalar_or(&parsed.year, "N/A");
    let _ = writeln!(text, "**Holiday Quota for {}:**", year);
    let _ = writeln!(
        text,
        "- Total Quota: {} days",
        num_or_na(&parsed.quota_total)
    );
    let _ = writeln!(
        text,
        "- Days Taken: {} days",
        num_or_na(&parsed.taken)
    );
    let _ = writeln!(
        text,
        "- Days Remaining: {} days",
        num_or_na(&parsed.left)
    );

    // Division by zero intentionally unguarded: 0/0 renders as NaN, matching
    // the backend contract callers already observe.
    let usage = (parsed.taken.unwrap_or(f64::NAN) / parsed.quota_total.unwrap_or(f64::NAN)) * 100.0;
    let _ = writeln!(text, "- Usage: {:.1}% of quota used", usage);

    let left = parsed.left.unwrap_or(f64::NAN);
    if left == 0.0 {
        let _ = write!(
            text,
            "\n⚠️ **Warning:** No holiday days remaining for {}!\n",
            year
        );
    } else if left <= 5.0 {
        let _ = write!(
            text,
            "\n⚠️ **Notice:** Only {} holiday days remaining for {}.\n",
            num_or_na(&parsed.left),
            year
        );
    } else {
        let _ = write!(
            text,
            "\n✅ **Status:** {} holiday days available for planning.\n",
            num_or_na(&parsed.left)
        );
    }

    text
}
