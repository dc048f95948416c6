//! Date resolution tool — turns relative date phrases into ISO dates.
//!
//! The model calls this whenever the operator says things like "next
//! Monday", "in 3 months", or "end of the month", so the record always
//! carries a concrete `YYYY-MM-DD` the validation rules can compare.
//!
//! Unresolvable phrases return `success: false` with guidance the model
//! relays to the operator; hard errors are reserved for bad arguments.

use async_trait::async_trait;
use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};
use hireline_core::error::ToolError;
use hireline_core::tool::{Tool, ToolResult};
use tracing::debug;

pub struct ResolveDateTool {
    /// Fixed reference date; `None` means the wall clock.
    today: Option<NaiveDate>,
}

impl ResolveDateTool {
    pub fn new() -> Self {
        Self { today: None }
    }

    /// Pin "today" to a fixed date (for deterministic resolution).
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Resolve an expression to a concrete date.
    fn resolve(&self, expr: &str) -> Option<NaiveDate> {
        let today = self.today();
        let normalized = expr.trim().to_lowercase();

        match normalized.as_str() {
            "today" | "now" => return Some(today),
            "tomorrow" => return Some(today + Days::new(1)),
            "yesterday" => return Some(today - Days::new(1)),
            "next week" => {
                // The coming Monday; a full week out when today is Monday.
                let ahead = days_until(today, Weekday::Mon);
                let ahead = if ahead == 0 { 7 } else { ahead };
                return Some(today + Days::new(ahead));
            }
            "next month" => {
                return first_of_month(today).checked_add_months(Months::new(1));
            }
            "next year" => {
                return NaiveDate::from_ymd_opt(today.year() + 1, 1, 1);
            }
            _ => {}
        }

        if normalized.contains("end of") || normalized.contains("month end") {
            if normalized.contains("month") {
                return last_of_month(today);
            }
            if normalized.contains("year") {
                return NaiveDate::from_ymd_opt(today.year(), 12, 31);
            }
        }

        if let Some(date) = resolve_offset(&normalized, today) {
            return Some(date);
        }

        if let Some(date) = resolve_weekday(&normalized, today) {
            return Some(date);
        }

        // Last resort: the phrase may already be a concrete date.
        parse_fixed_formats(expr.trim(), today.year())
    }
}

impl Default for ResolveDateTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ResolveDateTool {
    fn name(&self) -> &str {
        "resolve_date"
    }

    fn description(&self) -> &str {
        "Resolve a relative date expression (e.g. 'next Monday', 'in 3 months', \
         'end of the month', 'tomorrow') to a concrete calendar date. Always use \
         this tool instead of guessing dates."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "date_expression": {
                    "type": "string",
                    "description": "The date expression to resolve, e.g. 'next Friday' or 'in 2 weeks'"
                }
            },
            "required": ["date_expression"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let expr = arguments["date_expression"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("Missing 'date_expression' argument".into())
        })?;

        let today = self.today();
        match self.resolve(expr) {
            Some(date) => {
                let context = describe_offset((date - today).num_days());
                debug!(expr, date = %date, "resolved date expression");
                Ok(ToolResult {
                    success: true,
                    output: format!(
                        "RESOLVED DATE: {}, {} ({}). (Today is {}, {})",
                        date.format("%A"),
                        date.format("%Y-%m-%d"),
                        context,
                        today.format("%A"),
                        today.format("%Y-%m-%d"),
                    ),
                })
            }
            None => Ok(ToolResult {
                success: false,
                output: format!(
                    "Could not resolve date expression: '{}'. Try phrases like \
                     'next Monday', 'in 2 weeks', 'end of the month', or a concrete \
                     date such as '2026-09-15'.",
                    expr.trim()
                ),
            }),
        }
    }
}

/// The context label: the resolved date as an offset in days from today.
fn describe_offset(days: i64) -> String {
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        -1 => "1 day ago".into(),
        n if n > 0 => format!("{n} days from today"),
        n => format!("{} days ago", -n),
    }
}

/// Days from `today` until the next occurrence of `target` (0 when today).
fn days_until(today: NaiveDate, target: Weekday) -> u64 {
    let today_num = today.weekday().num_days_from_monday() as i64;
    let target_num = target.num_days_from_monday() as i64;
    ((target_num - today_num).rem_euclid(7)) as u64
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the current month, leap-year aware.
fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let next = first_of_month(date).checked_add_months(Months::new(1))?;
    next.checked_sub_days(Days::new(1))
}

/// "in 3 weeks", "2 days from today", "6 months ago" and similar.
fn resolve_offset(normalized: &str, today: NaiveDate) -> Option<NaiveDate> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let past = words.contains(&"ago");

    for pair in words.windows(2) {
        let Ok(n) = pair[0].parse::<u32>() else {
            continue;
        };
        let unit = pair[1].trim_end_matches(',');
        let unit = unit.strip_suffix('s').unwrap_or(unit);

        let date = match unit {
            "day" => offset_days(today, n as u64, past),
            "week" => offset_days(today, n as u64 * 7, past),
            "month" => offset_months(today, n, past),
            "year" => offset_months(today, n.checked_mul(12)?, past),
            _ => continue,
        };
        if date.is_some() {
            return date;
        }
    }
    None
}

fn offset_days(today: NaiveDate, n: u64, past: bool) -> Option<NaiveDate> {
    if past {
        today.checked_sub_days(Days::new(n))
    } else {
        today.checked_add_days(Days::new(n))
    }
}

fn offset_months(today: NaiveDate, n: u32, past: bool) -> Option<NaiveDate> {
    if past {
        today.checked_sub_months(Months::new(n))
    } else {
        today.checked_add_months(Months::new(n))
    }
}

/// "this friday", "next friday", "last friday", or a bare weekday name.
fn resolve_weekday(normalized: &str, today: NaiveDate) -> Option<NaiveDate> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let (qualifier, day_word) = match words.as_slice() {
        [day] => ("next", *day),
        [q @ ("this" | "next" | "last"), day] => (*q, *day),
        _ => return None,
    };
    let target = weekday_from_str(day_word)?;

    match qualifier {
        "this" => {
            // Today counts when the weekday matches.
            let ahead = days_until(today, target);
            Some(today + Days::new(ahead))
        }
        "next" => {
            let ahead = days_until(today, target);
            let ahead = if ahead == 0 { 7 } else { ahead };
            Some(today + Days::new(ahead))
        }
        "last" => {
            let today_num = today.weekday().num_days_from_monday() as i64;
            let target_num = target.num_days_from_monday() as i64;
            let back = (today_num - target_num).rem_euclid(7);
            let back = if back == 0 { 7 } else { back };
            Some(today - Days::new(back as u64))
        }
        _ => None,
    }
}

fn weekday_from_str(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Concrete date formats the operator may type directly.
fn parse_fixed_formats(expr: &str, current_year: i32) -> Option<NaiveDate> {
    const FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%d.%m.%Y",
        "%d/%m/%Y",
        "%B %d, %Y",
        "%d %B %Y",
        "%B %d %Y",
    ];
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(expr, fmt) {
            return Some(date);
        }
    }

    // Year-less forms get the current year.
    let with_year = format!("{expr} {current_year}");
    for fmt in ["%B %d %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, fmt) {
            return Some(date);
        }
    }
    None
}
