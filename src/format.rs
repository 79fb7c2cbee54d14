//! Výpis odpovědí API pro člověka u terminálu.
//!
//! - `pretty_json` - JSON odsazený čtyřmi mezerami, znaky mimo ASCII zůstávají beze změny
//! - `status_table` - tabulka stavu úlohy
//! - `time_remaining` - česky vyjádřená doba platnosti vstupu
//! - `verdict_line` - řádek s výsledkem odevzdání podúlohy

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::api::{SubmitVerdict, SubtaskStatus, TaskStatus};
use crate::messages::{text, unit_forms, Msg, TimeUnit};

/// Rok, kterým server označuje vstup s neomezenou platností
const FOREVER_YEAR_PREFIX: &str = "9999";
const TABLE_WIDTH: usize = 60;

pub fn pretty_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Hodnota s tvarem jednotky podle českého skloňování, nula se vynechává
fn plural_form(value: i64, unit: TimeUnit) -> Option<String> {
    let [one, few, many] = unit_forms(unit);
    let form = match value {
        0 => return None,
        1 => one,
        2..=4 => few,
        _ => many,
    };
    Some(format!("{} {}", value, form))
}

/// Spojí části čárkami, poslední spojkou `a`
fn join_parts(parts: &[String]) -> String {
    let conjunction = format!(" {} ", text(Msg::Conjunction));
    match parts.split_last() {
        None => String::new(),
        Some((last, rest)) if rest.len() >= 2 => {
            format!("{}{}{}", rest.join(", "), conjunction, last)
        }
        _ => parts.join(conjunction.as_str()),
    }
}

fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(expiry) = DateTime::parse_from_rfc3339(value) {
        return Some(expiry.with_timezone(&Utc));
    }
    if let Ok(expiry) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(expiry.with_timezone(&Utc));
    }
    // bez časové zóny jde o místní čas
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|expiry| expiry.with_timezone(&Utc))
}

/// Délka platnosti vstupu podúlohy vzhledem k času `now`
pub fn time_remaining(subtask: &SubtaskStatus, now: DateTime<Utc>) -> String {
    if !subtask.input_generated {
        return text(Msg::NotGenerated).to_string();
    }
    let valid_until = match &subtask.input_valid_until {
        Some(valid_until) => valid_until,
        None => return text(Msg::Forever).to_string(),
    };
    if valid_until.starts_with(FOREVER_YEAR_PREFIX) {
        return text(Msg::Forever).to_string();
    }
    let expiry = match parse_expiry(valid_until) {
        Some(expiry) => expiry,
        None => return valid_until.clone(),
    };

    let millis = (expiry - now).num_milliseconds();
    let total = ((millis as f64) / 1000.0).round().max(0.0) as i64;
    let components = [
        (total / 86_400, TimeUnit::Day),
        (total % 86_400 / 3_600, TimeUnit::Hour),
        (total % 3_600 / 60, TimeUnit::Minute),
        (total % 60, TimeUnit::Second),
    ];
    let parts: Vec<String> = components
        .iter()
        .filter_map(|&(value, unit)| plural_form(value, unit))
        .collect();
    if parts.is_empty() {
        return text(Msg::Expired).to_string();
    }
    join_parts(&parts)
}

pub fn status_table(status: &TaskStatus, now: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!("{}: {}", text(Msg::TaskName), status.name),
        format!(
            "{}: {}/{}",
            text(Msg::EarnedPoints),
            status.points,
            status.max_points
        ),
        format!(
            "{:<5}| {:<32}| {:<8}| {}",
            text(Msg::ColumnTest),
            text(Msg::ColumnValidity),
            text(Msg::ColumnPoints),
            text(Msg::ColumnVerdict)
        ),
        "-".repeat(TABLE_WIDTH),
    ];
    for subtask in &status.subtasks {
        let points = format!("{}/{}", subtask.points, subtask.max_points);
        lines.push(format!(
            "{:<5}| {:<32}| {:<8}| {}",
            subtask.id.to_string(),
            time_remaining(subtask, now),
            points,
            subtask.verdict.as_deref().unwrap_or("")
        ));
    }
    lines.join("\n")
}

pub fn verdict_line(subtask: u32, verdict: &SubmitVerdict) -> String {
    format!(
        "{} {}: {} ({}/{}b)",
        text(Msg::SubtaskLine),
        subtask,
        verdict.verdict,
        verdict.points,
        verdict.max_points
    )
}
