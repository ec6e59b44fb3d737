//! Formatting helpers for command-line output and timestamp parsing

use crate::types::Prediction;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// Render a probability in [0, 1] as a percentage with one decimal
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Render a win/loss record, e.g. "12W-4L"
pub fn format_record(wins: u32, losses: u32) -> String {
    format!("{}W-{}L", wins, losses)
}

/// Horizontal rule used between report sections
pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

/// Multi-line summary of a prediction
pub fn format_prediction(prediction: &Prediction, head_to_head: (u32, u32)) -> String {
    let divider = "-".repeat(40);
    let mut lines = vec![
        divider.clone(),
        format!("{} vs {}", prediction.team1_name, prediction.team2_name),
        divider,
        format!("Predicted winner: {}", prediction.predicted_winner),
        format!(
            "  {}: {}",
            prediction.team1_name,
            format_percent(prediction.team1_win_probability)
        ),
        format!(
            "  {}: {}",
            prediction.team2_name,
            format_percent(prediction.team2_win_probability)
        ),
        format!("Confidence: {}", prediction.confidence.to_string().to_uppercase()),
    ];

    let (a_wins, b_wins) = head_to_head;
    if a_wins + b_wins > 0 {
        lines.push(format!("Head-to-head: {}-{}", a_wins, b_wins));
    }
    lines.join("\n")
}

/// Parse a stored timestamp; values without an offset are read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamped) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamped.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Deserialize a required timestamp with or without an offset
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

/// Deserialize an informational timestamp; anything unreadable becomes `None`
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}
