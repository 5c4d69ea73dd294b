//! Report normalizer: raw PIREP records into [`PilotReport`]s.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::PilotReport;

/// Timestamp layout used by the report feed. No zone suffix; always UTC.
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A pilot report record as delivered by the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPilotReport {
    #[serde(rename = "Location", alias = "location")]
    pub location: String,
    #[serde(rename = "Area", alias = "area")]
    pub area: String,
    #[serde(rename = "Time", alias = "time")]
    pub time: String,
    #[serde(rename = "Content", alias = "content", default)]
    pub content: String,
}

pub fn parse_report_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), REPORT_TIME_FORMAT)
        .ok()
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}

/// Normalize one record. A blank location or an unparseable timestamp drops it.
pub fn normalize_report(raw: &RawPilotReport) -> Option<PilotReport> {
    let location = raw.location.trim();
    if location.is_empty() {
        tracing::debug!(time = %raw.time, "dropping pilot report without a location");
        return None;
    }

    let Some(time) = parse_report_time(&raw.time) else {
        tracing::warn!(location, time = %raw.time, "dropping pilot report with unparseable time");
        return None;
    };

    Some(PilotReport {
        location: location.to_string(),
        area: raw.area.trim().to_string(),
        time,
        content: raw.content.trim().to_string(),
    })
}

pub fn normalize_reports(raws: &[RawPilotReport]) -> Vec<PilotReport> {
    raws.iter().filter_map(normalize_report).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(location: &str, time: &str) -> RawPilotReport {
        RawPilotReport {
            location: location.to_string(),
            area: "NORTH".to_string(),
            time: time.to_string(),
            content: "FAI UA /OV FAI/TM 1842/FL035/TP C208/SK OVC030".to_string(),
        }
    }

    #[test]
    fn timestamp_is_read_as_utc() {
        let report = normalize_report(&raw("FAI", "2024-03-01 18:42:00")).unwrap();
        assert_eq!(report.time, Utc.with_ymd_and_hms(2024, 3, 1, 18, 42, 0).unwrap());
        assert_eq!(report.location, "FAI");
        assert_eq!(report.area, "NORTH");
    }

    #[test]
    fn bad_timestamps_drop_only_that_record() {
        let raws = vec![
            raw("FAI", "2024-03-01 18:42:00"),
            raw("BRW", "2024-03-01T18:42:00Z"),
            raw("OME", "yesterday"),
            raw("OTZ", ""),
            raw("BET", "2024-03-01 19:05:00"),
        ];

        let locations: Vec<String> = normalize_reports(&raws)
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(locations, vec!["FAI", "BET"]);
    }

    #[test]
    fn blank_location_is_dropped() {
        assert!(normalize_report(&raw("  ", "2024-03-01 18:42:00")).is_none());
    }

    #[test]
    fn deserializes_feed_field_names() {
        let json = r#"[{"Location":"ANC","Area":"SOUTH","Time":"2024-03-01 18:42:00","Content":"UA /OV ANC"},
                       {"location":"ENA","area":"SOUTH","time":"2024-03-01 18:50:00"}]"#;
        let parsed: Vec<RawPilotReport> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].location, "ANC");
        assert_eq!(parsed[1].area, "SOUTH");
        assert_eq!(parsed[1].content, "");
    }
}
