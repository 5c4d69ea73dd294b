//! Plain-text rendering of sector boards.

use chrono::{DateTime, Utc};
use pirep_core::{SectorReport, StationVerdict};
use std::fmt;

const NA: &str = "N/A";

pub fn zulu(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S Z").to_string()
}

fn visibility(v: &StationVerdict) -> String {
    match v.station.observation.visibility_sm {
        Some(sm) => format!("{sm}SM"),
        None => NA.to_string(),
    }
}

fn ceiling(v: &StationVerdict) -> String {
    match v.station.ceiling {
        Some(c) => format!("{} {:.0}", c.cover.code(), c.base_ft),
        None => NA.to_string(),
    }
}

fn latest(v: &StationVerdict) -> String {
    match (&v.latest_report, v.hours_since_report) {
        (Some(r), Some(hours)) => format!("{} ({hours:.1}h ago)", r.time.format("%H:%M Z")),
        _ => "none".to_string(),
    }
}

/// Text table for one sector report.
struct Board<'a>(&'a SectorReport);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(
            f,
            "{}  {}  ({} of {} stations need a PIREP)",
            report.sector,
            zulu(report.generated_at),
            report.reports_required(),
            report.stations.len(),
        )?;

        if report.stations.is_empty() {
            return writeln!(f, "  no significant stations");
        }

        writeln!(
            f,
            "  {:<5} {:<4} {:<8} {:<10} {:<14} {:<20} STATUS",
            "ICAO", "NAS", "VIS", "CEILING", "WX", "LATEST PIREP"
        )?;

        for v in &report.stations {
            writeln!(
                f,
                "  {:<5} {:<4} {:<8} {:<10} {:<14} {:<20} {}",
                v.station_id,
                v.nas_id,
                visibility(v),
                ceiling(v),
                v.station.observation.wx_string.as_deref().unwrap_or(NA),
                latest(v),
                v.status,
            )?;
            if let Some(r) = v.latest_report.as_ref().filter(|r| !r.content.is_empty()) {
                writeln!(f, "        {}", r.content)?;
            }
        }

        Ok(())
    }
}

pub fn sector_board(report: &SectorReport) -> String {
    Board(report).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pirep_core::{
        Ceiling, CloudCover, PilotReport, RequirementStatus, Sector, SignificantStation,
        StationObservation,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    }

    fn verdict(report: Option<PilotReport>) -> StationVerdict {
        let status = if report.is_some() {
            RequirementStatus::UpToDate
        } else {
            RequirementStatus::NewReportRequired
        };
        StationVerdict {
            station_id: "PAFA".to_string(),
            nas_id: "FAI".to_string(),
            rank: Some(0),
            station: SignificantStation {
                observation: StationObservation {
                    station_id: "PAFA".to_string(),
                    visibility_sm: Some(1.5),
                    cloud_layers: Vec::new(),
                    wx_string: None,
                },
                ceiling: Some(Ceiling { cover: CloudCover::Broken, base_ft: 2500.0 }),
                hazards: Vec::new(),
            },
            hours_since_report: report.as_ref().map(|_| 0.5),
            latest_report: report,
            status,
        }
    }

    #[test]
    fn zulu_format() {
        assert_eq!(zulu(now()), "2024-03-01 18:00:00 Z");
    }

    #[test]
    fn board_shows_station_details() {
        let report = SectorReport {
            sector: Sector::North,
            generated_at: now(),
            stations: vec![verdict(None)],
        };
        let text = sector_board(&report);

        assert!(text.starts_with("NORTH  2024-03-01 18:00:00 Z  (1 of 1 stations need a PIREP)"));
        assert!(text.contains("1.5SM"));
        assert!(text.contains("BKN 2500"));
        assert!(text.contains("none"));
        assert!(text.contains("NEW PIREP REQUIRED"));
    }

    #[test]
    fn board_shows_latest_report() {
        let pirep = PilotReport {
            location: "FAI".to_string(),
            area: "NORTH".to_string(),
            time: now() - Duration::minutes(30),
            content: "FAI UA /OV FAI/TM 1730/FL030/TP PA31/SK OVC025".to_string(),
        };
        let report = SectorReport {
            sector: Sector::North,
            generated_at: now(),
            stations: vec![verdict(Some(pirep))],
        };
        let text = sector_board(&report);

        assert!(text.contains("17:30 Z (0.5h ago)"));
        assert!(text.contains("Up to Date"));
        assert!(text.contains("SK OVC025"));
    }

    #[test]
    fn one_line_per_station_after_the_headers() {
        let report = SectorReport {
            sector: Sector::North,
            generated_at: now(),
            stations: vec![verdict(None), verdict(None)],
        };
        let text = sector_board(&report);
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn empty_board() {
        let report = SectorReport {
            sector: Sector::Atop,
            generated_at: now(),
            stations: Vec::new(),
        };
        assert!(sector_board(&report).contains("no significant stations"));
    }
}
