//! Sector aggregator.
//!
//! Joins significant stations to the assignment table, ranks them, and
//! decides per station whether a fresh pilot report is needed.
//!
//! # Clock injection
//! Every function takes `now` instead of reading the clock, so the freshness
//! verdict is deterministic in tests. Nothing is cached: callers re-run the
//! aggregation for every view and get a verdict for the `now` they pass.

use chrono::{DateTime, Duration, Utc};

use crate::{
    assignments::{AssignmentTable, SectorAssignment},
    error::CoreError,
    model::{PilotReport, RequirementStatus, SectorReport, SignificantStation, StationVerdict},
    sector::Sector,
};

/// A report this old or older no longer counts as current.
pub const REPORT_INTERVAL_SECS: i64 = 60 * 60;

pub fn report_interval() -> Duration {
    Duration::seconds(REPORT_INTERVAL_SECS)
}

/// `NewReportRequired` when there is no report or it is at least
/// [`REPORT_INTERVAL_SECS`] old; `UpToDate` otherwise.
pub fn requirement_status(now: DateTime<Utc>, latest: Option<DateTime<Utc>>) -> RequirementStatus {
    match latest {
        Some(time) if now - time < report_interval() => RequirementStatus::UpToDate,
        _ => RequirementStatus::NewReportRequired,
    }
}

pub fn hours_since(now: DateTime<Utc>, time: DateTime<Utc>) -> f64 {
    (now - time).num_milliseconds() as f64 / 3_600_000.0
}

/// Most recent report for `nas_id` tagged with `sector`. Among reports
/// sharing the latest time, the first one in input order wins.
pub fn latest_report<'a>(
    reports: &'a [PilotReport],
    sector: Sector,
    nas_id: &str,
) -> Option<&'a PilotReport> {
    reports
        .iter()
        .filter(|r| r.area == sector.as_str() && r.location == nas_id)
        .fold(None, |best: Option<&PilotReport>, r| match best {
            Some(b) if b.time >= r.time => Some(b),
            _ => Some(r),
        })
}

/// Stations of `sector` in display order: ranked stations by rank, then
/// unranked ones in the order they arrived.
fn ranked_stations<'a>(
    sector: Sector,
    stations: &'a [SignificantStation],
    table: &'a AssignmentTable,
) -> Vec<(&'a SectorAssignment, &'a SignificantStation)> {
    let mut joined: Vec<_> = stations
        .iter()
        .filter_map(|s| table.lookup(s.station_id()).map(|a| (a, s)))
        .filter(|(a, _)| a.sector == sector)
        .collect();

    joined.sort_by_key(|(a, _)| (a.rank.is_none(), a.rank));
    joined
}

pub fn aggregate(
    sector: Sector,
    stations: &[SignificantStation],
    reports: &[PilotReport],
    table: &AssignmentTable,
    now: DateTime<Utc>,
) -> SectorReport {
    let verdicts: Vec<StationVerdict> = ranked_stations(sector, stations, table)
        .into_iter()
        .map(|(assignment, station)| {
            let latest = latest_report(reports, sector, &assignment.nas_id);
            let status = requirement_status(now, latest.map(|r| r.time));

            if status == RequirementStatus::NewReportRequired {
                match latest {
                    Some(r) => tracing::info!(
                        station = %assignment.nas_id,
                        latest = %r.time.format("%Y-%m-%d %H:%M:%S"),
                        "new PIREP required"
                    ),
                    None => tracing::info!(station = %assignment.nas_id, "new PIREP required, none on file"),
                }
            }

            StationVerdict {
                station_id: assignment.icao_id.clone(),
                nas_id: assignment.nas_id.clone(),
                rank: assignment.rank,
                station: station.clone(),
                latest_report: latest.cloned(),
                hours_since_report: latest.map(|r| hours_since(now, r.time)),
                status,
            }
        })
        .collect();

    tracing::debug!(%sector, stations = verdicts.len(), "aggregated sector");

    SectorReport { sector, generated_at: now, stations: verdicts }
}

/// Like [`aggregate`], but for a sector name supplied by a caller. An
/// unrecognized name is rejected before any work is done.
pub fn aggregate_named(
    sector_name: &str,
    stations: &[SignificantStation],
    reports: &[PilotReport],
    table: &AssignmentTable,
    now: DateTime<Utc>,
) -> Result<SectorReport, CoreError> {
    let sector = Sector::try_from(sector_name)?;
    Ok(aggregate(sector, stations, reports, table, now))
}

/// One report per sector, in [`Sector::all`] order.
pub fn aggregate_all(
    stations: &[SignificantStation],
    reports: &[PilotReport],
    table: &AssignmentTable,
    now: DateTime<Utc>,
) -> Vec<SectorReport> {
    Sector::all()
        .iter()
        .map(|sector| aggregate(*sector, stations, reports, table, now))
        .collect()
}
