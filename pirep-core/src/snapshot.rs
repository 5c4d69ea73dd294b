use chrono::{DateTime, Utc};

use crate::{
    aggregate::{aggregate, aggregate_all, aggregate_named},
    assignments::AssignmentTable,
    error::CoreError,
    filter::filter_significant,
    model::{PilotReport, SectorReport, SignificantStation},
    normalize::{RawObservation, RawPilotReport, normalize_observations, normalize_reports},
    sector::Sector,
    source::ReportSource,
};

/// Normalized, filtered data from one fetch cycle.
///
/// Holds no verdicts: those depend on `now` and are computed per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub stations: Vec<SignificantStation>,
    pub reports: Vec<PilotReport>,
}

impl Snapshot {
    pub fn from_raw(observations: &[RawObservation], reports: &[RawPilotReport]) -> Self {
        let stations = filter_significant(normalize_observations(observations));
        let reports = normalize_reports(reports);

        tracing::info!(
            observations = observations.len(),
            significant = stations.len(),
            reports = reports.len(),
            "built snapshot"
        );

        Self { stations, reports }
    }

    /// Fetch both feeds, then normalize. Any fetch error aborts the cycle.
    pub async fn fetch(source: &dyn ReportSource) -> anyhow::Result<Self> {
        let (observations, reports) =
            tokio::try_join!(source.fetch_observations(), source.fetch_pilot_reports())?;

        Ok(Self::from_raw(&observations, &reports))
    }

    pub fn sector(&self, sector: Sector, table: &AssignmentTable, now: DateTime<Utc>) -> SectorReport {
        aggregate(sector, &self.stations, &self.reports, table, now)
    }

    pub fn aggregate(
        &self,
        sector_name: &str,
        table: &AssignmentTable,
        now: DateTime<Utc>,
    ) -> Result<SectorReport, CoreError> {
        aggregate_named(sector_name, &self.stations, &self.reports, table, now)
    }

    pub fn aggregate_all(&self, table: &AssignmentTable, now: DateTime<Utc>) -> Vec<SectorReport> {
        aggregate_all(&self.stations, &self.reports, table, now)
    }
}
