use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::normalize::{RawObservation, RawPilotReport};

use super::{ReportSource, metar_csv::parse_metar_csv};

/// Reads both feeds from local files: a METAR CSV in the aviationweather.gov
/// layout and a PIREP JSON array.
#[derive(Debug, Clone)]
pub struct FileSource {
    metar_csv: PathBuf,
    pireps_json: PathBuf,
}

impl FileSource {
    pub fn new(metar_csv: PathBuf, pireps_json: PathBuf) -> Self {
        Self { metar_csv, pireps_json }
    }
}

#[async_trait]
impl ReportSource for FileSource {
    async fn fetch_observations(&self) -> Result<Vec<RawObservation>> {
        let text = tokio::fs::read_to_string(&self.metar_csv)
            .await
            .with_context(|| format!("Failed to read METAR file: {}", self.metar_csv.display()))?;

        parse_metar_csv(&text)
            .with_context(|| format!("Failed to parse METAR file: {}", self.metar_csv.display()))
    }

    async fn fetch_pilot_reports(&self) -> Result<Vec<RawPilotReport>> {
        let text = tokio::fs::read_to_string(&self.pireps_json)
            .await
            .with_context(|| format!("Failed to read PIREP file: {}", self.pireps_json.display()))?;

        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse PIREP file: {}", self.pireps_json.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn reads_both_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let metars = dir.path().join("metars.csv");
        let pireps = dir.path().join("pireps.json");
        fs::write(&metars, "station_id,visibility_statute_mi\nPAFA,2\n").unwrap();
        fs::write(
            &pireps,
            r#"[{"Location":"FAI","Area":"NORTH","Time":"2024-03-01 17:30:00","Content":"UA"}]"#,
        )
        .unwrap();

        let source = FileSource::new(metars, pireps);
        let obs = source.fetch_observations().await.unwrap();
        let reps = source.fetch_pilot_reports().await.unwrap();

        assert_eq!(obs[0].station_id.as_deref(), Some("PAFA"));
        assert_eq!(reps[0].location, "FAI");
    }

    #[tokio::test]
    async fn malformed_pirep_file_fails_the_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let pireps = dir.path().join("pireps.json");
        fs::write(&pireps, "{not json").unwrap();

        let source = FileSource::new(dir.path().join("missing.csv"), pireps);
        assert!(source.fetch_pilot_reports().await.is_err());

        let err = source.fetch_observations().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read METAR file"));
    }
}
