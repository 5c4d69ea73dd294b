use crate::{
    Config,
    normalize::{RawObservation, RawPilotReport},
    source::{aviationweather::AviationWeatherSource, files::FileSource},
};
use anyhow::anyhow;
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod aviationweather;
pub mod files;
pub mod metar_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    AviationWeather,
    Files,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::AviationWeather => "aviationweather",
            SourceKind::Files => "files",
        }
    }

    pub const fn all() -> &'static [SourceKind] {
        &[SourceKind::AviationWeather, SourceKind::Files]
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "aviationweather" => Ok(SourceKind::AviationWeather),
            "files" => Ok(SourceKind::Files),
            _ => Err(anyhow!(
                "Unknown source '{value}'. Supported sources: aviationweather, files."
            )),
        }
    }
}

/// Fetches one cycle of raw METAR and PIREP records.
///
/// A failed fetch is returned as an error; implementations never hand back
/// a partial feed.
#[async_trait]
pub trait ReportSource: Send + Sync + Debug {
    async fn fetch_observations(&self) -> anyhow::Result<Vec<RawObservation>>;

    async fn fetch_pilot_reports(&self) -> anyhow::Result<Vec<RawPilotReport>>;
}

/// Construct a source from config and explicit SourceKind.
pub fn source_from_config(
    kind: SourceKind,
    config: &Config,
) -> anyhow::Result<Box<dyn ReportSource>> {
    let boxed: Box<dyn ReportSource> = match kind {
        SourceKind::AviationWeather => {
            let http = &config.aviationweather;
            let pirep_url = http.pirep_url.clone().ok_or_else(|| {
                anyhow!(
                    "No PIREP feed URL configured for source '{kind}'.\n\
                     Hint: run `pirep configure` and enter the PIREP feed URL."
                )
            })?;
            let metar_url = http
                .metar_url
                .clone()
                .unwrap_or_else(|| aviationweather::DEFAULT_METAR_URL.to_string());

            Box::new(AviationWeatherSource::new(metar_url, pirep_url))
        }
        SourceKind::Files => {
            let files = &config.files;
            let (Some(metar_csv), Some(pireps_json)) =
                (files.metar_csv.clone(), files.pireps_json.clone())
            else {
                return Err(anyhow!(
                    "Source '{kind}' needs both a METAR CSV and a PIREP JSON path.\n\
                     Hint: run `pirep configure` and select the 'files' source."
                ));
            };

            Box::new(FileSource::new(metar_csv, pireps_json))
        }
    };

    Ok(boxed)
}

/// Construct the configured source, using the `source` field.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn ReportSource>> {
    let kind = config.source_kind()?;
    source_from_config(kind, config)
}
