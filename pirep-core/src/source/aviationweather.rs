use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::normalize::{RawObservation, RawPilotReport};

use super::{ReportSource, metar_csv::parse_metar_csv};

/// Alaska METARs from the last two hours, latest per station.
pub const DEFAULT_METAR_URL: &str = "https://aviationweather.gov/api/data/dataserver?requestType=retrieve&dataSource=metars&stationString=%40AK&hoursBeforeNow=2&format=csv&mostRecent=false&mostRecentForEachStation=postfilter";

/// Fetches METARs as CSV from aviationweather.gov and PIREPs as a JSON array
/// of `{Location, Area, Time, Content}` records from a configured endpoint.
#[derive(Debug, Clone)]
pub struct AviationWeatherSource {
    metar_url: String,
    pirep_url: String,
    http: Client,
}

impl AviationWeatherSource {
    pub fn new(metar_url: String, pirep_url: String) -> Self {
        Self {
            metar_url,
            pirep_url,
            http: Client::new(),
        }
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request to {url}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl ReportSource for AviationWeatherSource {
    async fn fetch_observations(&self) -> Result<Vec<RawObservation>> {
        let body = self.get_text(&self.metar_url, "METAR").await?;
        parse_metar_csv(&body).context("Failed to parse METAR CSV")
    }

    async fn fetch_pilot_reports(&self) -> Result<Vec<RawPilotReport>> {
        let body = self.get_text(&self.pirep_url, "PIREP").await?;
        serde_json::from_str(&body).context("Failed to parse PIREP JSON")
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
