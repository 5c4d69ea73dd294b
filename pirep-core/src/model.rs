use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sector::Sector;

/// Sky cover category of a single cloud layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudCover {
    Clear,
    Few,
    Scattered,
    Broken,
    Overcast,
    Unknown,
}

impl CloudCover {
    /// METAR contraction for this category.
    pub fn code(&self) -> &'static str {
        match self {
            CloudCover::Clear => "CLR",
            CloudCover::Few => "FEW",
            CloudCover::Scattered => "SCT",
            CloudCover::Broken => "BKN",
            CloudCover::Overcast => "OVC",
            CloudCover::Unknown => "UNK",
        }
    }

    /// Broken and overcast layers are the ones that form a ceiling.
    pub fn forms_ceiling(&self) -> bool {
        matches!(self, CloudCover::Broken | CloudCover::Overcast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub cover: CloudCover,
    /// Feet above ground level.
    pub base_ft: Option<f64>,
}

/// One station's METAR, reduced to the fields the board cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationObservation {
    pub station_id: String,
    /// Statute miles.
    pub visibility_sm: Option<f64>,
    pub cloud_layers: Vec<CloudLayer>,
    pub wx_string: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ceiling {
    pub cover: CloudCover,
    pub base_ft: f64,
}

/// An observation that passed the significance filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantStation {
    pub observation: StationObservation,
    pub ceiling: Option<Ceiling>,
    /// Hazard codes found in the weather string, in vocabulary order.
    pub hazards: Vec<String>,
}

impl SignificantStation {
    pub fn station_id(&self) -> &str {
        &self.observation.station_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotReport {
    /// NAS identifier of the reporting location, e.g. "ANC".
    pub location: String,
    /// Sector tag as declared by the upstream source.
    pub area: String,
    pub time: DateTime<Utc>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementStatus {
    UpToDate,
    NewReportRequired,
}

impl RequirementStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequirementStatus::UpToDate => "Up to Date",
            RequirementStatus::NewReportRequired => "NEW PIREP REQUIRED",
        }
    }
}

impl std::fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationVerdict {
    pub station_id: String,
    pub nas_id: String,
    /// Position in the sector's priority list; `None` when unranked.
    pub rank: Option<usize>,
    pub station: SignificantStation,
    pub latest_report: Option<PilotReport>,
    pub hours_since_report: Option<f64>,
    pub status: RequirementStatus,
}

/// Ranked verdicts for one sector, evaluated at `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorReport {
    pub sector: Sector,
    pub generated_at: DateTime<Utc>,
    pub stations: Vec<StationVerdict>,
}

impl SectorReport {
    pub fn reports_required(&self) -> usize {
        self.stations
            .iter()
            .filter(|v| v.status == RequirementStatus::NewReportRequired)
            .count()
    }
}
