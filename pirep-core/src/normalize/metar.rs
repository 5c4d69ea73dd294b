//! Observation normalizer: raw METAR rows into [`StationObservation`]s.
//!
//! Every field except the station identifier degrades to "unknown" instead
//! of failing, so a single odd value never costs the whole row.

use crate::model::{CloudCover, CloudLayer, StationObservation};

/// Maximum number of (cover, base) pairs read from a row.
pub const MAX_CLOUD_LAYERS: usize = 4;

/// One (cover, base) pair exactly as it appeared in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSkyLayer {
    pub cover: Option<String>,
    pub base_ft: Option<String>,
}

/// One tabular observation row with its fields still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawObservation {
    pub station_id: Option<String>,
    pub visibility: Option<String>,
    pub sky: Vec<RawSkyLayer>,
    pub wx_string: Option<String>,
}

/// Normalize a single row. Returns `None` only when the station identifier
/// is missing or blank.
pub fn normalize_observation(raw: &RawObservation) -> Option<StationObservation> {
    let station_id = non_blank(raw.station_id.as_deref())?;

    let cloud_layers = raw
        .sky
        .iter()
        .take(MAX_CLOUD_LAYERS)
        .filter_map(parse_layer)
        .collect();

    Some(StationObservation {
        station_id: station_id.to_string(),
        visibility_sm: raw.visibility.as_deref().and_then(parse_visibility),
        cloud_layers,
        wx_string: non_blank(raw.wx_string.as_deref()).map(str::to_string),
    })
}

/// Normalize a batch, dropping rows without a station identifier.
pub fn normalize_observations(raws: &[RawObservation]) -> Vec<StationObservation> {
    let observations: Vec<StationObservation> =
        raws.iter().filter_map(normalize_observation).collect();

    let dropped = raws.len() - observations.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped observation rows without a station identifier");
    }

    observations
}

/// Parse a visibility value in statute miles.
///
/// The "greater than" marker (`+`) and an `SM` unit suffix are dropped.
/// Anything that is then not a plain non-negative decimal is unknown,
/// including fractions and the `M` "less than" form.
pub fn parse_visibility(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix("SM").unwrap_or(s).replace('+', "");

    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_layer(raw: &RawSkyLayer) -> Option<CloudLayer> {
    let cover = non_blank(raw.cover.as_deref());
    let base = non_blank(raw.base_ft.as_deref());

    if cover.is_none() && base.is_none() {
        return None;
    }

    Some(CloudLayer {
        cover: cover.map(parse_cover).unwrap_or(CloudCover::Unknown),
        base_ft: base.and_then(parse_base),
    })
}

fn parse_cover(code: &str) -> CloudCover {
    match code {
        "CLR" | "SKC" | "NSC" | "NCD" | "CAVOK" => CloudCover::Clear,
        "FEW" => CloudCover::Few,
        "SCT" => CloudCover::Scattered,
        "BKN" => CloudCover::Broken,
        "OVC" => CloudCover::Overcast,
        _ => CloudCover::Unknown,
    }
}

fn parse_base(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
