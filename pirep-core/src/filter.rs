//! Significance filter.
//!
//! A station is worth a pilot report when visibility is low, the ceiling is
//! low, or the weather string carries a hazard. Stations that fail all three
//! never reach a sector board.

use crate::model::{Ceiling, SignificantStation, StationObservation};

/// Visibility at or below this (statute miles) is significant.
pub const MAX_VISIBILITY_SM: f64 = 3.0;

/// Broken/overcast bases at or below this (feet AGL) are significant.
pub const MAX_CEILING_FT: f64 = 5000.0;

/// Weather phenomenon codes that make a station significant on their own.
///
/// Matched as case-sensitive substrings, so `TS` also catches `TSRA`.
pub const HAZARD_CODES: &[&str] = &["BLSN", "FZRA", "TS", "FZDZ", "GR", "FU", "VA", "PL", "FZFG"];

pub fn low_visibility(obs: &StationObservation) -> bool {
    obs.visibility_sm.is_some_and(|v| v <= MAX_VISIBILITY_SM)
}

/// Lowest broken or overcast layer with a known base at or below
/// [`MAX_CEILING_FT`]. The first such layer wins a tie.
pub fn low_ceiling(obs: &StationObservation) -> Option<Ceiling> {
    obs.cloud_layers
        .iter()
        .filter(|layer| layer.cover.forms_ceiling())
        .filter_map(|layer| {
            layer
                .base_ft
                .filter(|base| *base <= MAX_CEILING_FT)
                .map(|base_ft| Ceiling { cover: layer.cover, base_ft })
        })
        .fold(None, |lowest: Option<Ceiling>, candidate| match lowest {
            Some(current) if current.base_ft <= candidate.base_ft => Some(current),
            _ => Some(candidate),
        })
}

/// Hazard codes present in the weather string, in [`HAZARD_CODES`] order.
pub fn hazards(obs: &StationObservation) -> Vec<&'static str> {
    match obs.wx_string.as_deref() {
        Some(wx) => HAZARD_CODES.iter().copied().filter(|code| wx.contains(code)).collect(),
        None => Vec::new(),
    }
}

pub fn is_significant(obs: &StationObservation) -> bool {
    low_visibility(obs) || low_ceiling(obs).is_some() || !hazards(obs).is_empty()
}

/// Returns the station with its ceiling and hazards if it is significant.
pub fn assess(obs: StationObservation) -> Option<SignificantStation> {
    if !is_significant(&obs) {
        return None;
    }

    let ceiling = low_ceiling(&obs);
    let found = hazards(&obs).into_iter().map(str::to_string).collect();
    Some(SignificantStation { observation: obs, ceiling, hazards: found })
}

pub fn filter_significant(observations: Vec<StationObservation>) -> Vec<SignificantStation> {
    let total = observations.len();
    let significant: Vec<SignificantStation> = observations.into_iter().filter_map(assess).collect();

    tracing::debug!(total, significant = significant.len(), "filtered observations");

    significant
}
