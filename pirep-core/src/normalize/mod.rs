//! Typed parse step between the raw feeds and the filter/aggregator.

pub mod metar;
pub mod pirep;

pub use metar::{RawObservation, RawSkyLayer, normalize_observations};
pub use pirep::{RawPilotReport, normalize_reports};
