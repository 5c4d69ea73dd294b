//! Core library for the `pirep` board.
//!
//! This crate defines:
//! - Normalizers for raw METAR and PIREP records
//! - The significance filter (low visibility, low ceiling, hazards)
//! - The sector assignment table and the sector aggregator
//! - Report sources and configuration
//!
//! It is used by `pirep-cli`, but the filter and aggregator are pure
//! functions and can be reused by any other front end.

pub mod aggregate;
pub mod assignments;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod sector;
pub mod snapshot;
pub mod source;

pub use assignments::{AssignmentTable, SectorAssignment};
pub use config::Config;
pub use error::CoreError;
pub use model::{
    Ceiling, CloudCover, CloudLayer, PilotReport, RequirementStatus, SectorReport,
    SignificantStation, StationObservation, StationVerdict,
};
pub use sector::Sector;
pub use snapshot::Snapshot;
pub use source::{ReportSource, SourceKind};
