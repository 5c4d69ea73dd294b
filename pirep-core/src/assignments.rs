//! Sector assignment table: which sector each airport belongs to and where
//! it sits in that sector's priority list.
//!
//! Example TOML:
//!
//! ```toml
//! [[airports]]
//! icao_id = "PAFA"
//! nas_id = "FAI"
//! area = "NORTH"
//!
//! [priorities]
//! NORTH = ["FAI", "BRW"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use crate::{error::CoreError, sector::Sector};

const BUILTIN_TABLE: &str = include_str!("../assets/assignments.toml");

/// One `[[airports]]` entry as written in the table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportEntry {
    pub icao_id: String,
    pub nas_id: String,
    pub area: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TableFile {
    #[serde(default)]
    airports: Vec<AirportEntry>,
    #[serde(default)]
    priorities: BTreeMap<String, Vec<String>>,
}

/// A resolved assignment for a single airport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorAssignment {
    pub icao_id: String,
    pub nas_id: String,
    pub sector: Sector,
    /// Index in the sector's priority list, if listed there.
    pub rank: Option<usize>,
}

/// Immutable reference data, built once at startup and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct AssignmentTable {
    assignments: Vec<SectorAssignment>,
    by_icao: HashMap<String, usize>,
}

impl AssignmentTable {
    /// Build a table from airport entries and per-sector priority lists of
    /// NAS identifiers.
    pub fn new(
        airports: Vec<AirportEntry>,
        priorities: &BTreeMap<Sector, Vec<String>>,
    ) -> Result<Self, CoreError> {
        let mut assignments = Vec::with_capacity(airports.len());
        let mut by_icao = HashMap::with_capacity(airports.len());

        for entry in airports {
            let sector = Sector::try_from(entry.area.as_str())?;
            let icao_id = entry.icao_id.trim().to_string();
            let nas_id = entry.nas_id.trim().to_string();

            if by_icao.insert(icao_id.clone(), assignments.len()).is_some() {
                return Err(CoreError::DuplicateAirport(icao_id));
            }

            let rank = priorities
                .get(&sector)
                .and_then(|list| list.iter().position(|id| *id == nas_id));

            assignments.push(SectorAssignment { icao_id, nas_id, sector, rank });
        }

        for (sector, list) in priorities {
            for nas_id in list {
                let known = assignments
                    .iter()
                    .any(|a| a.sector == *sector && a.nas_id == *nas_id);
                if !known {
                    return Err(CoreError::UnknownPriorityStation {
                        sector: sector.to_string(),
                        nas_id: nas_id.clone(),
                    });
                }
            }
        }

        Ok(Self { assignments, by_icao })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CoreError> {
        let file: TableFile =
            toml::from_str(contents).map_err(|e| CoreError::InvalidTable(e.to_string()))?;

        let mut priorities = BTreeMap::new();
        for (name, list) in file.priorities {
            priorities.insert(Sector::try_from(name.as_str())?, list);
        }

        Self::new(file.airports, &priorities)
    }

    /// Table shipped with the crate.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read assignment table: {}", path.display()))?;

        let table = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid assignment table: {}", path.display()))?;

        tracing::info!(path = %path.display(), airports = table.len(), "loaded assignment table");
        Ok(table)
    }

    /// Load from `path` if given, otherwise use the built-in table.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::builtin()?),
        }
    }

    pub fn lookup(&self, icao_id: &str) -> Option<&SectorAssignment> {
        self.by_icao.get(icao_id).map(|&i| &self.assignments[i])
    }

    pub fn in_sector(&self, sector: Sector) -> impl Iterator<Item = &SectorAssignment> {
        self.assignments.iter().filter(move |a| a.sector == sector)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
