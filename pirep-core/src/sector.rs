use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};

use crate::error::CoreError;

/// The fixed set of geographic sectors a board can be shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sector {
    North,
    South,
    High,
    Atop,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::North => "NORTH",
            Sector::South => "SOUTH",
            Sector::High => "HIGH",
            Sector::Atop => "ATOP",
        }
    }

    /// Display order of the combined board.
    pub const fn all() -> &'static [Sector] {
        &[Sector::North, Sector::South, Sector::High, Sector::Atop]
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Sector {
    type Error = CoreError;

    /// Only the canonical upper-case names are accepted.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "NORTH" => Ok(Sector::North),
            "SOUTH" => Ok(Sector::South),
            "HIGH" => Ok(Sector::High),
            "ATOP" => Ok(Sector::Atop),
            _ => Err(CoreError::UnknownSector(value.to_string())),
        }
    }
}

impl FromStr for Sector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::try_from(s)
    }
}
