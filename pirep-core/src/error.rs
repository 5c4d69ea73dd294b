use thiserror::Error;

/// Contract and reference-data failures raised by the core.
///
/// Per-record problems in the feeds never show up here: the normalizers
/// degrade or drop those records locally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown sector '{0}'. Supported sectors: NORTH, SOUTH, HIGH, ATOP.")]
    UnknownSector(String),

    #[error("Airport '{0}' is assigned more than once in the assignment table")]
    DuplicateAirport(String),

    #[error("Priority list for '{sector}' names '{nas_id}', which is not an airport of that sector")]
    UnknownPriorityStation { sector: String, nas_id: String },

    #[error("Failed to parse assignment table: {0}")]
    InvalidTable(String),
}
