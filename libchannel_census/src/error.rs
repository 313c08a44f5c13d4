use std::path::PathBuf;
use thiserror::Error;

use super::record::RecordLocation;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Flag value {1} at index {0} is not a valid boolean flag (must be 0 or 1)")]
    BadFlag(usize, i64),
    #[error("Record has {1} flags but flag index {0} was requested")]
    MissingFlag(usize, usize),
    #[error("Hit flag index must be at least 1 (index 0 is the mask flag), got {0}")]
    BadHitIndex(usize),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Could not open dataset because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Dataset failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Dataset failed to parse JSON: {0}")]
    ParsingError(#[from] serde_json::Error),
    #[error("Dataset root must be a JSON object")]
    NotAnObject,
    #[error("Dataset has unrecognized nesting depth {0}; expected 2 (board -> vmm) or 3 (sector -> board -> vmm)")]
    BadShape(usize),
    #[error("Dataset value at {0} is not a list of channel records")]
    BadRecordList(String),
    #[error("Dataset channel record at {0} is not an array of integers")]
    BadRecord(String),
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Requested sector {0} does not exist in the dataset")]
    UnknownSector(String),
    #[error("Requested board {board} does not exist in sector {sector}")]
    UnknownBoard { sector: String, board: String },
    #[error("Requested vmm {vmm} does not exist in sector {sector}, board {board}")]
    UnknownVmm {
        sector: String,
        board: String,
        vmm: String,
    },
    #[error("Malformed channel record at {location}: {source}")]
    MalformedRecord {
        location: RecordLocation,
        #[source]
        source: RecordError,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Board name {0} does not match the MMFE8_L#P#_(IP|HO)(L|R) format")]
    BadNodeName(String),
    #[error("Invalid board geometry -- layer: {0}, radius: {1} (both must be below 8)")]
    BadGeometry(u8, u8),
    #[error("Sector index {0} is outside the valid range (1..=16 on either side)")]
    BadSectorIndex(i32),
    #[error("Could not parse sector key {0} as a signed index")]
    BadSectorKey(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Census failed due to configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Census failed due to dataset error: {0}")]
    DatasetError(#[from] DatasetError),
    #[error("Census failed due to aggregation error: {0}")]
    AggregateError(#[from] AggregateError),
    #[error("Census failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Census failed to serialize the report to JSON: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Census requires a hit flag index of at least 1, got {0}")]
    BadHitIndex(usize),
}
