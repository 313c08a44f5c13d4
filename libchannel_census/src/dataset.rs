use std::path::Path;

use fxhash::FxHashMap;
use serde_json::Value;

use super::error::DatasetError;
use super::record::ChannelRecord;

/// Sector key used when a flat (board -> vmm) file is loaded. Flat files carry
/// a single sector's worth of data with no sector level of their own.
pub const FLAT_SECTOR_KEY: &str = "all";

/// A vmm's worth of channel records.
pub type VmmRecords = Vec<ChannelRecord>;

/// One frontend board: a keyed group of vmms.
#[derive(Debug, Clone, Default)]
pub struct Board {
    vmms: FxHashMap<String, VmmRecords>,
}

impl Board {
    pub fn vmm(&self, key: &str) -> Option<&VmmRecords> {
        self.vmms.get(key)
    }

    pub fn vmms(&self) -> impl Iterator<Item = (&String, &VmmRecords)> {
        self.vmms.iter()
    }

    pub fn vmm_keys_sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.vmms.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn n_channels(&self) -> usize {
        self.vmms.values().map(Vec::len).sum()
    }
}

/// One sector: a keyed group of boards.
#[derive(Debug, Clone, Default)]
pub struct Sector {
    boards: FxHashMap<String, Board>,
}

impl Sector {
    pub fn board(&self, key: &str) -> Option<&Board> {
        self.boards.get(key)
    }

    pub fn boards(&self) -> impl Iterator<Item = (&String, &Board)> {
        self.boards.iter()
    }

    pub fn board_keys_sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.boards.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn n_channels(&self) -> usize {
        self.boards.values().map(Board::n_channels).sum()
    }
}

/// The full channel status snapshot for one run, keyed sector -> board -> vmm.
///
/// Read-only once loaded. Two file shapes are accepted: the three-level
/// `sector -> board -> vmm -> [[flags]]` map, and the flat single-sector
/// `board -> vmm -> [[flags]]` variant, which is wrapped under
/// [`FLAT_SECTOR_KEY`] so downstream code only ever sees one shape.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    sectors: FxHashMap<String, Sector>,
}

impl Dataset {
    /// Load a dataset from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        if !path.exists() {
            return Err(DatasetError::BadFilePath(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(contents)?;
        Self::from_value(&value)
    }

    /// Build a dataset from parsed JSON, probing the nesting depth to decide
    /// between the sectored and flat shapes.
    pub fn from_value(value: &Value) -> Result<Self, DatasetError> {
        let root = value.as_object().ok_or(DatasetError::NotAnObject)?;
        if root.is_empty() {
            return Ok(Dataset::default());
        }

        match object_depth(value) {
            3 => {
                let mut dataset = Dataset::default();
                for (key, sector_value) in root {
                    let sector = parse_sector(&format!("sector {key}"), sector_value)?;
                    dataset.sectors.insert(key.clone(), sector);
                }
                Ok(dataset)
            }
            2 => {
                let mut dataset = Dataset::default();
                let sector = parse_sector(&format!("sector {FLAT_SECTOR_KEY}"), value)?;
                dataset.sectors.insert(String::from(FLAT_SECTOR_KEY), sector);
                Ok(dataset)
            }
            depth => Err(DatasetError::BadShape(depth)),
        }
    }

    pub fn sector(&self, key: &str) -> Option<&Sector> {
        self.sectors.get(key)
    }

    pub fn sectors(&self) -> impl Iterator<Item = (&String, &Sector)> {
        self.sectors.iter()
    }

    /// Sector keys in report order: numeric keys sorted by signed value,
    /// anything else lexically.
    pub fn sector_keys_sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sectors.keys().map(String::as_str).collect();
        keys.sort_unstable_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });
        keys
    }

    pub fn n_sectors(&self) -> usize {
        self.sectors.len()
    }

    pub fn n_channels(&self) -> usize {
        self.sectors.values().map(Sector::n_channels).sum()
    }
}

/// Depth of nested objects above the deepest array leaf. Empty branches do not
/// pull the depth down, so a sector with no boards cannot make a sectored file
/// look flat.
fn object_depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(object_depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn parse_sector(path: &str, value: &Value) -> Result<Sector, DatasetError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DatasetError::BadRecordList(path.to_string()))?;
    let mut sector = Sector::default();
    for (key, board_value) in obj {
        let board = parse_board(&format!("{path} / {key}"), board_value)?;
        sector.boards.insert(key.clone(), board);
    }
    Ok(sector)
}

fn parse_board(path: &str, value: &Value) -> Result<Board, DatasetError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DatasetError::BadRecordList(path.to_string()))?;
    let mut board = Board::default();
    for (key, vmm_value) in obj {
        let records = parse_records(&format!("{path} / {key}"), vmm_value)?;
        board.vmms.insert(key.clone(), records);
    }
    Ok(board)
}

fn parse_records(path: &str, value: &Value) -> Result<VmmRecords, DatasetError> {
    let list = value
        .as_array()
        .ok_or_else(|| DatasetError::BadRecordList(path.to_string()))?;
    let mut records = VmmRecords::with_capacity(list.len());
    for (index, entry) in list.iter().enumerate() {
        let flags = entry
            .as_array()
            .ok_or_else(|| DatasetError::BadRecord(format!("{path} / channel {index}")))?
            .iter()
            .map(|flag| flag.as_i64())
            .collect::<Option<Vec<i64>>>()
            .ok_or_else(|| DatasetError::BadRecord(format!("{path} / channel {index}")))?;
        records.push(ChannelRecord::new(flags));
    }
    Ok(records)
}
