use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::dataset::{Board, Dataset, Sector, VmmRecords};
use super::error::AggregateError;
use super::record::{Category, RecordLocation};
use super::scope::Scope;

/// Per-category channel counts for one scope.
///
/// Totals are always sums over records actually observed; nothing here assumes
/// a nominal channel count per vmm, so a vmm with missing or extra records
/// still counts correctly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub masked_with_hit: u64,
    pub masked_without_hit: u64,
    pub unmasked_with_hit: u64,
    pub unmasked_without_hit: u64,
}

impl CategoryCounts {
    pub fn tally(&mut self, category: Category) {
        match category {
            Category::MaskedWithHit => self.masked_with_hit += 1,
            Category::MaskedWithoutHit => self.masked_without_hit += 1,
            Category::UnmaskedWithHit => self.unmasked_with_hit += 1,
            Category::UnmaskedWithoutHit => self.unmasked_without_hit += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.masked_with_hit
            + self.masked_without_hit
            + self.unmasked_with_hit
            + self.unmasked_without_hit
    }

    pub fn masked_total(&self) -> u64 {
        self.masked_with_hit + self.masked_without_hit
    }

    pub fn unmasked_total(&self) -> u64 {
        self.unmasked_with_hit + self.unmasked_without_hit
    }

    /// True when the scope held no records at all (the "no data" state).
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All four categories as fractions of the scope total, in the order
    /// [masked w/ hit, masked w/out hit, unmasked w/ hit, unmasked w/out hit].
    /// None when the scope has no records.
    pub fn fraction_all(&self) -> Option<[f64; 4]> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some([
            self.masked_with_hit as f64 / total,
            self.masked_without_hit as f64 / total,
            self.unmasked_with_hit as f64 / total,
            self.unmasked_without_hit as f64 / total,
        ])
    }

    /// [with hit, without hit] fractions of the masked channels only.
    /// None when the scope has no masked channels.
    pub fn fraction_masked(&self) -> Option<[f64; 2]> {
        let masked = self.masked_total();
        if masked == 0 {
            return None;
        }
        let masked = masked as f64;
        Some([
            self.masked_with_hit as f64 / masked,
            self.masked_without_hit as f64 / masked,
        ])
    }

    /// [with hit, without hit] fractions of the unmasked channels only.
    /// None when the scope has no unmasked channels.
    pub fn fraction_unmasked(&self) -> Option<[f64; 2]> {
        let unmasked = self.unmasked_total();
        if unmasked == 0 {
            return None;
        }
        let unmasked = unmasked as f64;
        Some([
            self.unmasked_with_hit as f64 / unmasked,
            self.unmasked_without_hit as f64 / unmasked,
        ])
    }
}

impl Add for CategoryCounts {
    type Output = CategoryCounts;

    fn add(self, rhs: CategoryCounts) -> CategoryCounts {
        CategoryCounts {
            masked_with_hit: self.masked_with_hit + rhs.masked_with_hit,
            masked_without_hit: self.masked_without_hit + rhs.masked_without_hit,
            unmasked_with_hit: self.unmasked_with_hit + rhs.unmasked_with_hit,
            unmasked_without_hit: self.unmasked_without_hit + rhs.unmasked_without_hit,
        }
    }
}

impl AddAssign for CategoryCounts {
    fn add_assign(&mut self, rhs: CategoryCounts) {
        *self = *self + rhs;
    }
}

/// Classify every channel record within `scope` and accumulate the category
/// counts.
///
/// Every in-scope record is visited exactly once. Empty sectors, boards, and
/// vmms yield zero counts; a scope key that does not exist in the dataset is a
/// lookup error, never zero counts, so a caller typo cannot masquerade as a
/// sector with no hardware. `hit_index` selects which of the record's hit-flag
/// variants to classify against (1 is the first).
pub fn aggregate(
    dataset: &Dataset,
    hit_index: usize,
    scope: &Scope,
) -> Result<CategoryCounts, AggregateError> {
    match scope {
        Scope::Full => {
            let mut counts = CategoryCounts::default();
            for (sector_key, sector) in dataset.sectors() {
                counts += aggregate_sector(sector_key, sector, hit_index)?;
            }
            Ok(counts)
        }
        Scope::Sector(key) => {
            let sector = dataset
                .sector(key)
                .ok_or_else(|| AggregateError::UnknownSector(key.clone()))?;
            aggregate_sector(key, sector, hit_index)
        }
        Scope::Board { sector, board } => {
            let sector_data = dataset
                .sector(sector)
                .ok_or_else(|| AggregateError::UnknownSector(sector.clone()))?;
            let board_data =
                sector_data
                    .board(board)
                    .ok_or_else(|| AggregateError::UnknownBoard {
                        sector: sector.clone(),
                        board: board.clone(),
                    })?;
            aggregate_board(sector, board, board_data, hit_index)
        }
        Scope::Vmm { sector, board, vmm } => {
            let sector_data = dataset
                .sector(sector)
                .ok_or_else(|| AggregateError::UnknownSector(sector.clone()))?;
            let board_data =
                sector_data
                    .board(board)
                    .ok_or_else(|| AggregateError::UnknownBoard {
                        sector: sector.clone(),
                        board: board.clone(),
                    })?;
            let records = board_data
                .vmm(vmm)
                .ok_or_else(|| AggregateError::UnknownVmm {
                    sector: sector.clone(),
                    board: board.clone(),
                    vmm: vmm.clone(),
                })?;
            aggregate_vmm(sector, board, vmm, records, hit_index)
        }
    }
}

fn aggregate_sector(
    sector_key: &str,
    sector: &Sector,
    hit_index: usize,
) -> Result<CategoryCounts, AggregateError> {
    let mut counts = CategoryCounts::default();
    for (board_key, board) in sector.boards() {
        counts += aggregate_board(sector_key, board_key, board, hit_index)?;
    }
    Ok(counts)
}

fn aggregate_board(
    sector_key: &str,
    board_key: &str,
    board: &Board,
    hit_index: usize,
) -> Result<CategoryCounts, AggregateError> {
    let mut counts = CategoryCounts::default();
    for (vmm_key, records) in board.vmms() {
        counts += aggregate_vmm(sector_key, board_key, vmm_key, records, hit_index)?;
    }
    Ok(counts)
}

fn aggregate_vmm(
    sector_key: &str,
    board_key: &str,
    vmm_key: &str,
    records: &VmmRecords,
    hit_index: usize,
) -> Result<CategoryCounts, AggregateError> {
    let mut counts = CategoryCounts::default();
    for (channel, record) in records.iter().enumerate() {
        let category =
            record
                .classify(hit_index)
                .map_err(|source| AggregateError::MalformedRecord {
                    location: RecordLocation {
                        sector: sector_key.to_string(),
                        board: board_key.to_string(),
                        vmm: vmm_key.to_string(),
                        channel,
                    },
                    source,
                })?;
        counts.tally(category);
    }
    Ok(counts)
}
