use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::error::RecordError;

/// Index of the mask flag within a channel record. Hit flags occupy index 1 onward.
pub const MASK_FLAG_INDEX: usize = 0;

/// The four masking/hit categories a channel can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    MaskedWithHit,
    MaskedWithoutHit,
    UnmaskedWithHit,
    UnmaskedWithoutHit,
}

/// Classify a channel from its mask flag and one of its hit flags.
///
/// Total over all four combinations; validation of raw flag values happens
/// before this point (see [`ChannelRecord::classify`]).
pub fn classify(masked: bool, hit: bool) -> Category {
    match (masked, hit) {
        (true, true) => Category::MaskedWithHit,
        (true, false) => Category::MaskedWithoutHit,
        (false, true) => Category::UnmaskedWithHit,
        (false, false) => Category::UnmaskedWithoutHit,
    }
}

/// The raw status flags of a single readout channel.
///
/// Index 0 is the mask flag; every later index is one hit-flag variant. Values
/// are stored exactly as parsed so that an out-of-range flag can be reported
/// with its location instead of being coerced to a boolean on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    flags: Vec<i64>,
}

impl ChannelRecord {
    pub fn new(flags: Vec<i64>) -> Self {
        Self { flags }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Fetch the flag at `index` as a boolean, rejecting anything outside {0,1}.
    fn flag(&self, index: usize) -> Result<bool, RecordError> {
        match self.flags.get(index) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(value) => Err(RecordError::BadFlag(index, *value)),
            None => Err(RecordError::MissingFlag(index, self.flags.len())),
        }
    }

    pub fn mask_flag(&self) -> Result<bool, RecordError> {
        self.flag(MASK_FLAG_INDEX)
    }

    pub fn hit_flag(&self, hit_index: usize) -> Result<bool, RecordError> {
        if hit_index == MASK_FLAG_INDEX {
            return Err(RecordError::BadHitIndex(hit_index));
        }
        self.flag(hit_index)
    }

    /// Classify this channel using the hit flag at `hit_index`.
    pub fn classify(&self, hit_index: usize) -> Result<Category, RecordError> {
        Ok(classify(self.mask_flag()?, self.hit_flag(hit_index)?))
    }
}

/// The position of a channel record within the nested dataset.
///
/// Carried by malformed-record errors so a bad flag can be located in the
/// source file rather than silently skewing the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    pub sector: String,
    pub board: String,
    pub vmm: String,
    pub channel: usize,
}

impl Display for RecordLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sector {} / {} / {} / channel {}",
            self.sector, self.board, self.vmm, self.channel
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_total() {
        assert_eq!(classify(true, true), Category::MaskedWithHit);
        assert_eq!(classify(true, false), Category::MaskedWithoutHit);
        assert_eq!(classify(false, true), Category::UnmaskedWithHit);
        assert_eq!(classify(false, false), Category::UnmaskedWithoutHit);
    }

    #[test]
    fn test_classify_deterministic() {
        for masked in [false, true] {
            for hit in [false, true] {
                assert_eq!(classify(masked, hit), classify(masked, hit));
            }
        }
    }

    #[test]
    fn test_record_classify() {
        let record = ChannelRecord::new(vec![0, 1]);
        assert_eq!(record.classify(1), Ok(Category::UnmaskedWithHit));
        let record = ChannelRecord::new(vec![1, 0]);
        assert_eq!(record.classify(1), Ok(Category::MaskedWithoutHit));
    }

    #[test]
    fn test_record_hit_variants() {
        // Second hit-flag variant disagrees with the first
        let record = ChannelRecord::new(vec![0, 1, 0]);
        assert_eq!(record.classify(1), Ok(Category::UnmaskedWithHit));
        assert_eq!(record.classify(2), Ok(Category::UnmaskedWithoutHit));
    }

    #[test]
    fn test_bad_flag_rejected() {
        // 2 is the "no masking set" sentinel some producers emit; it must surface
        let record = ChannelRecord::new(vec![2, 0]);
        assert_eq!(record.classify(1), Err(RecordError::BadFlag(0, 2)));
        let record = ChannelRecord::new(vec![0, 2]);
        assert_eq!(record.classify(1), Err(RecordError::BadFlag(1, 2)));
    }

    #[test]
    fn test_short_record_rejected() {
        let record = ChannelRecord::new(vec![0, 1]);
        assert_eq!(record.classify(2), Err(RecordError::MissingFlag(2, 2)));
    }

    #[test]
    fn test_mask_index_not_a_hit_index() {
        let record = ChannelRecord::new(vec![0, 1]);
        assert_eq!(record.hit_flag(0), Err(RecordError::BadHitIndex(0)));
    }

    #[test]
    fn test_location_display() {
        let loc = RecordLocation {
            sector: String::from("-3"),
            board: String::from("MMFE8_L1P3_IPR"),
            vmm: String::from("vmm2"),
            channel: 17,
        };
        assert_eq!(
            format!("{loc}"),
            "sector -3 / MMFE8_L1P3_IPR / vmm2 / channel 17"
        );
    }
}
