//! # channel_census
//!
//! channel_census summarizes the per-channel readout status of the detector
//! frontend electronics. For a single run it takes the serialized channel
//! status snapshot (a JSON map of sector -> frontend board -> vmm -> channel
//! records, where each record is `[mask flag, hit flag, ...]`) and classifies
//! every channel into one of four categories:
//!
//! - masked with hits
//! - masked without hits
//! - unmasked with hits
//! - unmasked without hits
//!
//! Counts are accumulated for the whole dataset, per sector, and optionally
//! per board and per vmm, and each scope's counts are normalized into the
//! fraction reports the plotting scripts consume (all channels, masked
//! channels only, unmasked channels only). A scope with no channel records is
//! reported as an explicit empty placeholder, never as a division error.
//!
//! ## Building & Install
//!
//! To build and install the CLI use `cargo install --path ./channel_census_cli`
//! from the top level channel_census repository.
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! dataset_path: None
//! report_path: None
//! run: ''
//! hit_index: 1
//! sectors: null
//! per_board: false
//! per_vmm: false
//! ```
//!
//! - `dataset_path`: the channel status JSON for the run
//! - `report_path`: where the census report JSON is written
//! - `run`: run label carried into the report for titles
//! - `hit_index`: which hit-flag variant of each record to classify against
//!   (records carry one hit flag per viewpoint; 1 is the first, 0 is the mask
//!   flag and is never valid here)
//! - `sectors`: an explicit list of sector keys to summarize, or `null` for
//!   every sector present in the dataset
//! - `per_board`/`per_vmm`: also summarize each board / each vmm below the
//!   selected sectors
//!
//! ## Dataset Format
//!
//! Two shapes are accepted. The sectored shape keys the top level by signed
//! sector index ("1".."16" on one wheel, "-1".."-16" on the other):
//!
//! ```json
//! {"-3": {"MMFE8_L1P3_IPR": {"vmm0": [[0, 1], [1, 0]]}}}
//! ```
//!
//! The flat shape omits the sector level and holds a single sector's boards
//! directly; it is wrapped under the synthetic sector key `all` on load.
//!
//! Every channel record is an array of integer flags: index 0 is the mask
//! flag, later indices are hit-flag variants. Any flag outside {0, 1} is a
//! data-quality defect and is reported with its full location rather than
//! being counted.
//!
//! ## Report Format
//!
//! The report is a JSON document with one entry per summarized scope
//! (category counts plus the three fraction groups, each `null` when its
//! denominator is zero) and a list of the scopes that could not be
//! summarized. See [`report::CensusReport`].
pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod process;
pub mod record;
pub mod report;
pub mod scope;
