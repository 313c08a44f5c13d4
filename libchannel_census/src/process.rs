use std::str::FromStr;

use super::aggregate::aggregate;
use super::config::Config;
use super::dataset::Dataset;
use super::error::CensusError;
use super::geometry::SectorId;
use super::report::{CensusReport, ScopeSummary};
use super::scope::Scope;

/// Report label for a sector scope, with the wheel-style name attached when
/// the key is a signed sector index.
fn sector_label(key: &str) -> String {
    match SectorId::from_str(key) {
        Ok(id) => format!("sector {key} ({})", id.wheel_label()),
        Err(_) => format!("sector {key}"),
    }
}

/// Aggregate one scope and record the outcome on the report.
///
/// A scope that fails (unknown key, malformed record) is logged and recorded
/// as a failure; it never aborts the rest of the batch.
fn summarize_scope(
    dataset: &Dataset,
    hit_index: usize,
    scope: Scope,
    label: String,
    report: &mut CensusReport,
) {
    match aggregate(dataset, hit_index, &scope) {
        Ok(counts) => {
            if counts.is_empty() {
                log::warn!("No channel records in {scope}; reporting an empty placeholder.");
            }
            report.push_summary(ScopeSummary::new(label, counts));
        }
        Err(e) => {
            log::error!("Could not summarize {scope}: {e}");
            report.push_failure(scope.to_string(), e.to_string());
        }
    }
}

/// The main loop of the census.
///
/// Loads the dataset once, then summarizes the whole dataset, every requested
/// sector, and optionally each board and vmm below those sectors. Failed
/// scopes are collected on the report rather than aborting their siblings.
pub fn run_census(config: &Config) -> Result<CensusReport, CensusError> {
    if !config.is_hit_index_valid() {
        return Err(CensusError::BadHitIndex(config.hit_index));
    }

    log::info!(
        "Loading dataset from {}...",
        config.dataset_path.to_string_lossy()
    );
    let dataset = Dataset::from_file(&config.dataset_path)?;
    log::info!(
        "Loaded {} sectors holding {} channel records.",
        dataset.n_sectors(),
        dataset.n_channels()
    );

    let mut report = CensusReport::new(&config.run, config.hit_index);

    summarize_scope(
        &dataset,
        config.hit_index,
        Scope::Full,
        String::from("all sectors"),
        &mut report,
    );

    let sector_keys: Vec<String> = match &config.sectors {
        Some(keys) => keys.clone(),
        None => dataset
            .sector_keys_sorted()
            .into_iter()
            .map(String::from)
            .collect(),
    };

    for sector_key in &sector_keys {
        summarize_scope(
            &dataset,
            config.hit_index,
            Scope::sector(sector_key),
            sector_label(sector_key),
            &mut report,
        );

        if !config.per_board && !config.per_vmm {
            continue;
        }
        // An unknown sector was already recorded as a failure above
        let sector = match dataset.sector(sector_key) {
            Some(sector) => sector,
            None => continue,
        };
        for board_key in sector.board_keys_sorted() {
            if config.per_board {
                let scope = Scope::board(sector_key, board_key);
                let label = scope.to_string();
                summarize_scope(&dataset, config.hit_index, scope, label, &mut report);
            }
            if config.per_vmm {
                if let Some(board) = sector.board(board_key) {
                    for vmm_key in board.vmm_keys_sorted() {
                        let scope = Scope::vmm(sector_key, board_key, vmm_key);
                        let label = scope.to_string();
                        summarize_scope(&dataset, config.hit_index, scope, label, &mut report);
                    }
                }
            }
        }
    }

    log::info!(
        "Census complete: {} scopes summarized, {} failures.",
        report.scopes.len(),
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp_dataset(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("census_{}_{name}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn test_config(dataset_path: PathBuf) -> Config {
        Config {
            dataset_path,
            report_path: PathBuf::from("None"),
            run: String::from("run_0007"),
            hit_index: 1,
            sectors: None,
            per_board: false,
            per_vmm: false,
        }
    }

    const TWO_SECTORS: &str = r#"{
        "-1": {"MMFE8_L1P1_IPL": {"vmm0": [[0,1],[1,0]], "vmm1": [[1,1]]}},
        "2": {"MMFE8_L1P1_IPR": {"vmm0": [[0,0]]}}
    }"#;

    #[test]
    fn test_census_all_sectors() {
        let path = write_temp_dataset("all_sectors", TWO_SECTORS);
        let config = test_config(path.clone());
        let report = run_census(&config).unwrap();
        std::fs::remove_file(path).unwrap();

        assert!(report.failures.is_empty());
        // Whole dataset plus one summary per sector, in sign order
        assert_eq!(report.scopes.len(), 3);
        assert_eq!(report.scopes[0].label, "all sectors");
        assert_eq!(report.scopes[1].label, "sector -1 (C01)");
        assert_eq!(report.scopes[2].label, "sector 2 (A02)");
        assert_eq!(report.scopes[0].counts.total(), 4);
        assert_eq!(report.scopes[1].counts.total(), 3);
    }

    #[test]
    fn test_census_breakdown() {
        let path = write_temp_dataset("breakdown", TWO_SECTORS);
        let mut config = test_config(path.clone());
        config.per_board = true;
        config.per_vmm = true;
        let report = run_census(&config).unwrap();
        std::fs::remove_file(path).unwrap();

        assert!(report.failures.is_empty());
        // 1 full + 2 sectors + 2 boards + 3 vmms
        assert_eq!(report.scopes.len(), 8);
        let vmm1 = report
            .summary("sector -1 / MMFE8_L1P1_IPL / vmm1")
            .expect("vmm scope should be present");
        assert_eq!(vmm1.counts.masked_with_hit, 1);
        assert_eq!(vmm1.counts.total(), 1);
    }

    #[test]
    fn test_unknown_sector_does_not_abort_batch() {
        let path = write_temp_dataset("unknown_sector", TWO_SECTORS);
        let mut config = test_config(path.clone());
        config.sectors = Some(vec![String::from("99"), String::from("2")]);
        let report = run_census(&config).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].scope, "sector 99");
        assert!(report.summary("sector 2 (A02)").is_some());
    }

    #[test]
    fn test_malformed_sector_does_not_abort_siblings() {
        let path = write_temp_dataset(
            "malformed",
            r#"{"1": {"b": {"v": [[2,0]]}}, "2": {"b": {"v": [[0,1]]}}}"#,
        );
        let config = test_config(path.clone());
        let report = run_census(&config).unwrap();
        std::fs::remove_file(path).unwrap();

        // Full scope and sector 1 both trip over the bad record; sector 2 survives
        assert_eq!(report.failures.len(), 2);
        let good = report.summary("sector 2 (A02)").unwrap();
        assert_eq!(good.counts.unmasked_with_hit, 1);
    }

    #[test]
    fn test_bad_hit_index_rejected() {
        let path = write_temp_dataset("bad_hit_index", TWO_SECTORS);
        let mut config = test_config(path.clone());
        config.hit_index = 0;
        let result = run_census(&config);
        std::fs::remove_file(path).unwrap();
        assert!(matches!(result, Err(CensusError::BadHitIndex(0))));
    }

    #[test]
    fn test_missing_dataset_is_fatal() {
        let config = test_config(PathBuf::from("/nonexistent/census.json"));
        assert!(matches!(
            run_census(&config),
            Err(CensusError::DatasetError(_))
        ));
    }
}
