use clap::{Arg, Command};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use libchannel_census::config::Config;
use libchannel_census::process::run_census;

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could not create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn cli() -> Command {
    Command::new("channel_census_cli")
        .arg_required_else_help(true)
        .subcommand_negates_reqs(true)
        .subcommand(
            Command::new("new")
                .about("Make a template configuration yaml file")
                .arg(
                    Arg::new("path")
                        .short('p')
                        .long("path")
                        .required(true)
                        .help("Path to the new configuration file"),
                ),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
}

fn main() {
    // Create a cli
    let matches = cli().get_matches();

    // Initialize feedback
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("Could not create logging!");

    if let Some(("new", sub_matches)) = matches.subcommand() {
        let template_path =
            PathBuf::from(sub_matches.get_one::<String>("path").expect("We require args"));
        log::info!(
            "Making a template config at {}...",
            template_path.to_string_lossy()
        );

        make_template_config(&template_path);
        log::info!("Done.");
        return;
    }

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Dataset Path: {}", config.dataset_path.to_string_lossy());
    log::info!("Report Path: {}", config.report_path.to_string_lossy());
    log::info!("Run: {}", config.run);
    log::info!("Hit Flag Index: {}", config.hit_index);
    match &config.sectors {
        Some(sectors) => log::info!("Sectors: {}", sectors.join(", ")),
        None => log::info!("Sectors: all present in dataset"),
    }
    log::info!(
        "Per-Board: {} Per-Vmm: {}",
        config.per_board,
        config.per_vmm
    );

    // Run the census
    let report = match run_census(&config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Census failed with error: {e}");
            return;
        }
    };

    if let Some(overall) = report.summary("all sectors") {
        let counts = &overall.counts;
        log::info!(
            "Overall: {} channels -- masked w/ hits: {}, masked w/out hits: {}, unmasked w/ hits: {}, unmasked w/out hits: {}",
            counts.total(),
            counts.masked_with_hit,
            counts.masked_without_hit,
            counts.unmasked_with_hit,
            counts.unmasked_without_hit
        );
    }
    for failure in &report.failures {
        log::warn!("Skipped {}: {}", failure.scope, failure.error);
    }

    match report.write_json_file(&config.report_path) {
        Ok(_) => log::info!(
            "Report written to {}.",
            config.report_path.to_string_lossy()
        ),
        Err(e) => {
            log::error!("Failed to write report: {e}");
            return;
        }
    }

    log::info!("Done.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_required() {
        // A missing -p must be a usage error, not a panic downstream
        assert!(cli().try_get_matches_from(["channel_census_cli"]).is_err());
        assert!(cli()
            .try_get_matches_from(["channel_census_cli", "new"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["channel_census_cli", "-p", "census.yaml"])
            .is_ok());
        assert!(cli()
            .try_get_matches_from(["channel_census_cli", "new", "-p", "census.yaml"])
            .is_ok());
    }
}
