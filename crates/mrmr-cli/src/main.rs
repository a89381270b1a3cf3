use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use mrmr::config::{load_selection_config, SelectionConfig};
use mrmr::MrmrMethod;
use mrmr_cli::select::{load_dataset, run_selection, write_selection_output, OutputFormat};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MRMR_LOG", "error,mrmr=info"))
        .init();

    let matches = Command::new("mrmr")
        .version(clap::crate_version!())
        .about("Minimum-Redundancy-Maximum-Relevance feature selection")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("select")
                .about("Rank features of a labelled CSV table with mRMR")
                .arg(
                    Arg::new("input")
                        .help("CSV file: header line, then `class,value_1,...,value_F` rows")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON selection config. Flags below override it.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("threshold")
                        .short('t')
                        .long("threshold")
                        .help(
                            "z-score threshold for discretization into {-1, 0, 1}. \
                             Use 'inf' to keep raw values.",
                        )
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true)
                        .conflicts_with("no_discretize"),
                )
                .arg(
                    Arg::new("no_discretize")
                        .long("no-discretize")
                        .help("Use the raw values rounded to integers instead of discretized z-scores.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("n_features")
                        .short('n')
                        .long("n-features")
                        .help("Number of features to select (capped at the feature count).")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("method")
                        .short('m')
                        .long("method")
                        .help("Score combination: difference (mid) or quotient (miq).")
                        .value_parser(["mid", "miq"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write the selected indices. Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("scores")
                        .long("scores")
                        .help("Write a TSV with relevance, redundancy and score per step.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Write the config, the selected indices and every step as JSON.")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("scores"),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Print feature, sample and class counts of a labelled CSV table")
                .arg(
                    Arg::new("input")
                        .help("CSV file: header line, then `class,value_1,...,value_F` rows")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("select", sub_m)) => handle_select(sub_m),
        Some(("summary", sub_m)) => handle_summary(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_select(matches: &ArgMatches) -> Result<()> {
    let input: &PathBuf = matches.get_one("input").unwrap();
    log::info!("[mRMR::Select] Selecting features from: {:?}", input);

    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        log::info!("[mRMR::Select] Using config: {:?}", config_path);
        load_selection_config(config_path)?
    } else {
        SelectionConfig::default()
    };

    if let Some(&threshold) = matches.get_one::<f64>("threshold") {
        config.threshold = if threshold == f64::INFINITY {
            None
        } else {
            Some(threshold)
        };
    }
    if matches.get_flag("no_discretize") {
        config.threshold = None;
    }
    if let Some(&n_features) = matches.get_one::<usize>("n_features") {
        config.n_features = n_features;
    }
    if let Some(method) = matches.get_one::<String>("method") {
        config.method = MrmrMethod::from_str(method).map_err(anyhow::Error::msg)?;
    }

    let result = match run_selection(input, &config) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Selection failed: {:#}", e);
            std::process::exit(1)
        }
    };
    let format = if matches.get_flag("json") {
        OutputFormat::Json
    } else if matches.get_flag("scores") {
        OutputFormat::Scores
    } else {
        OutputFormat::Indices
    };
    write_selection_output(
        &result,
        format,
        matches.get_one::<PathBuf>("output_file").map(PathBuf::as_path),
    )?;
    log::info!(
        "[mRMR::Select] Selected {} of {} features ({}, {}).",
        result.steps.len(),
        result.n_features,
        config.method,
        config.discretization().threshold().map_or_else(
            || "no discretization".to_string(),
            |t| format!("threshold {}", t)
        )
    );
    Ok(())
}

fn handle_summary(matches: &ArgMatches) -> Result<()> {
    let input: &PathBuf = matches.get_one("input").unwrap();
    let dataset = match load_dataset(input) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Loading failed: {:#}", e);
            std::process::exit(1)
        }
    };
    print!("{}", dataset);
    Ok(())
}
