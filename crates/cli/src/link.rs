//! `custlink run|validate|score`: config-driven ERP to broker linkage.

use std::path::{Path, PathBuf};

use custlink_linkage::config::LinkConfig;
use custlink_linkage::engine::matched_csv;
use custlink_linkage::model::{LinkInput, Source};
use custlink_linkage::normalize::normalize_name;
use custlink_linkage::similarity::token_set_ratio;
use custlink_linkage::tabular::read_collection;
use custlink_linkage::{Collection, LinkError, LinkReport};

use crate::exit_codes::{link_exit_code, EXIT_LINK_IO};
use crate::CliError;

/// Flags accepted by `custlink run`.
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub erp: Option<PathBuf>,
    pub broker: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub json: bool,
    pub report: Option<PathBuf>,
    pub parallel: bool,
    pub no_index: bool,
}

fn link_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

impl From<LinkError> for CliError {
    fn from(err: LinkError) -> Self {
        log::debug!("link error: {}", err.kind());
        let hint = match &err {
            LinkError::MissingColumn { .. } => {
                Some("map the column under [erp.columns] or [broker.columns]".to_string())
            }
            LinkError::EmptyBrokerCollection => {
                Some("the broker file has a header but no rows".to_string())
            }
            _ => None,
        };
        CliError { code: link_exit_code(&err), message: err.to_string(), hint }
    }
}

/// Resolved file locations for one run.
struct RunPaths {
    erp: PathBuf,
    broker: PathBuf,
    out: PathBuf,
    report: Option<PathBuf>,
}

fn io_err(action: &str, path: &Path, e: std::io::Error) -> LinkError {
    LinkError::Io(format!("cannot {action} {}: {e}", path.display()))
}

fn load_config(path: &Path) -> Result<LinkConfig, CliError> {
    let config_str =
        std::fs::read_to_string(path).map_err(|e| io_err("read config", path, e))?;
    Ok(LinkConfig::from_toml(&config_str)?)
}

/// Config paths resolve against the config file's directory, flag paths
/// against the working directory.
fn resolve_paths(args: &RunArgs, config: &LinkConfig) -> RunPaths {
    let base_dir = args
        .config
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let pick = |flag: &Option<PathBuf>, configured: &str| {
        flag.clone().unwrap_or_else(|| base_dir.join(configured))
    };
    RunPaths {
        erp: pick(&args.erp, &config.erp.file),
        broker: pick(&args.broker, &config.broker.file),
        out: pick(&args.out, &config.output.file),
        report: args
            .report
            .clone()
            .or_else(|| config.output.report.as_ref().map(|r| base_dir.join(r))),
    }
}

fn read_source(source: Source, path: &Path, config: &LinkConfig) -> Result<Collection, CliError> {
    let columns = match source {
        Source::Erp => &config.erp.columns,
        Source::Broker => &config.broker.columns,
    };
    let csv_data = std::fs::read_to_string(path).map_err(|e| io_err("read", path, e))?;
    Ok(read_collection(source, &csv_data, columns)?)
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => LinkConfig::default(),
    };
    if args.parallel {
        config.parallel = true;
    }
    if args.no_index {
        config.output.index_column = false;
    }

    let paths = resolve_paths(&args, &config);
    log::info!(
        "linking {} against {}",
        paths.erp.display(),
        paths.broker.display()
    );

    let input = LinkInput {
        erp: read_source(Source::Erp, &paths.erp, &config)?,
        broker: read_source(Source::Broker, &paths.broker, &config)?,
    };

    let report = custlink_linkage::run(&config, &input)?;

    // Both outputs are rendered before any file is touched; a failed report
    // write removes the matched CSV again.
    let csv = matched_csv(&report, config.output.index_column)?;
    let json_str = if args.json || paths.report.is_some() {
        Some(
            serde_json::to_string_pretty(&report)
                .map_err(|e| link_err(EXIT_LINK_IO, format!("JSON serialization error: {e}")))?,
        )
    } else {
        None
    };

    std::fs::write(&paths.out, csv).map_err(|e| io_err("write", &paths.out, e))?;

    if let (Some(path), Some(json_str)) = (&paths.report, &json_str) {
        if let Err(e) = std::fs::write(path, json_str) {
            if let Err(cleanup) = std::fs::remove_file(&paths.out) {
                log::warn!("cannot remove {}: {cleanup}", paths.out.display());
            }
            return Err(io_err("write report", path, e).into());
        }
    }

    eprintln!("wrote {}", paths.out.display());
    if let Some(ref path) = paths.report {
        eprintln!("wrote {}", path.display());
    }
    if args.json {
        if let Some(json_str) = &json_str {
            println!("{json_str}");
        }
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &LinkReport) {
    let s = &report.summary;
    eprintln!(
        "linked {} of {} ERP records against {} broker records ({} blocked, {} fallback)",
        s.linked, s.erp_records, s.broker_records, s.blocked, s.fallback,
    );
    eprintln!(
        "exact matches: {}, tied: {}, distinct broker records: {}, mean score: {:.1}",
        s.exact_matches, s.tied, s.distinct_broker_records, s.mean_score,
    );
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "{}: ok ({} -> {}, output {})",
        config.name, config.erp.file, config.broker.file, config.output.file
    );
    Ok(())
}

pub fn cmd_score(left: String, right: String, json: bool) -> Result<(), CliError> {
    let left_norm = normalize_name(&left);
    let right_norm = normalize_name(&right);
    let score = token_set_ratio(&left_norm, &right_norm);

    if json {
        let value = serde_json::json!({
            "left": left_norm,
            "right": right_norm,
            "score": score,
        });
        let json_str = serde_json::to_string_pretty(&value)
            .map_err(|e| link_err(EXIT_LINK_IO, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        println!("{score}");
    }
    Ok(())
}
