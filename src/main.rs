use anyhow::{Context, Result};
use clap::Parser;
use regrank::cli::{Cli, OutputFormat};
use regrank::ranking::{self, RankingConfig, ScoreGroups};
use regrank::{inputs, plot_data, report, RankError};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG (default warn)
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge file configuration with CLI overrides
fn load_config(args: &Cli) -> Result<RankingConfig> {
    let mut config = match &args.config {
        Some(path) => RankingConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RankingConfig::default(),
    };

    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }

    config.validate()?;
    Ok(config)
}

/// Fail before writing anything if any output location is already taken
fn ensure_outputs_free(paths: &[&Path]) -> Result<()> {
    if let Some(taken) = paths.iter().find(|p| p.exists()) {
        return Err(RankError::OutputCollision {
            path: taken.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;

    let samples = inputs::load_auc_table(&args.aucs)?;
    let baselines = inputs::load_baseline_table(&args.normfile)?;
    let targets = match &args.target {
        Some(path) => inputs::load_target_list(path)?,
        None => Vec::new(),
    };

    let groups = ScoreGroups::from_samples(&samples, config.delimiter);
    let table = ranking::rank_groups(&groups, &baselines, &config)?;

    let report_path = args
        .outdir
        .join(format!("{}{}", args.prefix, config.report_suffix));
    let json_path = args.outdir.join(format!("{}_statistics.json", args.prefix));
    let plot_dir = plot_data::plot_dir(&args.outdir, &args.prefix);

    let mut planned: Vec<&Path> = Vec::new();
    if !args.stdout {
        planned.push(&report_path);
        if args.format == OutputFormat::Json {
            planned.push(&json_path);
        }
    }
    if !targets.is_empty() {
        planned.push(&plot_dir);
    }
    ensure_outputs_free(&planned)?;

    let plots = plot_data::build_plot_data(&table, &groups, &targets, &config);

    // All computation has succeeded; everything below only writes
    if args.stdout {
        print!("{}", report::render(&table));
    } else {
        std::fs::create_dir_all(&args.outdir).with_context(|| {
            format!("Failed to create output directory {}", args.outdir.display())
        })?;
        report::write_report(&table, &report_path)?;

        if args.format == OutputFormat::Json {
            report::write_statistics_json(&table, &json_path)?;
        }

        println!("--Standardization finished!");
        println!("--Ranked factors saved in file: {}", report_path.display());
    }

    if !targets.is_empty() {
        let written = plot_data::write_plot_data(&plots, &plot_dir)?;
        tracing::info!(
            "Wrote plot data for {} targets to {}",
            written.len(),
            plot_dir.display()
        );
    }

    Ok(())
}
