use anyhow::{Context, Result};

use crate::config::RunConfig;
use crate::data::aggregate::{aggregate, AggregationReport};
use crate::data::cache::{read_cache, write_cache};
use crate::data::filter::Condition;
use crate::data::loader::{scan_run_dirs, RunSet};
use crate::data::model::ResultTable;
use crate::render;

/// Inputs resolved and the aggregated table ready for plotting.
#[derive(Debug)]
pub struct Prepared {
    pub runs: RunSet,
    pub table: ResultTable,
    /// `None` when the table came from the cache.
    pub report: Option<AggregationReport>,
}

impl Prepared {
    /// Every (RT60, SINR) listed in the parameters.
    pub fn conditions(&self) -> Vec<Condition> {
        Condition::grid(&self.runs.rt60_list(), &self.runs.sinr_list())
    }
}

/// Read the run directories and build (or restore) the aggregated table.
pub fn prepare(cfg: &RunConfig) -> Result<Prepared> {
    let runs = scan_run_dirs(&cfg.dirs)?;

    if cfg.use_cache {
        if cfg.cache_path.is_file() {
            log::info!("Reading existing cache file...");
            let table = read_cache(&cfg.cache_path)
                .with_context(|| format!("reading cache {}", cfg.cache_path.display()))?;
            return Ok(Prepared {
                runs,
                table,
                report: None,
            });
        }
        log::info!(
            "No cache at {}, rebuilding the table",
            cfg.cache_path.display()
        );
    }

    let records = runs.load_records()?;
    log::info!("Building table from {} records", records.len());
    let agg = aggregate(&records, runs.sample_rate());
    agg.report.log_summary();

    write_cache(&cfg.cache_path, &agg.table)
        .with_context(|| format!("writing cache {}", cfg.cache_path.display()))?;

    Ok(Prepared {
        runs,
        table: agg.table,
        report: Some(agg.report),
    })
}

/// Full invocation: prepare, write the figures, optionally show them.
pub fn run(cfg: &RunConfig) -> Result<()> {
    let prepared = prepare(cfg)?;
    let summaries = render::summarize(&prepared.table, &prepared.conditions());

    let labels = prepared.runs.labels();
    let fig_dir = cfg.figure_dir(labels);
    log::info!("Plotting...");
    render::render_all(&fig_dir, &summaries)?;

    if cfg.show {
        crate::app::run_viewer(labels.name.clone(), summaries)
            .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))?;
    }
    Ok(())
}
