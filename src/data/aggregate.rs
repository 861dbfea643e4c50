use thiserror::Error;

use super::model::{AggregatedRow, ResultTable, RunRecord};

/// Why a record could not be turned into a table row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{metric} has no iterations")]
    EmptyIterations { metric: &'static str },

    #[error("{metric} has no per-source values")]
    EmptySources { metric: &'static str },

    #[error("{metric} initial has {initial} sources but final has {last}")]
    ShapeMismatch {
        metric: &'static str,
        initial: usize,
        last: usize,
    },

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

/// Mean over sources of the final iteration, and of final minus initial.
fn final_and_improvement(
    metric: &'static str,
    iterations: &[Vec<f64>],
) -> Result<(f64, f64), RecordError> {
    let (initial, last) = match (iterations.first(), iterations.last()) {
        (Some(i), Some(l)) => (i, l),
        _ => return Err(RecordError::EmptyIterations { metric }),
    };
    if initial.is_empty() || last.is_empty() {
        return Err(RecordError::EmptySources { metric });
    }
    if initial.len() != last.len() {
        return Err(RecordError::ShapeMismatch {
            metric,
            initial: initial.len(),
            last: last.len(),
        });
    }

    let n = last.len() as f64;
    let mean_final = last.iter().sum::<f64>() / n;
    let improvement = last
        .iter()
        .zip(initial)
        .map(|(f, i)| f - i)
        .sum::<f64>()
        / n;
    Ok((mean_final, improvement))
}

impl AggregatedRow {
    /// Derive a table row from a raw record.
    ///
    /// `fs` is the sampling rate used to turn the runtime into a real-time
    /// factor. NaN values propagate into the row; zero counts and structural
    /// problems with `sdr` / `sir` are errors.
    pub fn from_record(record: &RunRecord, fs: f64) -> Result<Self, RecordError> {
        for (field, value) in [
            ("n_targets", u64::from(record.n_targets)),
            ("n_mics", u64::from(record.n_mics)),
            ("n_samples", record.n_samples),
        ] {
            if value == 0 {
                return Err(RecordError::NonPositive { field });
            }
        }
        let (sdr, sdr_improvement) = final_and_improvement("SDR", &record.sdr)?;
        let (sir, sir_improvement) = final_and_improvement("SIR", &record.sir)?;

        Ok(AggregatedRow {
            algorithm: record.algorithm.clone(),
            sources: record.n_targets,
            mics: record.n_mics,
            rt60: record.rt60,
            sinr: record.sinr,
            seed: record.seed,
            runtime: record.runtime / record.n_samples as f64 * fs,
            sdr,
            sir,
            sdr_improvement,
            sir_improvement,
        })
    }
}

// ---------------------------------------------------------------------------
// Table construction
// ---------------------------------------------------------------------------

/// Counts gathered while building the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationReport {
    pub total: usize,
    pub nan_runtime: usize,
    pub nan_sdr: usize,
    pub nan_sir: usize,
    /// Input index and reason of every record left out of the table.
    pub dropped: Vec<(usize, RecordError)>,
}

impl AggregationReport {
    pub fn kept(&self) -> usize {
        self.total - self.dropped.len()
    }

    pub fn log_summary(&self) {
        log::info!(
            "Aggregated {} of {} records ({} NaN runtimes, {} NaN SDR, {} NaN SIR)",
            self.kept(),
            self.total,
            self.nan_runtime,
            self.nan_sdr,
            self.nan_sir
        );
        if !self.dropped.is_empty() {
            log::warn!("Dropped {} malformed records", self.dropped.len());
            for (idx, err) in &self.dropped {
                log::debug!("  record {idx}: {err}");
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub table: ResultTable,
    pub report: AggregationReport,
}

fn final_has_nan(iterations: &[Vec<f64>]) -> bool {
    iterations
        .last()
        .is_some_and(|last| last.iter().any(|v| v.is_nan()))
}

/// Build the aggregated table, one row per valid record, in input order.
pub fn aggregate(records: &[RunRecord], fs: f64) -> Aggregation {
    let mut report = AggregationReport {
        total: records.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        if record.runtime.is_nan() {
            log::warn!("NaN runtime: {}", record.algorithm.id());
            report.nan_runtime += 1;
        }
        if final_has_nan(&record.sdr) {
            log::warn!("NaN SDR: {}", record.algorithm.id());
            report.nan_sdr += 1;
        }
        if final_has_nan(&record.sir) {
            log::warn!("NaN SIR: {}", record.algorithm.id());
            report.nan_sir += 1;
        }

        match AggregatedRow::from_record(record, fs) {
            Ok(row) => rows.push(row),
            Err(err) => report.dropped.push((idx, err)),
        }
    }

    Aggregation {
        table: ResultTable::new(rows),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Algorithm;

    fn record(algorithm: Algorithm, sdr: Vec<Vec<f64>>, sir: Vec<Vec<f64>>) -> RunRecord {
        RunRecord {
            algorithm,
            n_targets: 2,
            n_mics: 4,
            rt60: 0.3,
            sinr: 10.0,
            seed: 42,
            runtime: 2.0,
            n_samples: 16000,
            sdr,
            sir,
        }
    }

    fn well_formed() -> RunRecord {
        record(
            Algorithm::OverIvaLaplace,
            vec![vec![1.0, 3.0], vec![4.0, 4.0], vec![6.0, 10.0]],
            vec![vec![0.0, 2.0], vec![9.0, 13.0]],
        )
    }

    #[test]
    fn improvement_is_mean_final_minus_mean_initial() {
        let rec = well_formed();
        let row = AggregatedRow::from_record(&rec, 16000.0).unwrap();

        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        let sdr_i = mean(&rec.sdr[0]);
        let sdr_f = mean(&rec.sdr[2]);
        assert!((row.sdr - sdr_f).abs() < 1e-12);
        assert!((row.sdr_improvement - (sdr_f - sdr_i)).abs() < 1e-12);
        assert!((row.sir - 11.0).abs() < 1e-12);
        assert!((row.sir_improvement - 10.0).abs() < 1e-12);
    }

    #[test]
    fn runtime_is_normalised_by_audio_length() {
        let rec = well_formed();
        let row = AggregatedRow::from_record(&rec, 16000.0).unwrap();
        assert!((row.runtime - 2.0).abs() < 1e-12);

        let row = AggregatedRow::from_record(&rec, 8000.0).unwrap();
        assert!((row.runtime - 1.0).abs() < 1e-12);
    }

    #[test]
    fn copies_identifier_columns() {
        let row = AggregatedRow::from_record(&well_formed(), 16000.0).unwrap();
        assert_eq!(row.algorithm, Algorithm::OverIvaLaplace);
        assert_eq!((row.sources, row.mics, row.seed), (2, 4, 42));
        assert_eq!((row.rt60, row.sinr), (0.3, 10.0));
    }

    #[test]
    fn empty_sdr_drops_exactly_that_record() {
        let mut bad = well_formed();
        bad.sdr.clear();
        let records = vec![well_formed(), bad, well_formed()];

        let agg = aggregate(&records, 16000.0);
        assert_eq!(agg.table.len(), 2);
        assert_eq!(agg.report.kept(), 2);
        assert_eq!(
            agg.report.dropped,
            vec![(1, RecordError::EmptyIterations { metric: "SDR" })]
        );

        let expected = AggregatedRow::from_record(&well_formed(), 16000.0).unwrap();
        assert!(agg.table.rows.iter().all(|r| *r == expected));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let rec = record(
            Algorithm::AuxIvaGauss,
            vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]],
            vec![vec![1.0]],
        );
        assert_eq!(
            AggregatedRow::from_record(&rec, 16000.0),
            Err(RecordError::ShapeMismatch {
                metric: "SDR",
                initial: 2,
                last: 3
            })
        );

        let rec = record(Algorithm::AuxIvaGauss, vec![vec![1.0]], vec![vec![]]);
        assert_eq!(
            AggregatedRow::from_record(&rec, 16000.0),
            Err(RecordError::EmptySources { metric: "SIR" })
        );
    }

    #[test]
    fn nan_values_warn_but_keep_the_record() {
        let mut rec = well_formed();
        rec.runtime = f64::NAN;
        rec.sir[1][0] = f64::NAN;

        let agg = aggregate(&[rec], 16000.0);
        assert_eq!(agg.table.len(), 1);
        assert_eq!(agg.report.nan_runtime, 1);
        assert_eq!(agg.report.nan_sir, 1);
        assert_eq!(agg.report.nan_sdr, 0);
        assert!(agg.table.rows[0].runtime.is_nan());
        assert!(agg.table.rows[0].sir.is_nan());
    }

    #[test]
    fn zero_counts_are_rejected() {
        let mut rec = well_formed();
        rec.n_samples = 0;
        assert_eq!(
            AggregatedRow::from_record(&rec, 16000.0),
            Err(RecordError::NonPositive { field: "n_samples" })
        );

        let mut no_mics = well_formed();
        no_mics.n_mics = 0;
        let mut no_targets = well_formed();
        no_targets.n_targets = 0;

        let agg = aggregate(&[no_mics, well_formed(), no_targets], 16000.0);
        assert_eq!(agg.table.len(), 1);
        assert!(agg.table.rows[0].runtime.is_finite());
        assert_eq!(
            agg.report.dropped,
            vec![
                (0, RecordError::NonPositive { field: "n_mics" }),
                (2, RecordError::NonPositive { field: "n_targets" }),
            ]
        );
    }

    #[test]
    fn single_iteration_has_zero_improvement() {
        let rec = record(Algorithm::OgiveGauss, vec![vec![3.0]], vec![vec![-1.0]]);
        let row = AggregatedRow::from_record(&rec, 16000.0).unwrap();
        assert_eq!(row.sdr_improvement, 0.0);
        assert_eq!(row.sir, -1.0);
    }
}
