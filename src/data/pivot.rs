use std::collections::BTreeMap;
use std::io;

use super::model::{AggregatedRow, Algorithm, Family, Metric};
use super::stats::median;

// ---------------------------------------------------------------------------
// Runtime ratio of medians
// ---------------------------------------------------------------------------

/// Median runtime per `(sources, mics)` for one algorithm family.
pub type MedianGrid = BTreeMap<(u32, u32), f64>;

/// Compare two median grids point by point.
///
/// Emits `[sources / mics, comparison / baseline]` for every coordinate
/// where both grids hold a finite median, sorted by the first coordinate.
/// Ties keep `(sources, mics)` order.
pub fn proc_ratio(baseline: &MedianGrid, comparison: &MedianGrid) -> Vec<[f64; 2]> {
    let mut pts: Vec<[f64; 2]> = baseline
        .iter()
        .filter_map(|(&(src, mic), &base)| {
            let cmp = *comparison.get(&(src, mic))?;
            if !base.is_finite() || !cmp.is_finite() {
                return None;
            }
            let ratio = cmp / base;
            ratio
                .is_finite()
                .then_some([src as f64 / mic as f64, ratio])
        })
        .collect();
    pts.sort_by(|a, b| a[0].total_cmp(&b[0]));
    pts
}

/// Median of `Runtime [s]` per algorithm family, sources and mics.
#[derive(Debug, Clone, Default)]
pub struct RuntimePivot {
    grids: BTreeMap<Family, MedianGrid>,
}

impl RuntimePivot {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a AggregatedRow>,
    {
        let mut cells: BTreeMap<Family, BTreeMap<(u32, u32), Vec<f64>>> = BTreeMap::new();
        for row in rows {
            cells
                .entry(row.algorithm.family())
                .or_default()
                .entry((row.sources, row.mics))
                .or_default()
                .push(row.runtime);
        }

        let grids = cells
            .into_iter()
            .map(|(family, cell)| {
                let grid = cell.into_iter().map(|(k, v)| (k, median(v))).collect();
                (family, grid)
            })
            .collect();
        RuntimePivot { grids }
    }

    pub fn grid(&self, family: &Family) -> Option<&MedianGrid> {
        self.grids.get(family)
    }

    /// `proc_ratio` of `comparison` against `baseline`; empty when either
    /// family has no rows.
    pub fn ratio(&self, comparison: &Family, baseline: &Family) -> Vec<[f64; 2]> {
        match (self.grid(baseline), self.grid(comparison)) {
            (Some(b), Some(c)) => proc_ratio(b, c),
            _ => Vec::new(),
        }
    }
}

/// The comparisons drawn on the runtime-ratio figure, against AuxIVA.
pub const RATIO_FAMILIES: [Family; 3] = [Family::OverIva, Family::PcaAuxIva, Family::Ogive];

// ---------------------------------------------------------------------------
// Median pivot table (CSV export)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MedianPivotRow {
    pub algorithm: Algorithm,
    pub sources: u32,
    pub rt60: f64,
    pub sinr: f64,
    pub metric: Metric,
    /// One median per entry of [`MedianPivot::mics`]; NaN when absent.
    pub values: Vec<f64>,
}

/// Medians indexed by (algorithm, sources, RT60, SINR, metric) with one
/// column per microphone count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedianPivot {
    pub mics: Vec<u32>,
    pub rows: Vec<MedianPivotRow>,
}

impl MedianPivot {
    /// Rows are expected to share one condition; the RT60/SINR index
    /// columns are copied from the first row of each group.
    pub fn from_rows(rows: &[&AggregatedRow], metrics: &[Metric]) -> Self {
        type Key = (Algorithm, u32, Metric);
        let mut cells: BTreeMap<Key, ((f64, f64), BTreeMap<u32, Vec<f64>>)> = BTreeMap::new();

        for row in rows {
            for &metric in metrics {
                cells
                    .entry((row.algorithm.clone(), row.sources, metric))
                    .or_insert_with(|| ((row.rt60, row.sinr), BTreeMap::new()))
                    .1
                    .entry(row.mics)
                    .or_default()
                    .push(metric.value(row));
            }
        }

        let mut mics: Vec<u32> = rows.iter().map(|r| r.mics).collect();
        mics.sort_unstable();
        mics.dedup();

        let rows = cells
            .into_iter()
            .map(|((algorithm, sources, metric), ((rt60, sinr), by_mic))| {
                let values = mics
                    .iter()
                    .map(|m| by_mic.get(m).map_or(f64::NAN, |v| median(v.iter().copied())))
                    .collect();
                MedianPivotRow {
                    algorithm,
                    sources,
                    rt60,
                    sinr,
                    metric,
                    values,
                }
            })
            .collect();

        MedianPivot { mics, rows }
    }

    /// Write as CSV. Missing medians are empty cells.
    pub fn write_csv<W: io::Write>(&self, out: W) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(out);

        let mut header: Vec<String> = ["Algorithm", "Sources", "RT60", "SINR", "metric"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(self.mics.iter().map(|m| m.to_string()));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.algorithm.label().to_string(),
                row.sources.to_string(),
                row.rt60.to_string(),
                row.sinr.to_string(),
                row.metric.column().to_string(),
            ];
            record.extend(row.values.iter().map(|v| {
                if v.is_nan() {
                    String::new()
                } else {
                    v.to_string()
                }
            }));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
