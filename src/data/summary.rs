use std::collections::BTreeMap;

use super::filter::{select, Condition, RowFilter};
use super::model::{Algorithm, Family, Metric, MetricGroup, ResultTable};
use super::pivot::{MedianPivot, RuntimePivot, RATIO_FAMILIES};
use super::stats::FacetSummary;

/// Families on the single-source runtime plot, in hue order.
pub const RUNTIME_FAMILIES: [Family; 3] = [Family::Ogive, Family::AuxIva, Family::OverIva];

/// Everything the figures and the viewer need for one condition.
#[derive(Debug, Clone)]
pub struct ConditionSummary {
    pub condition: Condition,
    pub n_rows: usize,
    pub sources: Vec<u32>,
    pub mics: Vec<u32>,
    pub algorithms: Vec<Algorithm>,
    pub boxes: FacetSummary,
    pub medians: BTreeMap<MetricGroup, MedianPivot>,
    pub runtime: RuntimePivot,
}

impl ConditionSummary {
    pub fn build(table: &ResultTable, condition: Condition) -> Self {
        let rows = select(table, &RowFilter::condition(condition));

        let mut sources: Vec<u32> = rows.iter().map(|r| r.sources).collect();
        sources.sort_unstable();
        sources.dedup();
        let mut mics: Vec<u32> = rows.iter().map(|r| r.mics).collect();
        mics.sort_unstable();
        mics.dedup();
        let mut algorithms: Vec<Algorithm> = rows.iter().map(|r| r.algorithm.clone()).collect();
        algorithms.sort();
        algorithms.dedup();

        let medians = MetricGroup::ALL
            .iter()
            .map(|&g| (g, MedianPivot::from_rows(&rows, g.metrics())))
            .collect();

        ConditionSummary {
            condition,
            n_rows: rows.len(),
            sources,
            mics,
            algorithms,
            boxes: FacetSummary::build(&rows, &Metric::ALL),
            medians,
            runtime: RuntimePivot::from_rows(rows.iter().copied()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Median runtime against mic count for single-source runs.
    pub fn single_source_runtime(&self, family: &Family) -> Vec<(u32, f64)> {
        self.runtime
            .grid(family)
            .map(|grid| {
                grid.iter()
                    .filter(|((src, _), v)| *src == 1 && v.is_finite())
                    .map(|(&(_, mic), &v)| (mic, v))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Median runtime ratios to AuxIVA, one series per compared family.
    pub fn ratios(&self) -> Vec<(Family, Vec<[f64; 2]>)> {
        RATIO_FAMILIES
            .iter()
            .map(|f| (f.clone(), self.runtime.ratio(f, &Family::AuxIva)))
            .collect()
    }
}
