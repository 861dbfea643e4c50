use std::collections::BTreeMap;

use super::model::{AggregatedRow, Algorithm, Metric};

/// Median of the non-NaN values; NaN when there are none.
pub fn median<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut v: Vec<f64> = values.into_iter().filter(|x| !x.is_nan()).collect();
    if v.is_empty() {
        return f64::NAN;
    }
    v.sort_by(f64::total_cmp);
    quantile_sorted(&v, 0.5)
}

/// Quantile of sorted data with linear interpolation between order
/// statistics. `sorted` must be non-empty.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Box-plot statistics
// ---------------------------------------------------------------------------

/// Tukey box: quartiles, whiskers at the most extreme data within
/// 1.5 IQR of the box, and everything beyond as outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when no finite value is present.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut v: Vec<f64> = values.into_iter().filter(|x| x.is_finite()).collect();
        if v.is_empty() {
            return None;
        }
        v.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&v, 0.25);
        let median = quantile_sorted(&v, 0.5);
        let q3 = quantile_sorted(&v, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let inside = v.iter().copied().filter(|x| *x >= lo_fence && *x <= hi_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = v
            .iter()
            .copied()
            .filter(|x| *x < lo_fence || *x > hi_fence)
            .collect();

        Some(BoxStats {
            count: v.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Smallest and largest value drawn, outliers included.
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.outliers.iter().copied().fold(self.lower_whisker, f64::min);
        let hi = self.outliers.iter().copied().fold(self.upper_whisker, f64::max);
        (lo, hi)
    }
}

// ---------------------------------------------------------------------------
// Facet summary – one box per (metric, sources, mics, algorithm)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FacetKey {
    pub metric: Metric,
    pub sources: u32,
    pub mics: u32,
    pub algorithm: Algorithm,
}

/// Box statistics of a set of rows split by facet.
#[derive(Debug, Clone, Default)]
pub struct FacetSummary {
    pub boxes: BTreeMap<FacetKey, BoxStats>,
}

impl FacetSummary {
    pub fn build(rows: &[&AggregatedRow], metrics: &[Metric]) -> Self {
        let mut groups: BTreeMap<FacetKey, Vec<f64>> = BTreeMap::new();
        for row in rows {
            for &metric in metrics {
                groups
                    .entry(FacetKey {
                        metric,
                        sources: row.sources,
                        mics: row.mics,
                        algorithm: row.algorithm.clone(),
                    })
                    .or_default()
                    .push(metric.value(row));
            }
        }

        let boxes = groups
            .into_iter()
            .filter_map(|(key, values)| BoxStats::from_values(values).map(|b| (key, b)))
            .collect();
        FacetSummary { boxes }
    }

    pub fn get(&self, key: &FacetKey) -> Option<&BoxStats> {
        self.boxes.get(key)
    }

    /// Value range covered by the boxes of one metric.
    pub fn metric_extent(&self, metric: Metric) -> Option<(f64, f64)> {
        self.boxes
            .iter()
            .filter(|(k, _)| k.metric == metric)
            .map(|(_, b)| b.extent())
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_skips_nan() {
        assert_eq!(median([3.0, f64::NAN, 1.0, 2.0]), 2.0);
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median([f64::NAN]).is_nan());
        assert!(median(std::iter::empty()).is_nan());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.25), 1.75);
        assert_eq!(quantile_sorted(&v, 0.75), 3.25);
        assert_eq!(quantile_sorted(&v, 0.0), 1.0);
        assert_eq!(quantile_sorted(&v, 1.0), 4.0);
    }

    #[test]
    fn box_separates_outliers() {
        let b = BoxStats::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(b.count, 6);
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(b.extent(), (1.0, 100.0));
    }

    #[test]
    fn box_ignores_non_finite_values() {
        assert!(BoxStats::from_values([f64::NAN, f64::INFINITY]).is_none());
        let b = BoxStats::from_values([f64::NAN, 2.0]).unwrap();
        assert_eq!((b.count, b.median), (1, 2.0));
    }

    #[test]
    fn facets_group_by_sources_mics_and_algorithm() {
        let base = AggregatedRow {
            algorithm: Algorithm::AuxIvaLaplace,
            sources: 1,
            mics: 2,
            rt60: 0.3,
            sinr: 10.0,
            seed: 0,
            runtime: 1.0,
            sdr: 5.0,
            sir: 6.0,
            sdr_improvement: 1.0,
            sir_improvement: 2.0,
        };
        let mut other = base.clone();
        other.runtime = 3.0;
        let mut over = base.clone();
        over.algorithm = Algorithm::OverIvaLaplace;

        let rows = vec![&base, &other, &over];
        let summary = FacetSummary::build(&rows, &[Metric::Runtime]);
        assert_eq!(summary.boxes.len(), 2);

        let key = FacetKey {
            metric: Metric::Runtime,
            sources: 1,
            mics: 2,
            algorithm: Algorithm::AuxIvaLaplace,
        };
        assert_eq!(summary.get(&key).unwrap().median, 2.0);
        assert_eq!(summary.metric_extent(Metric::Runtime), Some((1.0, 3.0)));
        assert_eq!(summary.metric_extent(Metric::Sdr), None);
    }
}
