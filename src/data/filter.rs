use super::model::{AggregatedRow, ResultTable};

// ---------------------------------------------------------------------------
// Condition – one (RT60, SINR) experimental setting
// ---------------------------------------------------------------------------

/// One experimental condition. Figures are produced per condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub rt60: f64,
    pub sinr: f64,
}

impl Condition {
    /// Every (rt60, sinr) pair, RT60-major.
    pub fn grid(rt60_list: &[f64], sinr_list: &[f64]) -> Vec<Condition> {
        rt60_list
            .iter()
            .flat_map(|&rt60| sinr_list.iter().map(move |&sinr| Condition { rt60, sinr }))
            .collect()
    }

    /// RT60 in whole milliseconds (truncated).
    pub fn rt60_ms(&self) -> i64 {
        (self.rt60 * 1000.0) as i64
    }

    /// Output file stem, e.g. `RT60_300ms_SINR_10_runtime`. Whole SINR
    /// values print without a fractional part.
    pub fn file_stem(&self, what: &str) -> String {
        format!("RT60_{}ms_SINR_{}_{what}", self.rt60_ms(), self.sinr)
    }

    pub fn label(&self) -> String {
        format!("RT60 = {} ms, SINR = {} dB", self.rt60_ms(), self.sinr)
    }
}

// ---------------------------------------------------------------------------
// Row filter
// ---------------------------------------------------------------------------

/// Constraints on the categorical columns. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowFilter {
    pub rt60: Option<f64>,
    pub sinr: Option<f64>,
    pub sources: Option<u32>,
}

impl RowFilter {
    pub fn condition(cond: Condition) -> Self {
        Self {
            rt60: Some(cond.rt60),
            sinr: Some(cond.sinr),
            sources: None,
        }
    }

    pub fn with_sources(mut self, sources: u32) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn matches(&self, row: &AggregatedRow) -> bool {
        self.rt60.map_or(true, |v| row.rt60 == v)
            && self.sinr.map_or(true, |v| row.sinr == v)
            && self.sources.map_or(true, |v| row.sources == v)
    }
}

/// Return indices of rows that pass the filter.
pub fn filtered_indices(table: &ResultTable, filter: &RowFilter) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(row))
        .map(|(i, _)| i)
        .collect()
}

/// Rows that pass the filter, in table order.
pub fn select<'a>(table: &'a ResultTable, filter: &RowFilter) -> Vec<&'a AggregatedRow> {
    table.rows.iter().filter(|row| filter.matches(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Algorithm;

    fn row(rt60: f64, sinr: f64, sources: u32) -> AggregatedRow {
        AggregatedRow {
            algorithm: Algorithm::AuxIvaLaplace,
            sources,
            mics: 4,
            rt60,
            sinr,
            seed: 0,
            runtime: 1.0,
            sdr: 0.0,
            sir: 0.0,
            sdr_improvement: 0.0,
            sir_improvement: 0.0,
        }
    }

    #[test]
    fn filters_on_condition_and_sources() {
        let table = ResultTable::new(vec![
            row(0.3, 10.0, 1),
            row(0.3, 5.0, 1),
            row(0.3, 10.0, 2),
            row(0.6, 10.0, 1),
        ]);
        let cond = Condition { rt60: 0.3, sinr: 10.0 };

        assert_eq!(filtered_indices(&table, &RowFilter::condition(cond)), vec![0, 2]);
        assert_eq!(
            filtered_indices(&table, &RowFilter::condition(cond).with_sources(2)),
            vec![2]
        );
        assert_eq!(filtered_indices(&table, &RowFilter::default()).len(), 4);
    }

    #[test]
    fn file_stem_uses_truncated_milliseconds() {
        let cond = Condition { rt60: 0.3, sinr: 5.0 };
        assert_eq!(cond.file_stem("runtime"), "RT60_300ms_SINR_5_runtime");
        let cond = Condition { rt60: 0.0, sinr: 10.0 };
        assert_eq!(cond.file_stem("raw"), "RT60_0ms_SINR_10_raw");
        let cond = Condition { rt60: 0.25, sinr: 2.5 };
        assert_eq!(cond.file_stem("raw"), "RT60_250ms_SINR_2.5_raw");
    }

    #[test]
    fn grid_is_rt60_major() {
        let grid = Condition::grid(&[0.0, 0.3], &[5.0, 10.0]);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[1], Condition { rt60: 0.0, sinr: 10.0 });
        assert_eq!(grid[2], Condition { rt60: 0.3, sinr: 5.0 });
    }
}
