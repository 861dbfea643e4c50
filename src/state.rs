use crate::data::model::{Metric, MetricGroup};
use crate::data::summary::ConditionSummary;
use crate::render::Palettes;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Boxes(MetricGroup),
    RuntimeMedian,
    RuntimeRatio,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Boxes(MetricGroup::Improvements),
        View::Boxes(MetricGroup::Raw),
        View::Boxes(MetricGroup::Runtime),
        View::RuntimeMedian,
        View::RuntimeRatio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Boxes(MetricGroup::Improvements) => "Improvements",
            View::Boxes(MetricGroup::Raw) => "Final SDR / SIR",
            View::Boxes(MetricGroup::Runtime) => "Runtime",
            View::RuntimeMedian => "Median runtime (1 source)",
            View::RuntimeRatio => "Runtime ratio to AuxIVA",
        }
    }
}

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Window heading, from the experiment name.
    pub title: String,

    /// One summary per condition, in parameter order.
    pub summaries: Vec<ConditionSummary>,

    pub palettes: Palettes,

    /// Index into `summaries`.
    pub selected: usize,

    pub view: View,

    /// Metric shown for box views (groups can hold two).
    pub metric: Metric,

    /// Sources facet shown for box views.
    pub sources: Option<u32>,
}

impl AppState {
    pub fn new(title: String, summaries: Vec<ConditionSummary>) -> Self {
        let palettes = Palettes::new(summaries.iter().flat_map(|s| s.algorithms.iter()));
        let first_non_empty = summaries.iter().position(|s| !s.is_empty()).unwrap_or(0);
        let mut state = Self {
            title,
            summaries,
            palettes,
            selected: 0,
            view: View::Boxes(MetricGroup::Improvements),
            metric: Metric::SdrImprovement,
            sources: None,
        };
        state.select_condition(first_non_empty);
        state
    }

    /// Summary of the selected condition, if any.
    pub fn current(&self) -> Option<&ConditionSummary> {
        self.summaries.get(self.selected)
    }

    pub fn select_condition(&mut self, idx: usize) {
        if idx >= self.summaries.len() {
            return;
        }
        self.selected = idx;
        // keep the facet if the new condition has it
        let available = &self.summaries[idx].sources;
        if !self.sources.is_some_and(|s| available.contains(&s)) {
            self.sources = available.first().copied();
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        if let View::Boxes(group) = view {
            if !group.metrics().contains(&self.metric) {
                self.metric = group.metrics()[0];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Condition;
    use crate::data::model::{AggregatedRow, Algorithm, ResultTable};

    fn table() -> ResultTable {
        let row = |sinr: f64, sources: u32| AggregatedRow {
            algorithm: Algorithm::AuxIvaLaplace,
            sources,
            mics: 4,
            rt60: 0.3,
            sinr,
            seed: 0,
            runtime: 1.0,
            sdr: 1.0,
            sir: 1.0,
            sdr_improvement: 1.0,
            sir_improvement: 1.0,
        };
        ResultTable::new(vec![row(5.0, 2), row(10.0, 1), row(10.0, 3)])
    }

    fn state() -> AppState {
        let t = table();
        let summaries = [0.0, 5.0, 10.0]
            .iter()
            .map(|&sinr| ConditionSummary::build(&t, Condition { rt60: 0.3, sinr }))
            .collect();
        AppState::new("test".into(), summaries)
    }

    #[test]
    fn starts_on_first_condition_with_data() {
        let s = state();
        assert_eq!(s.selected, 1);
        assert_eq!(s.sources, Some(2));
    }

    #[test]
    fn switching_condition_resets_missing_facet() {
        let mut s = state();
        s.select_condition(2);
        assert_eq!(s.sources, Some(1));
        s.sources = Some(3);
        s.select_condition(2);
        assert_eq!(s.sources, Some(3));
        s.select_condition(9);
        assert_eq!(s.selected, 2);
    }

    #[test]
    fn box_views_pick_a_metric_of_their_group() {
        let mut s = state();
        s.set_view(View::Boxes(MetricGroup::Runtime));
        assert_eq!(s.metric, Metric::Runtime);
        s.set_view(View::RuntimeRatio);
        assert_eq!(s.metric, Metric::Runtime);
        s.set_view(View::Boxes(MetricGroup::Raw));
        assert_eq!(s.metric, Metric::Sdr);
    }
}
