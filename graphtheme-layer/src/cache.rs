use std::collections::HashMap;

use graphtheme_renderer::{FeatureId, FootprintProvider};

use crate::chart::Chart;

/// Charts built so far, keyed by feature id, in build order.
///
/// Any operation that replaces the layer's data must call [`ChartCache::invalidate`];
/// the cache never expires entries on its own.
#[derive(Debug, Default)]
pub struct ChartCache {
    charts: Vec<Chart>,
    index: HashMap<FeatureId, usize>,
    /// Bumped on every invalidation.
    generation: u64,
}

impl ChartCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, feature_id: &str) -> bool {
        self.index.contains_key(feature_id)
    }

    /// Insert a chart; returns false and keeps the existing one if its feature is already cached.
    pub fn insert(&mut self, chart: Chart) -> bool {
        let id = chart.feature_id().to_string();
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.charts.len());
        self.charts.push(chart);
        true
    }

    pub fn get(&self, feature_id: &str) -> Option<&Chart> {
        self.index.get(feature_id).map(|&i| &self.charts[i])
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    /// Run `f` over the charts with permission to reorder them.
    pub fn with_charts_mut<R>(&mut self, f: impl FnOnce(&mut [Chart]) -> R) -> R {
        let result = f(&mut self.charts);
        self.reindex();
        result
    }

    fn reindex(&mut self) {
        self.index = self
            .charts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.feature_id().to_string(), i))
            .collect();
    }

    /// Drop every cached chart.
    pub fn invalidate(&mut self) {
        log::debug!(
            "invalidating chart cache ({} charts, generation {})",
            self.charts.len(),
            self.generation
        );
        self.charts.clear();
        self.index.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
