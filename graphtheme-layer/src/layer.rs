use graphtheme_core::{SpatialEntry, SpatialIndex};
use graphtheme_renderer::{
    DrawSink, PlacedShape, PlacementPass, PlacementResult, Projection, RenderFrame, Viewport,
};
use uuid::Uuid;

use crate::cache::ChartCache;
use crate::chart::{Chart, ChartKind};
use crate::error::ThemeError;
use crate::feature::ThemeFeature;
use crate::options::{ChartSetting, LayerOptions};

/// A statistical chart overlay: one chart per feature, redrawn on every view
/// change with overlap avoidance.
///
/// The layer only draws while attached to a viewport; data changes made
/// before that are kept and drawn on attach.
#[derive(Debug)]
pub struct GraphThemeLayer {
    pub id: Uuid,
    pub name: String,
    chart_kind: ChartKind,
    chart_setting: Option<ChartSetting>,
    theme_fields: Vec<String>,
    options: LayerOptions,
    features: Vec<ThemeFeature>,
    cache: ChartCache,
    viewport: Option<Viewport>,
    frame: Option<RenderFrame>,
    last_placement: Option<PlacementResult>,
}

impl GraphThemeLayer {
    pub fn new(name: &str, chart_kind: ChartKind, options: LayerOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            chart_kind,
            chart_setting: None,
            theme_fields: Vec::new(),
            options,
            features: Vec::new(),
            cache: ChartCache::new(),
            viewport: None,
            frame: None,
            last_placement: None,
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    /// Switch chart type; cached charts are discarded and the layer redrawn.
    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
        self.redraw();
    }

    pub fn set_chart_setting(&mut self, setting: ChartSetting) -> Result<(), ThemeError> {
        setting.validate()?;
        self.chart_setting = Some(setting);
        self.cache.invalidate();
        Ok(())
    }

    pub fn set_theme_fields(&mut self, fields: Vec<String>) -> Result<(), ThemeError> {
        if fields.is_empty() {
            return Err(ThemeError::MissingThemeFields);
        }
        self.theme_fields = fields;
        self.cache.invalidate();
        Ok(())
    }

    pub fn options(&self) -> &LayerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LayerOptions) {
        self.options = options;
        self.redraw();
    }

    // ── Map attachment ───────────────────────────────────────────────

    /// Attach to a map view and draw.
    pub fn attach(&mut self, viewport: Viewport) -> PlacementResult {
        self.frame = Some(RenderFrame::empty(viewport));
        self.set_viewport(viewport)
    }

    /// The view changed (pan/zoom/resize): recompute placement.
    pub fn set_viewport(&mut self, viewport: Viewport) -> PlacementResult {
        self.viewport = Some(viewport);
        self.redraw_thematic_features().unwrap_or_default()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    // ── Feature management ───────────────────────────────────────────

    pub fn features(&self) -> &[ThemeFeature] {
        &self.features
    }

    pub fn add_features(&mut self, features: Vec<ThemeFeature>) {
        log::debug!("layer {}: adding {} features", self.name, features.len());
        self.features.extend(features);
        self.cache.invalidate();
        self.redraw_thematic_features();
    }

    /// Remove the features with the given ids.
    pub fn remove_features(&mut self, ids: &[&str]) {
        self.cache.invalidate();
        self.features.retain(|f| !ids.contains(&f.id.as_str()));
        self.redraw_thematic_features();
    }

    pub fn remove_all_features(&mut self) {
        self.cache.invalidate();
        self.features.clear();
        self.redraw_thematic_features();
    }

    /// Remove all data, charts and drawn shapes.
    pub fn clear(&mut self) {
        if let Some(frame) = self.frame.as_mut() {
            frame.clear_all();
            frame.render();
        }
        self.remove_all_features();
        self.cache.invalidate();
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Discard cached charts and redraw. Returns false when not attached.
    pub fn redraw(&mut self) -> bool {
        self.cache.invalidate();
        self.redraw_thematic_features().is_some()
    }

    /// Rebuild missing charts for features in view and run the placement pass.
    ///
    /// Returns `None` when the layer is not attached to a viewport.
    pub fn redraw_thematic_features(&mut self) -> Option<PlacementResult> {
        let viewport = self.viewport?;
        self.build_missing_charts(&viewport);

        let frame = self.frame.get_or_insert_with(|| RenderFrame::empty(viewport));
        frame.clear_all();
        frame.viewport = viewport;

        let pass = PlacementPass::new(self.options.placement_options());
        let result = self
            .cache
            .with_charts_mut(|charts| pass.run(charts, &viewport, frame));
        self.last_placement = Some(result.clone());
        Some(result)
    }

    fn build_missing_charts(&mut self, projection: &dyn Projection) {
        let Some(setting) = self.chart_setting.as_ref() else {
            log::debug!("layer {}: no chart setting configured", self.name);
            return;
        };
        if self.theme_fields.is_empty() {
            log::debug!("layer {}: no theme fields configured", self.name);
            return;
        }

        let index = SpatialIndex::build(
            self.features
                .iter()
                .enumerate()
                .filter_map(|(i, f)| f.bounds().map(|b| SpatialEntry::new(i, b)))
                .collect(),
        );
        let mut visible: Vec<usize> = index
            .query_viewport(&projection.visible_bounds())
            .into_iter()
            .map(|e| e.index)
            .collect();
        visible.sort_unstable();

        let weight_field = self.options.overlay_weight_field.as_deref();
        for i in visible {
            let feature = &self.features[i];
            if self.cache.contains(&feature.id) {
                continue;
            }
            match Chart::build(
                feature,
                self.chart_kind,
                &self.theme_fields,
                setting,
                weight_field,
            ) {
                Ok(chart) => {
                    self.cache.insert(chart);
                }
                Err(err) => log::warn!(
                    "layer {}: skipping feature {}: {}",
                    self.name,
                    feature.id,
                    err
                ),
            }
        }
    }

    /// Drawn shapes of one feature, or all drawn shapes when `None`.
    pub fn shapes_by_feature_id(&self, feature_id: Option<&str>) -> Vec<&PlacedShape> {
        self.frame
            .as_ref()
            .map(|frame| frame.shapes_for_feature(feature_id))
            .unwrap_or_default()
    }

    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    pub fn last_placement(&self) -> Option<&PlacementResult> {
        self.last_placement.as_ref()
    }

    pub fn cached_chart_count(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_generation(&self) -> u64 {
        self.cache.generation()
    }
}
