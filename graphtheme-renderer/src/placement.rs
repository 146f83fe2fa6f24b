//! Overlap-avoiding placement of chart glyphs.
//!
//! Each redraw runs one [`PlacementPass`] over the current glyphs. With overlap
//! avoidance on, glyphs are visited in priority order and a glyph is drawn only
//! if its footprint is visible and does not overlap any footprint accepted
//! before it. With avoidance off, every glyph is drawn.
//!
//! The pass keeps no state between runs: footprints are recomputed from the
//! current projection every time and the accepted list starts empty.

use graphtheme_core::{
    quadrilaterals_overlap, sort_by_priority, GeometryError, PixelBounds, Point, Polygon,
    SpatialEntry, SpatialIndex, ViewportTest,
};
use serde::{Deserialize, Serialize};

use crate::render_data::{DrawSink, FeatureId, PlacedShape, Shape};
use crate::viewport::Projection;

/// A chart glyph as seen by the placement pass.
pub trait FootprintProvider {
    fn feature_id(&self) -> &str;

    /// Optional overlay weight; higher claims screen space first.
    fn overlay_weight(&self) -> Option<f64>;

    /// Recompute the pixel footprint for the current projection.
    ///
    /// Returns the pixel origin the glyph's shapes are drawn relative to.
    fn reset_footprint(&mut self, projection: &dyn Projection) -> Point;

    /// Footprint computed by the last `reset_footprint` call.
    fn footprint(&self) -> &Polygon;

    fn shapes(&self) -> &[Shape];
}

/// Switches controlling one placement pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Suppress glyphs that overlap an already accepted glyph, and cull
    /// glyphs outside the viewport.
    pub avoid_overlap: bool,
    /// Reorder glyphs by overlay weight before placing them.
    pub sort_by_weight: bool,
    pub viewport_test: ViewportTest,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            avoid_overlap: true,
            sort_by_weight: false,
            viewport_test: ViewportTest::Vertex,
        }
    }
}

/// Outcome of one placement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementResult {
    /// Accepted feature ids, in acceptance order.
    pub accepted: Vec<FeatureId>,
    /// Footprints of the accepted glyphs, parallel to `accepted`.
    pub footprints: Vec<Polygon>,
    /// Glyphs culled because their footprint is outside the viewport.
    pub outside: usize,
    /// Glyphs suppressed because they overlap an accepted glyph.
    pub overlapped: usize,
    /// Glyphs whose footprint was not a quadrilateral; drawn as non-overlapping.
    pub indeterminate: usize,
}

impl PlacementResult {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// One overlap-resolution pass over a glyph list.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementPass {
    options: PlacementOptions,
}

impl PlacementPass {
    pub fn new(options: PlacementOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    /// Place `glyphs`, enqueue the accepted shapes into `sink` and flush it.
    ///
    /// When weight sorting is enabled `glyphs` is reordered in place (stable).
    pub fn run<G: FootprintProvider>(
        &self,
        glyphs: &mut [G],
        projection: &dyn Projection,
        sink: &mut dyn DrawSink,
    ) -> PlacementResult {
        if self.options.sort_by_weight {
            sort_by_priority(glyphs, |g| g.overlay_weight());
        }

        let view = projection.pixel_bounds();
        let mut result = PlacementResult::default();
        let mut accepted_index = SpatialIndex::new();

        for glyph in glyphs.iter_mut() {
            let origin = glyph.reset_footprint(projection);
            if self.options.avoid_overlap
                && !self.admit(glyph, &view, &accepted_index, &mut result)
            {
                continue;
            }

            let footprint = glyph.footprint();
            if self.options.avoid_overlap && footprint.is_quadrilateral() {
                if let Some(bbox) = footprint.bbox() {
                    accepted_index.insert(SpatialEntry::new(result.footprints.len(), bbox));
                }
            }
            result.accepted.push(glyph.feature_id().to_string());
            result.footprints.push(footprint.clone());
            enqueue_shapes(glyph, origin, sink);
        }
        sink.render();

        log::debug!(
            "placement: {} accepted, {} outside, {} overlapped, {} indeterminate",
            result.accepted.len(),
            result.outside,
            result.overlapped,
            result.indeterminate
        );
        result
    }

    /// Viewport cull and overlap test against the footprints accepted so far.
    ///
    /// Updates the rejection counters and returns whether the glyph may be drawn.
    fn admit<G: FootprintProvider>(
        &self,
        glyph: &G,
        view: &PixelBounds,
        accepted_index: &SpatialIndex,
        result: &mut PlacementResult,
    ) -> bool {
        let footprint = glyph.footprint();
        if !self.options.viewport_test.is_visible(view, footprint.vertices()) {
            result.outside += 1;
            return false;
        }

        if !footprint.is_quadrilateral() {
            // Indeterminate overlap counts as no overlap.
            let err = GeometryError::NotQuadrilateral {
                count: footprint.vertex_count(),
            };
            log::warn!("chart for feature {}: {}", glyph.feature_id(), err);
            result.indeterminate += 1;
            return true;
        }

        let Some(bbox) = footprint.bbox() else {
            return true;
        };
        let mut candidates: Vec<usize> = accepted_index
            .query_viewport(&bbox)
            .into_iter()
            .map(|e| e.index)
            .collect();
        candidates.sort_unstable();
        let overlaps = candidates.into_iter().any(|i| {
            quadrilaterals_overlap(footprint.vertices(), result.footprints[i].vertices())
                .unwrap_or(false)
        });
        if overlaps {
            result.overlapped += 1;
        }
        !overlaps
    }
}

fn enqueue_shapes<G: FootprintProvider>(glyph: &G, origin: Point, sink: &mut dyn DrawSink) {
    for shape in glyph.shapes() {
        sink.enqueue_shape(PlacedShape {
            shape: shape.clone(),
            origin,
        });
    }
}
