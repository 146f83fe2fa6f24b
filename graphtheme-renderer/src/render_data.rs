use graphtheme_core::Point;
use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// Opaque identifier of the feature a chart was built from.
pub type FeatureId = String;

/// Geometry of a drawable shape, in chart-local pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polyline {
        points: Vec<Point>,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    /// Pie slice; angles in degrees, clockwise from the positive x axis.
    Sector {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

/// A drawable shape owned by one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Feature the shape belongs to.
    pub ref_data_id: FeatureId,
    pub kind: ShapeKind,
    /// RGBA fill colour.
    pub color: [f32; 4],
}

impl Shape {
    pub fn new(ref_data_id: &str, kind: ShapeKind, color: [f32; 4]) -> Self {
        Self {
            ref_data_id: ref_data_id.to_string(),
            kind,
            color,
        }
    }
}

/// A shape queued for drawing, with the pixel origin its local coordinates are relative to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedShape {
    pub shape: Shape,
    pub origin: Point,
}

/// Drawing target of the placement pass.
pub trait DrawSink {
    /// Queue one shape for the next flush.
    fn enqueue_shape(&mut self, shape: PlacedShape);
    /// Flush everything queued so far.
    fn render(&mut self);
}

/// Complete render frame data: the shapes accepted for drawing in the current pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    shapes: Vec<PlacedShape>,
    /// Number of flushes since the frame was created.
    pub render_count: usize,
    /// Shapes were queued since the last flush.
    pub dirty: bool,
}

impl RenderFrame {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            shapes: Vec::new(),
            render_count: 0,
            dirty: false,
        }
    }

    /// Drop every queued shape.
    pub fn clear_all(&mut self) {
        self.shapes.clear();
        self.dirty = true;
    }

    pub fn all_shapes(&self) -> &[PlacedShape] {
        &self.shapes
    }

    /// Shapes belonging to `feature_id`, or every shape when `None`.
    pub fn shapes_for_feature(&self, feature_id: Option<&str>) -> Vec<&PlacedShape> {
        match feature_id {
            None => self.shapes.iter().collect(),
            Some(id) => self
                .shapes
                .iter()
                .filter(|s| s.shape.ref_data_id == id)
                .collect(),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl DrawSink for RenderFrame {
    fn enqueue_shape(&mut self, shape: PlacedShape) {
        self.shapes.push(shape);
        self.dirty = true;
    }

    fn render(&mut self) {
        self.render_count += 1;
        self.dirty = false;
    }
}
