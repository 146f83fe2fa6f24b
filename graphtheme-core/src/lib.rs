//! # GraphTheme Core
//!
//! Pixel-space geometry for statistical chart overlays: closed polygon rings,
//! ray-casting containment, segment intersection, quadrilateral overlap,
//! viewport containment, overlay priority weights, and an R-tree index over
//! bounding boxes.
//!
//! Nothing in this crate knows about a rendering engine; see
//! `graphtheme-renderer` for the placement pass built on top of it.

pub mod error;
pub mod geometry;
pub mod priority;
pub mod spatial;

pub use error::GeometryError;
pub use geometry::{
    intersects_viewport, point_in_polygon, quadrilaterals_overlap, segment_intersection, BBox,
    PixelBounds, Point, Polygon, ViewportTest,
};
pub use priority::{compare_priority, parse_weight, sort_by_priority};
pub use spatial::{SpatialEntry, SpatialIndex};
