//! # GraphTheme Renderer
//!
//! Host-independent rendering side of the chart theme layer: the map viewport
//! and its projection, drawable shapes with the [`DrawSink`] they are queued
//! into, and the overlap-avoiding [`PlacementPass`].
//!
//! A host map engine plugs in by implementing [`Projection`] and [`DrawSink`];
//! charts plug in by implementing [`FootprintProvider`].

pub mod placement;
pub mod render_data;
pub mod viewport;

pub use placement::{FootprintProvider, PlacementOptions, PlacementPass, PlacementResult};
pub use render_data::{DrawSink, FeatureId, PlacedShape, RenderFrame, Shape, ShapeKind};
pub use viewport::{Projection, Viewport};
