//! # GraphTheme Layer
//!
//! Statistical chart overlays for map features. Each feature gets a Bar, Line
//! or Pie chart built from a set of theme fields; on every view change the
//! layer recomputes chart footprints and hides charts that would overlap ones
//! already drawn, letting charts with a higher overlay weight win.
//!
//! Charts are cached per feature id. Adding, removing or clearing features,
//! changing the chart type, and explicit redraws all invalidate that cache.

pub mod cache;
pub mod chart;
pub mod error;
pub mod feature;
pub mod layer;
pub mod options;

pub use cache::ChartCache;
pub use chart::{Chart, ChartKind};
pub use error::ThemeError;
pub use feature::{FeatureGeometry, ThemeFeature};
pub use layer::GraphThemeLayer;
pub use options::{ChartSetting, LayerOptions};
