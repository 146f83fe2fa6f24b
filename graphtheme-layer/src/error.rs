use graphtheme_core::GeometryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Unknown chart kind '{0}', expected one of: Bar, Line, Pie")]
    UnknownChartKind(String),

    #[error("Invalid codomain [{min}, {max}]: lower bound must be below upper bound")]
    InvalidCodomain { min: f64, max: f64 },

    #[error("Invalid chart size {width}x{height}: both must be positive")]
    InvalidSize { width: f64, height: f64 },

    #[error("No theme fields configured")]
    MissingThemeFields,

    #[error("Feature '{0}' has no geometry to anchor a chart")]
    EmptyGeometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}
