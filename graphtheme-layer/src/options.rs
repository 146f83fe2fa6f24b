use graphtheme_core::ViewportTest;
use graphtheme_renderer::PlacementOptions;
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Layer-wide switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    /// Hide charts that overlap charts already drawn. Defaults to true.
    #[serde(alias = "isOverLay")]
    pub avoid_overlap: bool,
    /// Attribute holding each feature's overlay weight.
    #[serde(alias = "overlayWeightField")]
    pub overlay_weight_field: Option<String>,
    pub viewport_test: ViewportTest,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            avoid_overlap: true,
            overlay_weight_field: None,
            viewport_test: ViewportTest::Vertex,
        }
    }
}

impl LayerOptions {
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn placement_options(&self) -> PlacementOptions {
        PlacementOptions {
            avoid_overlap: self.avoid_overlap,
            sort_by_weight: self.overlay_weight_field.is_some(),
            viewport_test: self.viewport_test,
        }
    }
}

/// Size, value range and placement of every chart in a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartSetting {
    /// Chart width in pixels.
    pub width: f64,
    /// Chart height in pixels.
    pub height: f64,
    /// Value range `[min, max]`; values are clamped into it.
    pub codomain: [f64; 2],
    /// Pixel offset of the chart box from its anchor, x direction.
    #[serde(alias = "XOffset")]
    pub x_offset: f64,
    /// Pixel offset of the chart box from its anchor, y direction (down).
    #[serde(alias = "YOffset")]
    pub y_offset: f64,
    /// Insets of the data area inside the chart box: left, bottom, right, top.
    pub data_view_box_parameter: [f64; 4],
    /// Decimal places kept in data values, 0..=16. `None` keeps values as is.
    pub decimal_number: Option<u32>,
}

impl Default for ChartSetting {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            codomain: [0.0, 100.0],
            x_offset: 0.0,
            y_offset: 0.0,
            data_view_box_parameter: [0.0; 4],
            decimal_number: None,
        }
    }
}

impl ChartSetting {
    pub fn new(width: f64, height: f64, codomain: [f64; 2]) -> Self {
        Self {
            width,
            height,
            codomain,
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, x_offset: f64, y_offset: f64) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    pub fn with_data_view_box(mut self, insets: [f64; 4]) -> Self {
        self.data_view_box_parameter = insets;
        self
    }

    pub fn with_decimal_number(mut self, decimals: u32) -> Self {
        self.decimal_number = Some(decimals.min(16));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let setting: Self = serde_json::from_str(json)?;
        setting.validate()?;
        Ok(setting)
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ThemeError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        let [min, max] = self.codomain;
        if !(min < max) {
            return Err(ThemeError::InvalidCodomain { min, max });
        }
        Ok(())
    }

    /// Round a value to `decimal_number` places, if set.
    pub fn round_value(&self, value: f64) -> f64 {
        match self.decimal_number {
            Some(d) => {
                let scale = 10f64.powi(d.min(16) as i32);
                (value * scale).round() / scale
            }
            None => value,
        }
    }
}
