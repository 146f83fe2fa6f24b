use graphtheme_core::{parse_weight, BBox, Point, Polygon};
use graphtheme_renderer::FeatureId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ThemeError;

/// Map-space geometry of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureGeometry {
    Point { x: f64, y: f64 },
    LineString { points: Vec<Point> },
    Polygon { points: Vec<Point> },
}

impl FeatureGeometry {
    /// A polygon geometry from a ring, closing it if needed.
    pub fn polygon(points: Vec<Point>) -> Result<Self, ThemeError> {
        let ring = Polygon::close(points)?;
        Ok(FeatureGeometry::Polygon {
            points: ring.vertices().to_vec(),
        })
    }

    pub fn bounds(&self) -> Option<BBox> {
        match self {
            FeatureGeometry::Point { x, y } => {
                let p = Point::new(*x, *y);
                Some(BBox::new(p, p))
            }
            FeatureGeometry::LineString { points } | FeatureGeometry::Polygon { points } => {
                BBox::from_points(points)
            }
        }
    }

    /// Where the feature's chart is anchored.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            FeatureGeometry::Point { x, y } => Some(Point::new(*x, *y)),
            _ => self.bounds().map(|b| b.center()),
        }
    }
}

/// A feature carrying the attributes charts are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFeature")]
pub struct ThemeFeature {
    pub id: FeatureId,
    pub geometry: FeatureGeometry,
    pub attributes: Map<String, Value>,
}

/// Wire form: attributes either as an object or as parallel
/// `fieldNames` / `fieldValues` arrays (also accepted as `filedValues`); ids as
/// strings or numbers.
#[derive(Deserialize)]
struct RawFeature {
    id: Value,
    geometry: FeatureGeometry,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
    #[serde(default, rename = "fieldNames")]
    field_names: Vec<String>,
    #[serde(default, rename = "fieldValues", alias = "filedValues")]
    field_values: Vec<Value>,
}

impl From<RawFeature> for ThemeFeature {
    fn from(raw: RawFeature) -> Self {
        let id = match raw.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        match raw.attributes {
            Some(attributes) => Self {
                id,
                geometry: raw.geometry,
                attributes,
            },
            None => Self::from_field_arrays(&id, raw.geometry, &raw.field_names, &raw.field_values),
        }
    }
}

impl ThemeFeature {
    pub fn new(id: &str, geometry: FeatureGeometry) -> Self {
        Self {
            id: id.to_string(),
            geometry,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: Value) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    /// Build from parallel name/value arrays; extra names or values are dropped.
    pub fn from_field_arrays(
        id: &str,
        geometry: FeatureGeometry,
        names: &[String],
        values: &[Value],
    ) -> Self {
        let attributes = names
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect();
        Self {
            id: id.to_string(),
            geometry,
            attributes,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON array of features.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn bounds(&self) -> Option<BBox> {
        self.geometry.bounds()
    }

    pub fn anchor(&self) -> Option<Point> {
        self.geometry.anchor()
    }

    /// Numeric value of an attribute; missing or non-numeric gives `None`.
    pub fn numeric_attribute(&self, field: &str) -> Option<f64> {
        self.attributes.get(field).and_then(parse_weight)
    }

    /// Numeric value of `field`, or `default` when it is missing or not numeric.
    /// A non-finite `default` is replaced by 0.
    pub fn weight_field_value(&self, field: &str, default: f64) -> f64 {
        let default = if default.is_finite() { default } else { 0.0 };
        self.numeric_attribute(field).unwrap_or(default)
    }
}
