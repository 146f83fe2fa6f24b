use std::fmt;
use std::str::FromStr;

use graphtheme_core::{Point, Polygon};
use graphtheme_renderer::{FeatureId, FootprintProvider, Projection, Shape, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::feature::ThemeFeature;
use crate::options::ChartSetting;

const PALETTE: [[f32; 4]; 6] = [
    [0.33, 0.53, 0.82, 1.0],
    [0.93, 0.49, 0.19, 1.0],
    [0.44, 0.68, 0.28, 1.0],
    [0.99, 0.75, 0.0, 1.0],
    [0.65, 0.42, 0.78, 1.0],
    [0.27, 0.73, 0.77, 1.0],
];

/// Fraction of a bar slot left empty on each side of the bar.
const BAR_GAP: f64 = 0.2;
const LINE_POINT_RADIUS: f64 = 3.0;

/// Chart type drawn for every feature of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl FromStr for ChartKind {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bar" => Ok(ChartKind::Bar),
            "Line" => Ok(ChartKind::Line),
            "Pie" => Ok(ChartKind::Pie),
            other => Err(ThemeError::UnknownChartKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
        };
        f.write_str(name)
    }
}

/// One feature's chart: its shapes, built once, and a footprint recomputed
/// on every placement pass.
#[derive(Debug, Clone)]
pub struct Chart {
    feature_id: FeatureId,
    kind: ChartKind,
    /// Map-space anchor.
    anchor: Point,
    setting: ChartSetting,
    values: Vec<f64>,
    weight: Option<f64>,
    shapes: Vec<Shape>,
    footprint: Polygon,
}

impl Chart {
    /// Build the chart for `feature`, reading one value per theme field.
    ///
    /// Missing or non-numeric values read as 0; values are rounded per the
    /// setting and clamped into its codomain.
    pub fn build(
        feature: &ThemeFeature,
        kind: ChartKind,
        theme_fields: &[String],
        setting: &ChartSetting,
        weight_field: Option<&str>,
    ) -> Result<Self, ThemeError> {
        if theme_fields.is_empty() {
            return Err(ThemeError::MissingThemeFields);
        }
        setting.validate()?;
        let anchor = feature
            .anchor()
            .ok_or_else(|| ThemeError::EmptyGeometry(feature.id.clone()))?;

        let [min, max] = setting.codomain;
        let values: Vec<f64> = theme_fields
            .iter()
            .map(|field| {
                let v = feature.numeric_attribute(field).unwrap_or(0.0);
                setting.round_value(v).clamp(min, max)
            })
            .collect();

        let weight = weight_field.and_then(|field| feature.numeric_attribute(field));

        let mut chart = Self {
            feature_id: feature.id.clone(),
            kind,
            anchor,
            setting: setting.clone(),
            values,
            weight,
            shapes: Vec::new(),
            footprint: Polygon::from_unchecked(Vec::new()),
        };
        chart.assemble_shapes();
        Ok(chart)
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Data area inside the chart box: (left, top, right, bottom), chart-local.
    fn data_view_box(&self) -> (f64, f64, f64, f64) {
        let [inset_left, inset_bottom, inset_right, inset_top] =
            self.setting.data_view_box_parameter;
        (
            inset_left,
            inset_top,
            (self.setting.width - inset_right).max(inset_left),
            (self.setting.height - inset_bottom).max(inset_top),
        )
    }

    /// Position of `value` inside the codomain, 0..=1.
    fn ratio(&self, value: f64) -> f64 {
        let [min, max] = self.setting.codomain;
        (value - min) / (max - min)
    }

    fn assemble_shapes(&mut self) {
        let (left, top, right, bottom) = self.data_view_box();
        let width = right - left;
        let height = bottom - top;
        let id = self.feature_id.as_str();
        let n = self.values.len() as f64;
        let slot = width / n;

        self.shapes = match self.kind {
            ChartKind::Bar => self
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let bar_height = self.ratio(v) * height;
                    Shape::new(
                        id,
                        ShapeKind::Rect {
                            x: left + i as f64 * slot + slot * BAR_GAP,
                            y: bottom - bar_height,
                            width: slot * (1.0 - 2.0 * BAR_GAP),
                            height: bar_height,
                        },
                        PALETTE[i % PALETTE.len()],
                    )
                })
                .collect(),
            ChartKind::Line => {
                let points: Vec<Point> = self
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| {
                        Point::new(
                            left + (i as f64 + 0.5) * slot,
                            bottom - self.ratio(v) * height,
                        )
                    })
                    .collect();
                let mut shapes = vec![Shape::new(
                    id,
                    ShapeKind::Polyline {
                        points: points.clone(),
                    },
                    PALETTE[0],
                )];
                shapes.extend(points.into_iter().map(|center| {
                    Shape::new(
                        id,
                        ShapeKind::Circle {
                            center,
                            radius: LINE_POINT_RADIUS,
                        },
                        PALETTE[1],
                    )
                }));
                shapes
            }
            ChartKind::Pie => {
                // Slices are sized by value above the codomain minimum.
                let [min, _] = self.setting.codomain;
                let shares: Vec<f64> = self.values.iter().map(|v| v - min).collect();
                let total: f64 = shares.iter().sum();
                let center = Point::new((left + right) / 2.0, (top + bottom) / 2.0);
                let radius = width.min(height) / 2.0;
                let mut start = 0.0;
                let mut shapes = Vec::new();
                if total > 0.0 {
                    for (i, share) in shares.iter().enumerate() {
                        if *share <= 0.0 {
                            continue;
                        }
                        let sweep = share / total * 360.0;
                        shapes.push(Shape::new(
                            id,
                            ShapeKind::Sector {
                                center,
                                radius,
                                start_angle: start,
                                end_angle: start + sweep,
                            },
                            PALETTE[i % PALETTE.len()],
                        ));
                        start += sweep;
                    }
                }
                shapes
            }
        };
    }
}

impl FootprintProvider for Chart {
    fn feature_id(&self) -> &str {
        &self.feature_id
    }

    fn overlay_weight(&self) -> Option<f64> {
        self.weight
    }

    fn reset_footprint(&mut self, projection: &dyn Projection) -> Point {
        let location = projection.to_pixel(&self.anchor);
        let left = location.x - self.setting.width / 2.0 + self.setting.x_offset;
        let top = location.y - self.setting.height / 2.0 + self.setting.y_offset;
        self.footprint = Polygon::rect(
            left,
            top,
            left + self.setting.width,
            top + self.setting.height,
        );
        Point::new(left, top)
    }

    fn footprint(&self) -> &Polygon {
        &self.footprint
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureGeometry;
    use graphtheme_renderer::Viewport;
    use serde_json::json;

    fn fields() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    fn build(kind: ChartKind, setting: &ChartSetting, weight_field: Option<&str>) -> Chart {
        Chart::build(&feature(), kind, &fields(), setting, weight_field).unwrap()
    }

    fn feature() -> ThemeFeature {
        ThemeFeature::new("f1", FeatureGeometry::Point { x: 10.0, y: 20.0 })
            .with_attribute("a", json!(10))
            .with_attribute("b", json!("50"))
            .with_attribute("c", json!(250))
            .with_attribute("w", json!(3))
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!("Bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert_eq!("Pie".parse::<ChartKind>().unwrap().to_string(), "Pie");
        assert!(matches!(
            "Bar3D".parse::<ChartKind>(),
            Err(ThemeError::UnknownChartKind(_))
        ));
    }

    #[test]
    fn test_values_are_clamped_and_weight_read() {
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0]);
        let chart = build(ChartKind::Bar, &setting, Some("w"));
        assert_eq!(chart.values(), &[10.0, 50.0, 100.0]);
        assert_eq!(chart.overlay_weight(), Some(3.0));
        let unweighted = build(ChartKind::Bar, &setting, None);
        assert_eq!(unweighted.overlay_weight(), None);
    }

    #[test]
    fn test_bar_shapes() {
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0]);
        let chart = build(ChartKind::Bar, &setting, None);
        assert_eq!(chart.shapes().len(), 3);
        match &chart.shapes()[1].kind {
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
            } => {
                assert!((x - 24.0).abs() < 1e-10);
                assert!((width - 12.0).abs() < 1e-10);
                assert!((height - 50.0).abs() < 1e-10);
                assert!((y - 50.0).abs() < 1e-10);
            }
            other => panic!("expected rect, got {:?}", other),
        }
        assert!(chart.shapes().iter().all(|s| s.ref_data_id == "f1"));
    }

    #[test]
    fn test_bar_shapes_stay_inside_data_view_box() {
        // Insets are [left, bottom, right, top]: data area spans x 5..45, y 20..90.
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0])
            .with_data_view_box([5.0, 10.0, 15.0, 20.0]);
        let chart = build(ChartKind::Bar, &setting, None);
        assert_eq!(chart.shapes().len(), 3);
        for shape in chart.shapes() {
            match &shape.kind {
                ShapeKind::Rect {
                    x,
                    y,
                    width,
                    height,
                } => {
                    assert!(*x >= 5.0 - 1e-10);
                    assert!(x + width <= 45.0 + 1e-10);
                    assert!(*y >= 20.0 - 1e-10);
                    assert!((y + height - 90.0).abs() < 1e-10);
                }
                other => panic!("expected rect, got {:?}", other),
            }
        }
        match &chart.shapes()[1].kind {
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
            } => {
                assert!((x - 21.0).abs() < 1e-10);
                assert!((width - 8.0).abs() < 1e-10);
                assert!((height - 35.0).abs() < 1e-10);
                assert!((y - 55.0).abs() < 1e-10);
            }
            other => panic!("expected rect, got {:?}", other),
        }
        // The full-scale bar reaches the top inset exactly.
        assert!(matches!(
            &chart.shapes()[2].kind,
            ShapeKind::Rect { y, .. } if (y - 20.0).abs() < 1e-10
        ));
    }

    #[test]
    fn test_decimal_number_rounds_values() {
        let rough = ThemeFeature::new("r", FeatureGeometry::Point { x: 0.0, y: 0.0 })
            .with_attribute("a", json!(12.3456))
            .with_attribute("b", json!("3.14159"));
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0]).with_decimal_number(2);
        let chart = Chart::build(&rough, ChartKind::Bar, &fields(), &setting, None).unwrap();
        let values = chart.values();
        assert!((values[0] - 12.35).abs() < 1e-10);
        assert!((values[1] - 3.14).abs() < 1e-10);
        assert_eq!(values[2], 0.0);

        let unrounded = ChartSetting::new(60.0, 100.0, [0.0, 100.0]);
        let chart = Chart::build(&rough, ChartKind::Bar, &fields(), &unrounded, None).unwrap();
        assert!((chart.values()[0] - 12.3456).abs() < 1e-10);
    }

    #[test]
    fn test_line_shapes() {
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0]);
        let chart = build(ChartKind::Line, &setting, None);
        // One polyline plus a marker per value.
        assert_eq!(chart.shapes().len(), 4);
        assert!(matches!(
            &chart.shapes()[0].kind,
            ShapeKind::Polyline { points } if points.len() == 3
        ));
    }

    #[test]
    fn test_pie_sectors_cover_full_circle() {
        let setting = ChartSetting::new(100.0, 100.0, [0.0, 100.0]);
        let chart = build(ChartKind::Pie, &setting, None);
        assert_eq!(chart.shapes().len(), 3);
        let end = match &chart.shapes()[2].kind {
            ShapeKind::Sector { end_angle, .. } => *end_angle,
            other => panic!("expected sector, got {:?}", other),
        };
        assert!((end - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_with_all_zero_values_has_no_shapes() {
        let setting = ChartSetting::new(100.0, 100.0, [0.0, 100.0]);
        let empty = ThemeFeature::new("z", FeatureGeometry::Point { x: 0.0, y: 0.0 });
        let chart = Chart::build(&empty, ChartKind::Pie, &fields(), &setting, None).unwrap();
        assert!(chart.shapes().is_empty());
    }

    #[test]
    fn test_build_errors() {
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0]);
        assert!(matches!(
            Chart::build(&feature(), ChartKind::Bar, &[], &setting, None),
            Err(ThemeError::MissingThemeFields)
        ));
        let hollow = ThemeFeature::new("h", FeatureGeometry::LineString { points: vec![] });
        assert!(matches!(
            Chart::build(&hollow, ChartKind::Bar, &fields(), &setting, None),
            Err(ThemeError::EmptyGeometry(_))
        ));
    }

    #[test]
    fn test_reset_footprint_follows_projection() {
        let setting = ChartSetting::new(60.0, 100.0, [0.0, 100.0]).with_offset(5.0, -10.0);
        let mut chart = build(ChartKind::Bar, &setting, None);
        let view = Viewport::new(400.0, 400.0).with_center(10.0, 20.0);

        let origin = chart.reset_footprint(&view);
        // Anchor projects to the canvas centre (200, 200).
        assert!((origin.x - 175.0).abs() < 1e-10);
        assert!((origin.y - 140.0).abs() < 1e-10);
        let fp = chart.footprint().vertices().to_vec();
        assert_eq!(fp.len(), 5);
        assert_eq!(fp[0], Point::new(175.0, 140.0));
        assert_eq!(fp[2], Point::new(235.0, 240.0));

        let mut panned = view;
        panned.pan(50.0, 0.0);
        let moved = chart.reset_footprint(&panned);
        assert!((moved.x - 225.0).abs() < 1e-10);
    }
}
