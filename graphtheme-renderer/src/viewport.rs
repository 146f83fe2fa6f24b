use graphtheme_core::{BBox, PixelBounds, Point};
use serde::{Deserialize, Serialize};

/// Map-to-pixel projection the placement pass depends on.
///
/// Any host map engine can be bound by implementing this trait; [`Viewport`]
/// is the built-in linear implementation.
pub trait Projection {
    /// Project a map coordinate to a pixel coordinate (y grows downward).
    fn to_pixel(&self, point: &Point) -> Point;

    /// The visible pixel rectangle, in the same space as `to_pixel`.
    fn pixel_bounds(&self) -> PixelBounds;

    /// The visible map-space rectangle, used to skip features before charting.
    fn visible_bounds(&self) -> BBox;
}

/// Represents the current view onto the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center X in map coordinates.
    pub center_x: f64,
    /// Center Y in map coordinates (north up).
    pub center_y: f64,
    /// Zoom level (pixels per map unit).
    pub zoom: f64,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom: 1.0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn with_center(mut self, center_x: f64, center_y: f64) -> Self {
        self.center_x = center_x;
        self.center_y = center_y;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Pan the viewport by a drag delta in screen pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center_x -= dx / self.zoom;
        self.center_y += dy / self.zoom;
    }

    /// Zoom in/out keeping the map point under a screen position fixed.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        let before = self.to_map(&Point::new(screen_x, screen_y));

        self.zoom *= factor;
        self.zoom = self.zoom.clamp(0.001, 1_000_000.0);

        let after = self.to_map(&Point::new(screen_x, screen_y));
        self.center_x -= after.x - before.x;
        self.center_y -= after.y - before.y;
    }

    /// Zoom to fit a bounding box.
    pub fn fit_bbox(&mut self, bbox: &BBox) {
        let width = bbox.width();
        let height = bbox.height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let center = bbox.center();
        self.center_x = center.x;
        self.center_y = center.y;

        let zoom_x = self.canvas_width / width * 0.9; // 10% margin
        let zoom_y = self.canvas_height / height * 0.9;
        self.zoom = zoom_x.min(zoom_y);
    }

    /// Convert a pixel coordinate back to map coordinates.
    pub fn to_map(&self, pixel: &Point) -> Point {
        Point::new(
            (pixel.x - self.canvas_width / 2.0) / self.zoom + self.center_x,
            self.center_y - (pixel.y - self.canvas_height / 2.0) / self.zoom,
        )
    }
}

impl Projection for Viewport {
    fn to_pixel(&self, point: &Point) -> Point {
        Point::new(
            (point.x - self.center_x) * self.zoom + self.canvas_width / 2.0,
            (self.center_y - point.y) * self.zoom + self.canvas_height / 2.0,
        )
    }

    fn pixel_bounds(&self) -> PixelBounds {
        let visible = self.visible_bounds();
        // North-west corner maps to the top-left pixel, south-east to bottom-right.
        let top_left = self.to_pixel(&Point::new(visible.min.x, visible.max.y));
        let bottom_right = self.to_pixel(&Point::new(visible.max.x, visible.min.y));
        PixelBounds::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }

    fn visible_bounds(&self) -> BBox {
        let half_w = self.canvas_width / (2.0 * self.zoom);
        let half_h = self.canvas_height / (2.0 * self.zoom);
        BBox::new(
            Point::new(self.center_x - half_w, self.center_y - half_h),
            Point::new(self.center_x + half_w, self.center_y + half_h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_flips_y() {
        let vp = Viewport::new(200.0, 100.0).with_zoom(2.0);
        let center = vp.to_pixel(&Point::new(0.0, 0.0));
        assert!((center.x - 100.0).abs() < 1e-10);
        assert!((center.y - 50.0).abs() < 1e-10);

        let north_east = vp.to_pixel(&Point::new(10.0, 10.0));
        assert!((north_east.x - 120.0).abs() < 1e-10);
        assert!((north_east.y - 30.0).abs() < 1e-10);

        let back = vp.to_map(&north_east);
        assert!((back.x - 10.0).abs() < 1e-10);
        assert!((back.y - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_pixel_bounds_cover_canvas() {
        let vp = Viewport::new(800.0, 600.0)
            .with_center(120.0, 30.0)
            .with_zoom(4.0);
        let pb = vp.pixel_bounds();
        assert!(pb.left.abs() < 1e-9);
        assert!(pb.top.abs() < 1e-9);
        assert!((pb.right - 800.0).abs() < 1e-9);
        assert!((pb.bottom - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_content_with_drag() {
        let mut vp = Viewport::new(100.0, 100.0);
        let anchor = Point::new(5.0, 5.0);
        let before = vp.to_pixel(&anchor);
        vp.pan(10.0, -20.0);
        let after = vp.to_pixel(&anchor);
        assert!((after.x - before.x - 10.0).abs() < 1e-10);
        assert!((after.y - before.y + 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_fixed() {
        let mut vp = Viewport::new(400.0, 300.0);
        let cursor = Point::new(310.0, 40.0);
        let before = vp.to_map(&cursor);
        vp.zoom_at(cursor.x, cursor.y, 2.5);
        let after = vp.to_map(&cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!((vp.zoom - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_fit_bbox() {
        let mut vp = Viewport::new(1000.0, 500.0);
        vp.fit_bbox(&BBox::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
        assert!((vp.center_x - 50.0).abs() < 1e-10);
        assert!((vp.center_y - 50.0).abs() < 1e-10);
        assert!((vp.zoom - 4.5).abs() < 1e-10);
        let visible = vp.visible_bounds();
        assert!(visible.contains_point(&Point::new(0.0, 0.0)));
        assert!(visible.contains_point(&Point::new(100.0, 100.0)));
    }
}
