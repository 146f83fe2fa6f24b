use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::BBox;

/// An entry in the R-tree spatial index, referencing an item by its index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the caller's item list (features, accepted footprints, ...).
    pub index: usize,
    /// Bounding box of the item.
    pub bbox: BBox,
}

impl SpatialEntry {
    pub fn new(index: usize, bbox: BBox) -> Self {
        Self { index, bbox }
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

/// Bounding-box index used for viewport culling and as the broad phase of
/// overlap checks.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build the index from a list of bounding boxes.
    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn insert(&mut self, entry: SpatialEntry) {
        self.tree.insert(entry);
    }

    /// Find all entries whose bounding box intersects `bbox` (boundaries touching counts).
    pub fn query_viewport(&self, bbox: &BBox) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners([bbox.min.x, bbox.min.y], [bbox.max.x, bbox.max.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn entry(index: usize, x0: f64, y0: f64, x1: f64, y1: f64) -> SpatialEntry {
        SpatialEntry::new(index, BBox::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    #[test]
    fn test_spatial_query() {
        let index = SpatialIndex::build(vec![
            entry(0, 0.0, 0.0, 10.0, 10.0),
            entry(1, 20.0, 20.0, 30.0, 30.0),
        ]);

        let viewport = BBox::new(Point::new(-5.0, -5.0), Point::new(15.0, 15.0));
        let results = index.query_viewport(&viewport);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 0);
    }

    #[test]
    fn test_touching_boxes_are_reported() {
        let mut index = SpatialIndex::new();
        assert!(index.is_empty());
        index.insert(entry(7, 0.0, 0.0, 1.0, 1.0));
        let touching = BBox::new(Point::new(1.0, 0.0), Point::new(2.0, 1.0));
        let results = index.query_viewport(&touching);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 7);
        assert_eq!(index.len(), 1);
    }
}
