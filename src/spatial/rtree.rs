//! R-tree over a snapshot of node positions, keyed by slot.
//!
//! Built once per query batch with [`SpatialIndex::from_positions`]; callers
//! map the returned slots back into the slice they indexed.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
struct NodePoint {
    slot: usize,
    x: f64,
    y: f64,
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        (self.x - point[0]).abs() < f64::EPSILON && (self.y - point[1]).abs() < f64::EPSILON
    }
}

/// Spatial index over one snapshot of node positions.
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Bulk-load an index where each position's slot is its offset in `positions`.
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let points: Vec<_> = positions
            .into_iter()
            .enumerate()
            .map(|(slot, p)| NodePoint { slot, x: p.x, y: p.y })
            .collect();

        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Slot of the nearest point no farther than `max_distance`.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.slot)
    }

    /// Slots within `radius` of a point, the point itself included.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let radius_sq = radius * radius;
        self.tree
            .locate_within_distance([x, y], radius_sq)
            .map(|point| point.slot)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_positions_uses_offsets_as_slots() {
        let index = SpatialIndex::from_positions([
            Position::new(0.0, 0.0),
            Position::new(10.0, 10.0),
            Position::new(5.0, 5.0),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.nearest_within(6.0, 6.0, 5.0), Some(2));
        assert_eq!(index.nearest_within(11.0, 11.0, 5.0), Some(1));
    }

    #[test]
    fn test_nearest_within_is_inclusive() {
        let index = SpatialIndex::from_positions([Position::new(0.0, 0.0), Position::new(10.0, 10.0)]);

        assert_eq!(index.nearest_within(0.0, 0.0, 5.0), Some(0));
        assert_eq!(index.nearest_within(5.0, 5.0, 1.0), None);
        assert_eq!(index.nearest_within(3.0, 4.0, 5.0), Some(0));
    }

    #[test]
    fn test_in_radius() {
        let index = SpatialIndex::from_positions([
            Position::new(0.0, 0.0),
            Position::new(3.0, 0.0),
            Position::new(10.0, 0.0),
        ]);

        let in_radius = index.in_radius(0.0, 0.0, 5.0);
        assert_eq!(in_radius.len(), 2);
        assert!(in_radius.contains(&0));
        assert!(in_radius.contains(&1));
    }

    #[test]
    fn test_empty() {
        let index = SpatialIndex::from_positions(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.nearest_within(0.0, 0.0, 100.0), None);
    }
}
