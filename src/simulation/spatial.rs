//! Spatial indexing for traffic neighbour queries.
//!
//! Agents only need the traffic outlines close enough to reach with a ray or
//! a body. The index is rebuilt every tick after traffic has moved.

use geo::Coord;
use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};

use super::locatable::Locatable;

/// Type alias for 2D spatial KD-tree used for efficient neighbor queries.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// KD-tree over the centres of a set of entities.
pub struct SpatialIndex {
    tree: Option<Tree2D>,
    len: usize,
    max_radius: f32,
}

impl SpatialIndex {
    /// Builds an index over `items`.
    pub fn build<T: Locatable>(items: &[T]) -> Result<Self, KdTreeError> {
        let tree = build_tree(items, |item| {
            let pos = item.pos();
            vec![pos.x, pos.y]
        })?;
        Ok(Self {
            tree: Some(tree),
            len: items.len(),
            max_radius: max_radius(items),
        })
    }

    /// An index that returns every item for every query.
    ///
    /// Used when the tree cannot be built, e.g. because a position is not
    /// finite.
    pub fn exhaustive<T: Locatable>(items: &[T]) -> Self {
        Self {
            tree: None,
            len: items.len(),
            max_radius: max_radius(items),
        }
    }

    /// Largest bounding radius among the indexed items.
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Indices of items whose bounding circle may reach within `reach` of `pos`.
    ///
    /// The result is sorted so callers see items in their original order.
    pub fn near(&self, pos: Coord<f32>, reach: f32) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return (0..self.len).collect();
        };
        let radius = reach + self.max_radius;
        let mut found: Vec<usize> = tree
            .within(&[pos.x, pos.y], radius.powi(2), &squared_euclidean)
            .unwrap_or_default()
            .into_iter()
            .map(|(_, &idx)| idx)
            .collect();
        found.sort_unstable();
        found
    }
}

fn max_radius<T: Locatable>(items: &[T]) -> f32 {
    items
        .iter()
        .map(Locatable::bounding_radius)
        .fold(0.0, f32::max)
}

/// Helper function to build a KD-tree from a collection of items.
fn build_tree<T>(items: &[T], get_pos: impl Fn(&T) -> Vec<f32>) -> Result<Tree2D, KdTreeError> {
    let mut tree = KdTree::new(2);
    for (i, item) in items.iter().enumerate() {
        tree.add(get_pos(item), i)?;
    }
    Ok(tree)
}
