//! Bounding-box index over catalog keys.
//!
//! The tree is bulk-loaded once from the footprints' bounding boxes and
//! never mutated afterwards. Its serialized form is the `.dat` artifact.
//! Candidates are reported in catalog key order, independent of the node
//! layout the bulk load chose.

use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;

/// Dense catalog key (0..N-1).
pub type TileKey = u64;

/// A leaf of the R-Tree: one catalog key and its footprint's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEnvelope {
    key: TileKey,
    envelope: AABB<[f64; 2]>,
}

impl TileEnvelope {
    pub fn new(key: TileKey, bbox: &BoundingBox) -> Self {
        Self {
            key,
            envelope: bbox.to_aabb(),
        }
    }

    pub fn key(&self) -> TileKey {
        self.key
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_aabb(&self.envelope)
    }
}

impl RTreeObject for TileEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Read-only R-Tree mapping catalog keys to bounding boxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileRTree {
    tree: RTree<TileEnvelope>,
}

impl TileRTree {
    /// Bulk-loads a tree from `entries`.
    pub fn bulk_load(entries: Vec<TileEnvelope>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Finds the keys whose box intersects `bbox`, in ascending key order.
    /// Touching boxes intersect.
    pub fn find_intersecting_keys(&self, bbox: &BoundingBox) -> Vec<TileKey> {
        let mut keys: Vec<TileKey> = self
            .tree
            .locate_in_envelope_intersecting(&bbox.to_aabb())
            .map(TileEnvelope::key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Gets the number of entries in the tree.
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    /// All keys in the tree, in traversal order.
    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        self.tree.iter().map(TileEnvelope::key)
    }

    /// Box covering every entry, or `None` for an empty tree.
    pub fn bounds(&self) -> Option<BoundingBox> {
        if self.tree.size() == 0 {
            return None;
        }
        Some(BoundingBox::from_aabb(&self.tree.root().envelope()))
    }
}
