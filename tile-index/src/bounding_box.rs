use rstar::AABB;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in longitude/latitude space.
///
/// `BoundingBox` defines a rectangular area using the minimum (min_x, min_y)
/// and maximum (max_x, max_y) corners. It is the coarse filter of every
/// lookup: a tile is a candidate for a point only if its box intersects the
/// point's degenerate box.
///
/// # Examples
///
/// ```rust
/// use tile_index::BoundingBox;
///
/// let bbox = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
/// assert!(bbox.contains_point(2.0, 1.0));
/// assert!(!bbox.contains_point(2.5, 1.0));
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, Deserialize, Serialize)]
pub struct BoundingBox {
    /// Minimum X coordinate (longitude)
    pub min_x: f64,
    /// Minimum Y coordinate (latitude)
    pub min_y: f64,
    /// Maximum X coordinate (longitude)
    pub max_x: f64,
    /// Maximum Y coordinate (latitude)
    pub max_y: f64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoundingBox({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl BoundingBox {
    /// Creates a new bounding box with the specified coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates the zero-area box of a single point.
    pub fn from_point(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, x, y)
    }

    /// An inverted box that any call to [`expand`](Self::expand) replaces.
    pub fn empty() -> BoundingBox {
        BoundingBox::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// Grows this box in place to cover `other`.
    pub fn expand(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Checks if this bounding box contains a point. Edges count as inside.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Checks if this bounding box is valid (min <= max, no NaN). The
    /// [`empty`](Self::empty) box is not.
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub(crate) fn to_aabb(self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }

    pub(crate) fn from_aabb(aabb: &AABB<[f64; 2]>) -> BoundingBox {
        let lower = aabb.lower();
        let upper = aabb.upper();
        BoundingBox::new(lower[0], lower[1], upper[0], upper[1])
    }
}
