//! Geometry types for tile footprints and query points.
//!
//! Footprints are planar polygons in raw longitude/latitude degrees; no
//! projection is applied, x is longitude and y is latitude.
//!
//! Containment is boundary-inclusive: a point lying on any edge or vertex of
//! a polygon counts as contained. Two tiles that share an edge therefore both
//! contain the points of that edge.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::bounding_box::BoundingBox;
use crate::errors::GeometryError;

/// Collinearity tolerance for the on-edge test.
const EDGE_EPSILON: f64 = 1e-10;

/// A 2D coordinate (x = longitude, y = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

impl From<GeoPoint> for Coordinate {
    fn from(point: GeoPoint) -> Self {
        point.to_coordinate()
    }
}

impl From<&GeoPoint> for Coordinate {
    fn from(point: &GeoPoint) -> Self {
        point.to_coordinate()
    }
}

/// A geographic point with validated latitude and longitude.
///
/// The constructor takes `(latitude, longitude)`, the order geocoders and
/// people use, while the index works in `(x, y) = (longitude, latitude)`.
///
/// ```rust
/// use tile_index::GeoPoint;
///
/// let minneapolis = GeoPoint::new(45.0, -93.265).unwrap();
/// assert_eq!(minneapolis.latitude(), 45.0);
/// assert_eq!(minneapolis.longitude(), -93.265);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a new GeoPoint with validated geographic coordinates.
    ///
    /// # Errors
    /// Returns an error if latitude is outside [-90, 90] or longitude
    /// outside [-180, 180] (NaN is rejected too).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeometryError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryError::InvalidCoordinate(format!(
                "Latitude must be between -90 and 90 degrees, got: {}",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeometryError::InvalidCoordinate(format!(
                "Longitude must be between -180 and 180 degrees, got: {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Converts to a Coordinate (x=longitude, y=latitude).
    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeoPoint(lat={:.6}, lon={:.6})",
            self.latitude, self.longitude
        )
    }
}

/// A polygon with an exterior ring and optional interior holes.
///
/// Rings are stored closed (first coordinate repeated at the end). The
/// constructor closes an open ring, so `[(0,0), (0,2), (2,2), (2,0)]` is a
/// valid square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Vec<Coordinate>,
    holes: Vec<Vec<Coordinate>>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Creates a new polygon with an exterior ring and holes.
    ///
    /// # Errors
    /// Returns an error if a ring has fewer than 3 distinct positions or
    /// contains a non-finite coordinate.
    pub fn new(
        exterior: Vec<Coordinate>,
        holes: Vec<Vec<Coordinate>>,
    ) -> Result<Self, GeometryError> {
        let exterior = close_ring(exterior)?;
        let holes = holes
            .into_iter()
            .map(close_ring)
            .collect::<Result<Vec<_>, _>>()?;

        let mut bbox = BoundingBox::empty();
        for c in &exterior {
            bbox.expand(&BoundingBox::from_point(c.x, c.y));
        }

        Ok(Self {
            exterior,
            holes,
            bbox,
        })
    }

    /// Creates a simple polygon without holes.
    pub fn simple(coordinates: Vec<Coordinate>) -> Result<Self, GeometryError> {
        Self::new(coordinates, vec![])
    }

    /// Creates a simple polygon from `(x, y)` tuples.
    pub fn from_tuples(coordinates: &[(f64, f64)]) -> Result<Self, GeometryError> {
        Self::simple(coordinates.iter().copied().map(Coordinate::from).collect())
    }

    /// Parses a WKT `POLYGON ((x y, ...), (hole), ...)` string.
    pub fn from_wkt(wkt: &str) -> Result<Self, GeometryError> {
        let wkt = wkt.trim();
        let rest = wkt
            .get(..7)
            .filter(|tag| tag.eq_ignore_ascii_case("POLYGON"))
            .map(|_| &wkt[7..])
            .ok_or_else(|| GeometryError::Wkt(format!("Expected POLYGON, got: {}", wkt)))?;

        let mut rings = parse_ring_list(rest)?.into_iter();
        let exterior = rings
            .next()
            .ok_or_else(|| GeometryError::Wkt("POLYGON must have at least one ring".into()))?;
        Self::new(exterior, rings.collect())
    }

    /// Gets the exterior ring coordinates.
    pub fn exterior(&self) -> &[Coordinate] {
        &self.exterior
    }

    /// Gets the interior holes.
    pub fn holes(&self) -> &[Vec<Coordinate>] {
        &self.holes
    }

    /// Gets the bounding box of the exterior ring.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Checks if a point is inside this polygon or on its boundary.
    ///
    /// A point strictly inside a hole is outside the polygon; a point on a
    /// hole's ring is on the polygon boundary and therefore contained.
    pub fn contains_point(&self, point: &Coordinate) -> bool {
        if !point.is_finite() || !self.bbox.contains_point(point.x, point.y) {
            return false;
        }

        match locate(point, &self.exterior) {
            Location::Outside => false,
            Location::Boundary => true,
            Location::Inside => self
                .holes
                .iter()
                .all(|hole| locate(point, hole) != Location::Inside),
        }
    }
}

impl Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POLYGON(")?;
        for (r, ring) in std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .enumerate()
        {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "(")?;
            for (i, c) in ring.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} {}", c.x, c.y)?;
            }
            write!(f, ")")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Inside,
    Boundary,
    Outside,
}

fn close_ring(mut ring: Vec<Coordinate>) -> Result<Vec<Coordinate>, GeometryError> {
    if let Some(bad) = ring.iter().find(|c| !c.is_finite()) {
        return Err(GeometryError::InvalidCoordinate(format!(
            "Ring coordinate must be finite, got: {}",
            bad
        )));
    }
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    if ring.len() < 4 {
        return Err(GeometryError::InvalidRing(format!(
            "Polygon ring requires at least 3 distinct points, got {}",
            ring.len().saturating_sub(1)
        )));
    }
    Ok(ring)
}

/// Classifies `point` against a closed ring: on an edge first, then ray casting.
fn locate(point: &Coordinate, ring: &[Coordinate]) -> Location {
    for edge in ring.windows(2) {
        if on_edge(point, &edge[0], &edge[1]) {
            return Location::Boundary;
        }
    }

    let mut inside = false;
    for edge in ring.windows(2) {
        let (a, b) = (&edge[0], &edge[1]);
        if ((a.y > point.y) != (b.y > point.y))
            && (point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x)
        {
            inside = !inside;
        }
    }

    if inside {
        Location::Inside
    } else {
        Location::Outside
    }
}

/// Checks if `q` lies on the segment `p`..`r`.
fn on_edge(q: &Coordinate, p: &Coordinate, r: &Coordinate) -> bool {
    let cross = (r.x - p.x) * (q.y - p.y) - (r.y - p.y) * (q.x - p.x);
    cross.abs() < EDGE_EPSILON
        && q.x <= p.x.max(r.x)
        && q.x >= p.x.min(r.x)
        && q.y <= p.y.max(r.y)
        && q.y >= p.y.min(r.y)
}

fn strip_parens(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix('(').unwrap_or(s);
    s.strip_suffix(')').unwrap_or(s)
}

fn parse_coordinate_list(s: &str) -> Result<Vec<Coordinate>, GeometryError> {
    let s = strip_parens(s);
    if s.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut coords = vec![];
    for pair in s.split(',') {
        let parts: Vec<&str> = pair.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(GeometryError::Wkt(format!(
                "Invalid coordinate pair: {}",
                pair.trim()
            )));
        }
        let x: f64 = parts[0]
            .parse()
            .map_err(|_| GeometryError::Wkt(format!("Invalid x coordinate: {}", parts[0])))?;
        let y: f64 = parts[1]
            .parse()
            .map_err(|_| GeometryError::Wkt(format!("Invalid y coordinate: {}", parts[1])))?;
        coords.push(Coordinate::new(x, y));
    }
    Ok(coords)
}

fn parse_ring_list(s: &str) -> Result<Vec<Vec<Coordinate>>, GeometryError> {
    let s = strip_parens(s);

    let mut rings = vec![];
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in s.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| GeometryError::Wkt("Unbalanced parentheses".into()))?;
                current.push(ch);
                if depth == 0 {
                    let coords = parse_coordinate_list(&current)?;
                    if !coords.is_empty() {
                        rings.push(coords);
                    }
                    current.clear();
                }
            }
            // commas between rings
            ',' if depth == 0 => {}
            _ => current.push(ch),
        }
    }

    if depth != 0 {
        return Err(GeometryError::Wkt("Unbalanced parentheses".into()));
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::from_tuples(&[
            (x0, y0),
            (x0, y0 + size),
            (x0 + size, y0 + size),
            (x0 + size, y0),
        ])
        .unwrap()
    }

    #[test]
    fn test_geopoint_valid() {
        let gp = GeoPoint::new(45.0, -93.265).unwrap();
        assert_eq!(gp.to_coordinate(), Coordinate::new(-93.265, 45.0));
    }

    #[test]
    fn test_geopoint_invalid() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_open_ring_is_closed() {
        let polygon = square(0.0, 0.0, 2.0);
        assert_eq!(polygon.exterior().len(), 5);
        assert_eq!(polygon.exterior()[0], polygon.exterior()[4]);
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let result = Polygon::from_tuples(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(result, Err(GeometryError::InvalidRing(_))));

        let result = Polygon::from_tuples(&[(0.0, 0.0), (1.0, f64::NAN), (1.0, 0.0)]);
        assert!(matches!(result, Err(GeometryError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_bounding_box() {
        let polygon = Polygon::from_tuples(&[(0.0, 0.0), (1.0, 3.0), (4.0, 0.5)]).unwrap();
        assert_eq!(polygon.bounding_box(), BoundingBox::new(0.0, 0.0, 4.0, 3.0));
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let polygon = square(0.0, 0.0, 2.0);
        assert!(polygon.contains_point(&Coordinate::new(1.0, 1.0)));
        assert!(!polygon.contains_point(&Coordinate::new(3.0, 1.0)));
        assert!(!polygon.contains_point(&Coordinate::new(f64::NAN, 1.0)));
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let polygon = square(0.0, 0.0, 2.0);
        assert!(polygon.contains_point(&Coordinate::new(2.0, 1.0))); // right edge
        assert!(polygon.contains_point(&Coordinate::new(0.0, 1.0))); // left edge
        assert!(polygon.contains_point(&Coordinate::new(1.0, 2.0))); // top edge
        assert!(polygon.contains_point(&Coordinate::new(0.0, 0.0))); // vertex
        assert!(polygon.contains_point(&Coordinate::new(2.0, 2.0))); // vertex
    }

    #[test]
    fn test_triangle_hypotenuse_is_boundary() {
        let triangle = Polygon::from_tuples(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]).unwrap();
        assert!(triangle.contains_point(&Coordinate::new(2.0, 2.0)));
        assert!(!triangle.contains_point(&Coordinate::new(2.5, 2.5)));
        // inside the bbox but outside the triangle
        assert!(!triangle.contains_point(&Coordinate::new(3.5, 3.5)));
    }

    #[test]
    fn test_holes() {
        let outer = square(0.0, 0.0, 10.0).exterior().to_vec();
        let hole = square(4.0, 4.0, 2.0).exterior().to_vec();
        let polygon = Polygon::new(outer, vec![hole]).unwrap();

        assert!(polygon.contains_point(&Coordinate::new(1.0, 1.0)));
        assert!(!polygon.contains_point(&Coordinate::new(5.0, 5.0)));
        // hole ring is part of the polygon boundary
        assert!(polygon.contains_point(&Coordinate::new(4.0, 5.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards
        let polygon = Polygon::from_tuples(&[
            (0.0, 0.0),
            (0.0, 3.0),
            (1.0, 3.0),
            (1.0, 1.0),
            (2.0, 1.0),
            (2.0, 3.0),
            (3.0, 3.0),
            (3.0, 0.0),
        ])
        .unwrap();
        assert!(polygon.contains_point(&Coordinate::new(0.5, 2.5)));
        assert!(!polygon.contains_point(&Coordinate::new(1.5, 2.5)));
        assert!(polygon.contains_point(&Coordinate::new(1.5, 0.5)));
    }

    #[test]
    fn test_from_wkt() {
        let polygon = Polygon::from_wkt("POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))").unwrap();
        assert_eq!(polygon, square(0.0, 0.0, 2.0));

        let with_hole =
            Polygon::from_wkt("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))")
                .unwrap();
        assert_eq!(with_hole.holes().len(), 1);
    }

    #[test]
    fn test_from_wkt_errors() {
        assert!(matches!(
            Polygon::from_wkt("POINT (1 2)"),
            Err(GeometryError::Wkt(_))
        ));
        assert!(matches!(
            Polygon::from_wkt("POLYGON ((0 0, 1 x, 2 2))"),
            Err(GeometryError::Wkt(_))
        ));
        assert!(matches!(
            Polygon::from_wkt("POLYGON ((0 0, 1 1, 2 0)"),
            Err(GeometryError::Wkt(_))
        ));
        assert!(Polygon::from_wkt("POLYGON EMPTY").is_err());
    }

    #[test]
    fn test_display_round_trips_through_wkt() {
        let polygon = square(-93.5, 45.0, 0.0625);
        let parsed = Polygon::from_wkt(&polygon.to_string()).unwrap();
        assert_eq!(parsed, polygon);
    }
}
