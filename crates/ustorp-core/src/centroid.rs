//! Label positions for habitat polygons.
//!
//! The label anchor of an area is the *vertex centroid* of its outer ring:
//! the arithmetic mean of the ring's vertices. This is an approximation. It
//! is not the area-weighted centroid, it ignores holes and the remaining
//! parts of a multi-polygon, and it is skewed towards densely digitised
//! edges. It is good enough to place a label and must not be used where a
//! true centroid is needed.

use geojson::{Position, Value};

use crate::types::LatLng;

/// Position returned for geometries that have no polygon ring.
pub const FALLBACK: LatLng = LatLng::new(0.0, 0.0);

/// Approximate centroid of a Polygon or MultiPolygon, in `(lat, lng)` order.
///
/// Polygons use their outer ring; multi-polygons use the outer ring of their
/// first polygon. A closing vertex repeating the first one is counted like
/// any other vertex. Other geometry types, and empty rings, yield
/// [`FALLBACK`].
///
/// # Examples
///
/// ```
/// use geojson::Value;
/// use ustorp_core::centroid::vertex_centroid;
///
/// let square = Value::Polygon(vec![vec![
///     vec![0.0, 0.0],
///     vec![0.0, 2.0],
///     vec![2.0, 2.0],
///     vec![2.0, 0.0],
/// ]]);
/// let center = vertex_centroid(&square);
/// assert_eq!((center.lat, center.lng), (1.0, 1.0));
/// ```
#[must_use]
pub fn vertex_centroid(geometry: &Value) -> LatLng {
    let ring = match geometry {
        Value::Polygon(rings) => rings.first(),
        Value::MultiPolygon(polygons) => polygons.first().and_then(|rings| rings.first()),
        _ => None,
    };

    ring.and_then(|ring| ring_mean(ring)).unwrap_or(FALLBACK)
}

fn ring_mean(ring: &[Position]) -> Option<LatLng> {
    if ring.is_empty() {
        return None;
    }

    let (sum_lng, sum_lat) = ring.iter().fold((0.0, 0.0), |(lng, lat), position| {
        let x = position.first().copied().unwrap_or(0.0);
        let y = position.get(1).copied().unwrap_or(0.0);
        (lng + x, lat + y)
    });

    #[allow(clippy::cast_precision_loss)]
    let count = ring.len() as f64;
    Some(LatLng::new(sum_lat / count, sum_lng / count))
}
