//! SWEREF99 TM to WGS84 reprojection of GeoJSON geometries.
//!
//! The habitat survey is delivered in SWEREF99 TM (EPSG:3006), a transverse
//! mercator projection on the GRS80 ellipsoid with zero datum shift to WGS84.
//! Web maps expect geographic coordinates, so every habitat polygon is
//! reprojected before it is handed to the display layer.
//!
//! # Examples
//!
//! ```
//! use geo_types::coord;
//! use ustorp_core::reproject::SWEREF99_TM;
//!
//! let wgs84 = SWEREF99_TM.to_geographic(coord! { x: 500_000.0, y: 0.0 });
//! assert!((wgs84.x - 15.0).abs() < 1e-9);
//! assert!(wgs84.y.abs() < 1e-9);
//! ```

use geo_types::{Coord, coord};
use geojson::{Feature, FeatureCollection, Geometry, PointType, PolygonType, Value};

/// Reference ellipsoid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub semi_major_axis: f64,
    /// Inverse flattening
    pub inverse_flattening: f64,
}

/// GRS80, the ellipsoid of SWEREF99.
pub const GRS80: Ellipsoid = Ellipsoid {
    semi_major_axis: 6_378_137.0,
    inverse_flattening: 298.257_222_101,
};

impl Ellipsoid {
    /// First eccentricity squared.
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening;
        f * (2.0 - f)
    }
}

/// A transverse mercator projection definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Longitude of the central meridian in degrees
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// SWEREF99 TM: UTM zone 33 on GRS80, no datum shift to WGS84.
pub const SWEREF99_TM: TransverseMercator = TransverseMercator::utm_zone(33, GRS80);

impl TransverseMercator {
    /// Northern hemisphere UTM zone on the given ellipsoid.
    #[must_use]
    pub const fn utm_zone(zone: u8, ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            central_meridian: (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: 0.0,
        }
    }

    /// Converts a projected `(easting, northing)` to geographic
    /// `(longitude, latitude)` in degrees.
    ///
    /// Uses the footpoint-latitude series expansion, accurate to well below a
    /// millimetre within a UTM zone.
    #[must_use]
    pub fn to_geographic(&self, projected: Coord<f64>) -> Coord<f64> {
        let a = self.ellipsoid.semi_major_axis;
        let es = self.ellipsoid.eccentricity_squared();
        let k0 = self.scale_factor;

        let x = projected.x - self.false_easting;
        let m = (projected.y - self.false_northing) / k0;

        let mu = m / (a * (1.0 - es / 4.0 - 3.0 * es.powi(2) / 64.0 - 5.0 * es.powi(3) / 256.0));
        let e1 = (1.0 - (1.0 - es).sqrt()) / (1.0 + (1.0 - es).sqrt());
        let j1 = 3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0;
        let j2 = 21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0;
        let j3 = 151.0 * e1.powi(3) / 96.0;
        let j4 = 1097.0 * e1.powi(4) / 512.0;
        let fp = mu
            + j1 * (2.0 * mu).sin()
            + j2 * (4.0 * mu).sin()
            + j3 * (6.0 * mu).sin()
            + j4 * (8.0 * mu).sin();

        let ep2 = es / (1.0 - es);
        let c1 = ep2 * fp.cos().powi(2);
        let t1 = fp.tan().powi(2);
        let sin_fp2 = fp.sin().powi(2);
        let r1 = a * (1.0 - es) / (1.0 - es * sin_fp2).powf(1.5);
        let n1 = a / (1.0 - es * sin_fp2).sqrt();
        let d = x / (n1 * k0);

        let lat = fp
            - (n1 * fp.tan() / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);
        let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / fp.cos();

        coord! {
            x: self.central_meridian + lon.to_degrees(),
            y: lat.to_degrees(),
        }
    }
}

/// Reprojects one GeoJSON position from SWEREF99 TM to WGS84.
///
/// Ordinates beyond the second (elevation) are kept as they are. Positions
/// with fewer than two ordinates are returned unchanged.
#[must_use]
pub fn reproject_position(mut position: PointType) -> PointType {
    if position.len() >= 2 {
        let wgs84 = SWEREF99_TM.to_geographic(coord! { x: position[0], y: position[1] });
        position[0] = wgs84.x;
        position[1] = wgs84.y;
    }
    position
}

fn reproject_positions(positions: Vec<PointType>) -> Vec<PointType> {
    positions.into_iter().map(reproject_position).collect()
}

fn reproject_rings(rings: PolygonType) -> PolygonType {
    rings.into_iter().map(reproject_positions).collect()
}

/// Reprojects every coordinate of a geometry value, keeping its type and
/// nesting depth.
///
/// The value is consumed and a transformed value is returned; callers that
/// still need the projected original must clone it first. Geometry
/// collections are not reprojected and pass through unchanged.
#[must_use]
pub fn reproject_geometry(value: Value) -> Value {
    match value {
        Value::Point(position) => Value::Point(reproject_position(position)),
        Value::LineString(positions) => Value::LineString(reproject_positions(positions)),
        Value::MultiPoint(positions) => Value::MultiPoint(reproject_positions(positions)),
        Value::Polygon(rings) => Value::Polygon(reproject_rings(rings)),
        Value::MultiLineString(lines) => Value::MultiLineString(reproject_rings(lines)),
        Value::MultiPolygon(polygons) => {
            Value::MultiPolygon(polygons.into_iter().map(reproject_rings).collect())
        },
        other @ Value::GeometryCollection(_) => other,
    }
}

/// Reprojects a feature's geometry. The stale bounding box is dropped.
#[must_use]
pub fn reproject_feature(mut feature: Feature) -> Feature {
    if let Some(geometry) = feature.geometry.take() {
        feature.geometry = Some(Geometry {
            bbox: None,
            value: reproject_geometry(geometry.value),
            foreign_members: geometry.foreign_members,
        });
        feature.bbox = None;
    }
    feature
}

/// Reprojects every feature of a collection.
#[must_use]
pub fn reproject_feature_collection(mut collection: FeatureCollection) -> FeatureCollection {
    collection.features = collection
        .features
        .into_iter()
        .map(reproject_feature)
        .collect();
    collection.bbox = None;
    collection
}
