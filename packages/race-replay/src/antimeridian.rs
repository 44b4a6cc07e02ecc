//! antimeridian.rs — ±180° boundary math shared by interpolation and trails
//!
//! Two consecutive positions more than 180° of longitude apart are taken to
//! cross the antimeridian rather than the whole map. The crossing latitude is
//! interpolated with each end weighted by its longitude distance to the
//! boundary, which is a plain lon/lat approximation (no great-circle math).

use race_types::LonLat;

/// Longitude difference above which a straight step is taken to wrap.
pub const WRAP_THRESHOLD_DEG: f64 = 180.0;

pub fn crosses(from_lon: f64, to_lon: f64) -> bool {
    (from_lon - to_lon).abs() > WRAP_THRESHOLD_DEG
}

/// The ±180 boundary on the same side as `lon` (0 maps to -180).
pub fn boundary_longitude(lon: f64) -> f64 {
    if lon > 0.0 {
        180.0
    } else {
        -180.0
    }
}

pub fn is_on_boundary(lon: f64) -> bool {
    lon.abs() == 180.0
}

/// Longitude distance from each end to the boundary, `(w1, w2)`.
fn weights(prev: LonLat, next: LonLat) -> (f64, f64) {
    (180.0 - prev.lon.abs(), 180.0 - next.lon.abs())
}

/// Fraction of the `prev → next` crossing spent before reaching the boundary.
/// Both ends exactly on the boundary split the step in half.
pub fn boundary_fraction(prev: LonLat, next: LonLat) -> f64 {
    let (w1, w2) = weights(prev, next);
    let total = w1 + w2;
    if total <= 0.0 {
        0.5
    } else {
        w1 / total
    }
}

/// Latitude at which the `prev → next` step meets the antimeridian.
pub fn boundary_latitude(prev: LonLat, next: LonLat) -> f64 {
    boundary_fraction(prev, next) * (next.lat - prev.lat) + prev.lat
}
