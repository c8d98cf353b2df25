/// Great-circle distances along a recorded route.
///
/// Distances use the spherical law of cosines on a 6371 km Earth. The cosine
/// term is clamped before `acos` so rounding overshoot never yields NaN.
use geo::{point, Point};

pub const EARTH_RADIUS_M: f64 = 6371.0 * 1000.0;

/// One recorded sample: position (x = longitude, y = latitude, degrees) and elevation in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoint {
    pub position: Point<f64>,
    pub elevation: f64,
}

impl RoutePoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        RoutePoint {
            position: point!(x: longitude, y: latitude),
            elevation,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }
}

pub fn geodesic_distance(a: &Point<f64>, b: &Point<f64>) -> f64 {
    // sin² + cos² can land just under 1.0, which acos turns into centimeters
    if a == b {
        return 0.0;
    }

    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let delta_lon = b.x().to_radians() - a.x().to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();

    cosine.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
}

/// Running distance in meters from the first point; `[0]` is always 0.
pub fn cumulative_distances(points: &[RoutePoint]) -> Vec<f64> {
    if points.is_empty() {
        return vec![];
    }

    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cumulative.push(total);

    for pair in points.windows(2) {
        total += geodesic_distance(&pair[0].position, &pair[1].position);
        cumulative.push(total);
    }

    cumulative
}
