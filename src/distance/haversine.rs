//! Great-circle distance on a spherical Earth.

use crate::models::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Symmetric and exactly zero for identical points. The `asin` argument is
/// clamped to `[-1, 1]`, so antipodal and polar inputs never produce NaN.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::GeoPoint;
/// use u_route_optimizer::distance::haversine_km;
///
/// let a = GeoPoint::new(0.0, 0.0).unwrap();
/// let b = GeoPoint::new(0.0, 1.0).unwrap();
/// assert!((haversine_km(&a, &b) - 111.195).abs() < 0.01);
/// ```
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().clamp(-1.0, 1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).expect("valid")
    }

    #[test]
    fn test_same_point_is_zero() {
        let a = p(50.0, 14.0);
        assert_eq!(haversine_km(&a, &a), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = p(40.7128, -74.0060);
        let b = p(40.6782, -73.9442);
        assert_eq!(haversine_km(&a, &b), haversine_km(&b, &a));
    }

    #[test]
    fn test_prague_brno() {
        // Roughly 185 km straight line.
        let d = haversine_km(&p(50.0755, 14.4378), &p(49.1951, 16.6068));
        assert!((d - 185.0).abs() < 5.0);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine_km(&p(0.0, 0.0), &p(0.0, 180.0));
        assert!(!d.is_nan());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian_and_poles() {
        let d = haversine_km(&p(10.0, 179.9), &p(10.0, -179.9));
        assert!(d < 25.0);
        let d = haversine_km(&p(90.0, 0.0), &p(-90.0, 0.0));
        assert!(d.is_finite());
        let d = haversine_km(&p(90.0, 45.0), &p(90.0, -135.0));
        assert!(d.abs() < 1e-6);
    }
}
