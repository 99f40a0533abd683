//! Geographic coordinate type.

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// A validated WGS-84 coordinate.
///
/// Latitude lies in `[-90, 90]`, longitude in `[-180, 180]`, and both are
/// finite. Serialized as `{"lat": .., "lon": ..}`.
///
/// # Examples
///
/// ```
/// use u_route_optimizer::models::GeoPoint;
///
/// let nyc = GeoPoint::new(40.7128, -74.0060).unwrap();
/// assert_eq!(nyc.latitude(), 40.7128);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = InvalidInput;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lon)
    }
}

impl GeoPoint {
    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidInput> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(InvalidInput::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            lat: latitude,
            lon: longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another point in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        crate::distance::haversine_km(self, other)
    }
}
