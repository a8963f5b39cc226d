use crate::error::{CivicError, Result};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Spherical haversine distance between two lat/lng points in meters.
pub fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_METERS * c
}

/// Validate a latitude/longitude pair in decimal degrees.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(CivicError::Validation(format!(
            "latitude {lat} out of range [-90, 90]"
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(CivicError::Validation(format!(
            "longitude {lng} out of range [-180, 180]"
        )));
    }
    Ok(())
}

/// Degree-space box guaranteed to contain every point within `radius_meters`
/// of the center. Used as a coarse prefilter before the exact haversine check.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// Bounding box around a center point. The longitude span widens with
/// latitude; near the poles or across the antimeridian it falls back to the
/// full [-180, 180] range rather than slicing the box in two.
pub fn bounding_box(lat: f64, lng: f64, radius_meters: f64) -> BoundingBox {
    let lat_delta = (radius_meters / EARTH_RADIUS_METERS).to_degrees();
    let cos_lat = lat.to_radians().cos();

    let lng_delta = if cos_lat.abs() < 1e-6 {
        180.0
    } else {
        (radius_meters / (EARTH_RADIUS_METERS * cos_lat)).to_degrees()
    };

    let (min_lng, max_lng) = if lng - lng_delta < -180.0 || lng + lng_delta > 180.0 {
        (-180.0, 180.0)
    } else {
        (lng - lng_delta, lng + lng_delta)
    };

    BoundingBox {
        min_lat: (lat - lat_delta).max(-90.0),
        max_lat: (lat + lat_delta).min(90.0),
        min_lng,
        max_lng,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_meters(12.97, 77.59, 12.97, 77.59), 0.0);
    }

    #[test]
    fn test_one_longitude_hundredth_near_equator() {
        // At 12.97°N, 0.01° of longitude is a bit over a kilometer.
        let d = haversine_meters(12.97, 77.59, 12.97, 77.60);
        assert!(d > 1000.0 && d < 1200.0, "Expected ~1.1km, got {d}m");
    }

    #[test]
    fn test_london_to_paris() {
        let d = haversine_meters(51.5007, -0.1246, 48.8566, 2.3522);
        assert!(
            (330_000.0..345_000.0).contains(&d),
            "Expected ~334km, got {d}m"
        );
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(validate_coordinates(12.97, 77.59).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_bounding_box_contains_radius_edge() {
        let bbox = bounding_box(12.97, 77.59, 5000.0);
        // Points just inside the radius along each axis must survive the prefilter.
        for (lat, lng) in [
            (12.97 + 0.0448, 77.59),
            (12.97 - 0.0448, 77.59),
            (12.97, 77.59 + 0.0459),
            (12.97, 77.59 - 0.0459),
        ] {
            let d = haversine_meters(12.97, 77.59, lat, lng);
            assert!(d <= 5000.0, "fixture point escaped the radius: {d}m");
            assert!(bbox.contains(lat, lng), "bbox dropped an in-radius point");
        }
    }

    #[test]
    fn test_bounding_box_widens_across_antimeridian() {
        let bbox = bounding_box(0.0, 179.99, 5000.0);
        assert_eq!(bbox.min_lng, -180.0);
        assert_eq!(bbox.max_lng, 180.0);
    }

    #[test]
    fn test_bounding_box_near_pole() {
        let bbox = bounding_box(89.9999, 0.0, 5000.0);
        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.min_lng, -180.0);
        assert_eq!(bbox.max_lng, 180.0);
    }
}
