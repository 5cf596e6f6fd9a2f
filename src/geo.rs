use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn validate(&self) -> AppResult<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::Validation(format!(
                "latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::Validation(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Great-circle distance between two coordinates via the haversine formula,
/// rounded to 2 decimal places. Out-of-range inputs are rejected rather than
/// clamped; callers with a missing coordinate must treat the distance as
/// unknown, never as zero.
pub fn distance_km(a: Coordinates, b: Coordinates) -> AppResult<f64> {
    a.validate()?;
    b.validate()?;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    let distance = EARTH_RADIUS_KM * c;

    Ok((distance * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identity() {
        let p = Coordinates::new(28.6139, 77.2090);
        assert_eq!(distance_km(p, p).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let delhi = Coordinates::new(28.6139, 77.2090);
        let mumbai = Coordinates::new(19.0760, 72.8777);
        assert_eq!(
            distance_km(delhi, mumbai).unwrap(),
            distance_km(mumbai, delhi).unwrap()
        );
    }

    #[test]
    fn test_distance_known_pair() {
        // Delhi to Mumbai is roughly 1150 km great-circle.
        let delhi = Coordinates::new(28.6139, 77.2090);
        let mumbai = Coordinates::new(19.0760, 72.8777);
        let d = distance_km(delhi, mumbai).unwrap();
        assert!((1100.0..1200.0).contains(&d), "unexpected distance {d}");
    }

    #[test]
    fn test_distance_rounded_to_two_decimals() {
        let a = Coordinates::new(12.9716, 77.5946);
        let b = Coordinates::new(13.0827, 80.2707);
        let d = distance_km(a, b).unwrap();
        assert_eq!(d, (d * 100.0).round() / 100.0);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let a = Coordinates::new(91.0, 0.0);
        let b = Coordinates::new(0.0, 0.0);
        assert!(distance_km(a, b).is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, -180.5);
        assert!(distance_km(a, b).is_err());
    }

    #[test]
    fn test_antipodal_points() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let d = distance_km(a, b).unwrap();
        // Half the Earth's circumference at the equator.
        assert!((20000.0..20050.0).contains(&d), "unexpected distance {d}");
    }
}
