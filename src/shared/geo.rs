use crate::shared::types::Coordinates;

/// Earth's radius in meters (for Haversine formula)
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters
pub fn haversine_distance(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Posadas to Encarnación, roughly 4.9km across the Paraná
        let posadas = Coordinates::new(-27.3671, -55.8961);
        let encarnacion = Coordinates::new(-27.3300, -55.8700);

        let distance = haversine_distance(posadas, encarnacion);

        assert!(distance > 4_000.0 && distance < 6_000.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates::new(-27.3671, -55.8961);

        assert!(haversine_distance(point, point) < 1.0);
    }
}
