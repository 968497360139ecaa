use crate::models::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance between two coordinates.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    EARTH_RADIUS_KM * 2.0 * haversine.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::haversine_km;
    use crate::models::GeoPoint;

    #[test]
    fn same_hub_is_zero_km_apart() {
        let tuticorin = GeoPoint {
            lat: 8.7642,
            lng: 78.1348,
        };
        assert!(haversine_km(&tuticorin, &tuticorin) < 1e-9);
    }

    #[test]
    fn chennai_to_madurai_is_roughly_420_km() {
        let chennai = GeoPoint {
            lat: 13.0827,
            lng: 80.2707,
        };
        let madurai = GeoPoint {
            lat: 9.9252,
            lng: 78.1198,
        };
        let distance = haversine_km(&chennai, &madurai);
        assert!((distance - 422.0).abs() < 20.0, "got {distance}");
    }
}
