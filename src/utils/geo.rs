/// Spherical approximation, fine for neighborhood-scale search.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given as degrees,
/// by the haversine formula.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARSAW: (f64, f64) = (52.2297, 21.0122);
    const KRAKOW: (f64, f64) = (50.0647, 19.9450);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(WARSAW.0, WARSAW.1, WARSAW.0, WARSAW.1), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(WARSAW.0, WARSAW.1, KRAKOW.0, KRAKOW.1);
        let back = haversine_km(KRAKOW.0, KRAKOW.1, WARSAW.0, WARSAW.1);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn warsaw_to_krakow_is_about_two_hundred_fifty_km() {
        let km = haversine_km(WARSAW.0, WARSAW.1, KRAKOW.0, KRAKOW.1);
        assert!((km - 252.0).abs() < 5.0, "got {}", km);
    }
}
