/// Mean earth radius in miles, as used for all distances in this workspace
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Great circle distance in miles between two points given in decimal degrees.
///
/// Uses the haversine formula. No validation is done on the input: NaN coordinates yield NaN.
pub fn haversine_miles(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1, lon2, lat2) = (
        lon1.to_radians(),
        lat1.to_radians(),
        lon2.to_radians(),
        lat2.to_radians(),
    );

    let d_lon = lon2 - lon1;
    let d_lat = lat2 - lat1;
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    c * EARTH_RADIUS_MILES
}
