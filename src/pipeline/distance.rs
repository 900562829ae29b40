use crate::types::geo::GeoPoint;

/// Meters per degree of great-circle arc on the mean Earth sphere.
const METERS_PER_DEGREE: f64 = 111_222.0;

/// Real routes wind; straight legs between route points run about 4% short.
const CURVINESS: f64 = 1.04;

/// Great-circle distance between two points in whole meters, scaled by the
/// curviness factor.
pub fn great_circle_distance(a: &GeoPoint, b: &GeoPoint) -> u64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lon = (a.lon - b.lon).to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * d_lon.cos();
    // rounding can push identical points just past 1.0
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    (CURVINESS * METERS_PER_DEGREE * angle.to_degrees()) as u64
}

/// Stores the running distance from the first point on every point and
/// returns the total.
pub fn accumulate_route_distances(points: &mut [GeoPoint]) -> u64 {
    let Some(first) = points.first_mut() else {
        return 0;
    };
    first.cumulative_distance = 0;

    let mut total = 0;
    for i in 1..points.len() {
        total += great_circle_distance(&points[i - 1], &points[i]);
        points[i].cumulative_distance = total;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_along_the_equator() {
        let mut points = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];

        let total = accumulate_route_distances(&mut points);

        assert_eq!(points[0].cumulative_distance, 0);
        let expected = 1.04 * 111_222.0;
        assert!((points[1].cumulative_distance as f64 - expected).abs() <= 1.0);
        assert_eq!(total, points[1].cumulative_distance);
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let a = GeoPoint::new(47.267, 11.392);
        assert_eq!(great_circle_distance(&a, &a.clone()), 0);
    }

    #[test]
    fn legs_accumulate_in_order() {
        let mut points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.5),
            GeoPoint::new(0.0, 0.5),
            GeoPoint::new(0.5, 0.5),
        ];

        let total = accumulate_route_distances(&mut points);
        let distances: Vec<u64> = points.iter().map(|p| p.cumulative_distance).collect();

        assert_eq!(distances[0], 0);
        assert!(distances[1] > 0);
        assert_eq!(distances[1], distances[2]);
        assert!(distances[3] > distances[2]);
        assert_eq!(total, distances[3]);
    }

    #[test]
    fn empty_and_single_point_routes() {
        assert_eq!(accumulate_route_distances(&mut []), 0);

        let mut single = vec![GeoPoint::new(10.0, 10.0)];
        assert_eq!(accumulate_route_distances(&mut single), 0);
        assert_eq!(single[0].cumulative_distance, 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(48.137, 11.575);
        let b = GeoPoint::new(47.267, 11.392);
        assert_eq!(great_circle_distance(&a, &b), great_circle_distance(&b, &a));
    }
}
