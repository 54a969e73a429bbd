//! Great-circle distance and radius filtering.
//!
//! Uses the Haversine formula over a spherical Earth. Accurate to a few
//! tenths of a percent, which is plenty for "what's nearby" lists.

use rayon::prelude::*;

use crate::coordinate::Coordinate;
use crate::traits::Located;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters.
///
/// Identical points yield exactly zero and the result is symmetric in its
/// arguments.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Distance from `center` to each point, in input order.
pub fn distances_from(center: Coordinate, points: &[Coordinate]) -> Vec<f64> {
    points
        .par_iter()
        .map(|point| distance_meters(center, *point))
        .collect()
}

/// Total length of a path, summing consecutive segments.
pub fn path_length_meters(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}

/// Keeps the payloads whose coordinate lies within `radius_meters` of
/// `center`, inclusive, in input order.
///
/// Candidates with no coordinate, or one that is not usable, are skipped.
/// When `max_count` is given, only the first that many survivors are kept;
/// survivors are never re-sorted by distance.
pub fn filter_within_radius<T, I>(
    center: Coordinate,
    candidates: I,
    radius_meters: f64,
    max_count: Option<usize>,
) -> Vec<T>
where
    I: IntoIterator<Item = (Option<Coordinate>, T)>,
{
    let survivors = candidates.into_iter().filter_map(|(coord, payload)| {
        let coord = coord.filter(Coordinate::is_usable)?;
        (distance_meters(center, coord) <= radius_meters).then_some(payload)
    });

    match max_count {
        Some(limit) => survivors.take(limit).collect(),
        None => survivors.collect(),
    }
}

/// [`filter_within_radius`] for items that know their own location.
pub fn within_radius<T, I>(
    center: Coordinate,
    items: I,
    radius_meters: f64,
    max_count: Option<usize>,
) -> Vec<T>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    filter_within_radius(
        center,
        items.into_iter().map(|item| (item.location(), item)),
        radius_meters,
        max_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_meters(ORIGIN, ORIGIN), 0.0);
        let colombo = Coordinate::new(6.9271, 79.8612);
        assert_eq!(distance_meters(colombo, colombo), 0.0);
    }

    #[test]
    fn test_quarter_great_circle() {
        let dist = distance_meters(ORIGIN, Coordinate::new(0.0, 90.0));
        assert_abs_diff_eq!(dist, 10_007_543.0, epsilon = 1.0);
        let dist = distance_meters(ORIGIN, Coordinate::new(90.0, 0.0));
        assert_abs_diff_eq!(dist, 10_007_543.0, epsilon = 1.0);
    }

    #[test]
    fn test_antipodal_is_finite() {
        let dist = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(dist.is_finite());
        assert_abs_diff_eq!(dist, std::f64::consts::PI * EARTH_RADIUS_M, epsilon = 1.0);
        let dist = distance_meters(Coordinate::new(90.0, 0.0), Coordinate::new(-90.0, 0.0));
        assert!(dist.is_finite());
    }

    #[test]
    fn test_known_distance() {
        // Colombo Fort to Kandy, roughly 94 km as the crow flies
        let dist = distance_meters(Coordinate::new(6.9344, 79.8428), Coordinate::new(7.2906, 80.6337));
        assert!(dist > 90_000.0 && dist < 100_000.0, "Colombo to Kandy should be ~94km, got {}", dist);
    }

    #[test]
    fn test_symmetric() {
        let a = Coordinate::new(38.5, -120.2);
        let b = Coordinate::new(-33.8688, 151.2093);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn test_distances_from_preserves_order() {
        let points = [
            Coordinate::new(0.0, 2.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
        ];
        let dists = distances_from(ORIGIN, &points);
        assert_eq!(dists.len(), 3);
        assert!(dists[0] > dists[2]);
        assert_eq!(dists[1], 0.0);
    }

    #[test]
    fn test_path_length() {
        assert_eq!(path_length_meters(&[]), 0.0);
        assert_eq!(path_length_meters(&[ORIGIN]), 0.0);
        let points = [ORIGIN, Coordinate::new(0.0, 1.0), Coordinate::new(0.0, 2.0)];
        let direct = distance_meters(ORIGIN, Coordinate::new(0.0, 2.0));
        assert_abs_diff_eq!(path_length_meters(&points), direct, epsilon = 1e-6);
    }

    #[test]
    fn test_filter_skips_missing_and_unusable() {
        let candidates = vec![
            (None, "missing"),
            (Some(Coordinate::new(f64::NAN, 0.0)), "nan"),
            (Some(Coordinate::new(0.0, 200.0)), "out of range"),
            (Some(ORIGIN), "here"),
        ];
        let kept = filter_within_radius(ORIGIN, candidates, 1_000.0, None);
        assert_eq!(kept, vec!["here"]);
    }

    #[test]
    fn test_filter_truncates_stably() {
        let candidates = (0..5).map(|i| (Some(ORIGIN), i));
        assert_eq!(filter_within_radius(ORIGIN, candidates.clone(), 10.0, Some(3)), vec![0, 1, 2]);
        assert!(filter_within_radius(ORIGIN, candidates, 10.0, Some(0)).is_empty());
    }

    #[test]
    fn test_negative_radius_keeps_nothing() {
        let candidates = vec![(Some(ORIGIN), ())];
        assert!(filter_within_radius(ORIGIN, candidates, -1.0, None).is_empty());
    }

    #[test]
    fn test_within_radius_located() {
        let points = vec![Coordinate::new(0.0, 0.001), Coordinate::new(0.0, 1.0)];
        let kept = within_radius(ORIGIN, &points, 1_000.0, None);
        assert_eq!(kept, vec![&points[0]]);
    }
}
