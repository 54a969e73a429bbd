use proptest::prelude::*;

use trip_companion::polyline::{self, Malformation};
use trip_companion::{Coordinate, Polyline};

mod fixtures;

const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

#[test]
fn decodes_canonical_google_example() {
    let points = polyline::decode(CANONICAL).expect("canonical polyline decodes");
    assert_eq!(
        points,
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    );
}

#[test]
fn empty_string_is_empty_path() {
    assert_eq!(polyline::decode("").unwrap(), Vec::new());
}

#[test]
fn truncated_input_is_malformed() {
    let err = polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq").unwrap_err();
    assert_eq!(err.reason, Malformation::Truncated);
}

#[test]
fn every_proper_prefix_of_a_point_is_malformed() {
    // the first point spans bytes 0..10
    for end in 1..10 {
        let prefix = &CANONICAL[..end];
        assert!(polyline::decode(prefix).is_err(), "prefix {:?} should not decode", prefix);
    }
    assert_eq!(polyline::decode(&CANONICAL[..10]).unwrap().len(), 1);
}

#[test]
fn real_route_round_trips() {
    let route: Vec<Coordinate> = fixtures::all_locations().iter().map(|loc| loc.coord()).collect();
    let encoded = polyline::encode(&route);
    let decoded = Polyline::decode(&encoded).unwrap();
    assert_eq!(decoded.points(), &route[..]);
}

proptest! {
    /// Property: decode(encode(c)) matches c to five decimals.
    #[test]
    fn round_trip_within_precision(
        raw in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..40),
    ) {
        let points: Vec<Coordinate> = raw.into_iter().map(Coordinate::from).collect();
        let decoded = polyline::decode(&polyline::encode(&points)).unwrap();

        prop_assert_eq!(decoded.len(), points.len());
        for (got, want) in decoded.iter().zip(&points) {
            prop_assert!((got.lat - want.lat).abs() <= 1e-5, "lat {} vs {}", got.lat, want.lat);
            prop_assert!((got.lng - want.lng).abs() <= 1e-5, "lng {} vs {}", got.lng, want.lng);
        }
    }

    /// Property: encoded output only uses the polyline alphabet.
    #[test]
    fn encoded_alphabet(
        raw in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 1..20),
    ) {
        let points: Vec<Coordinate> = raw.into_iter().map(Coordinate::from).collect();
        let encoded = polyline::encode(&points);
        prop_assert!(encoded.bytes().all(|b| (b'?'..=b'~').contains(&b)));
    }

    /// Property: whatever encode produces, decode accepts.
    #[test]
    fn encoded_output_always_decodes(
        raw in prop::collection::vec((any::<f64>(), any::<f64>()), 0..10),
    ) {
        let points: Vec<Coordinate> = raw.into_iter().map(Coordinate::from).collect();
        let decoded = polyline::decode(&polyline::encode(&points));
        prop_assert!(decoded.is_ok(), "{:?}", decoded);
        prop_assert_eq!(decoded.unwrap().len(), points.len());
    }

    /// Property: decoding arbitrary bytes never panics.
    #[test]
    fn decode_is_total(input in "\\PC{0,40}") {
        let _ = polyline::decode(&input);
    }
}
