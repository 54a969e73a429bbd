//! Encoded polyline codec for route geometries.
//!
//! Routing backends ship route shapes in Google's encoded polyline format:
//! per point, a latitude delta then a longitude delta, each scaled by 1e5,
//! zig-zag signed and packed into 5-bit groups offset by 63. This module
//! decodes those strings into coordinate sequences and encodes them back.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Bounds, Coordinate};
use crate::haversine;

/// Fixed-point scale of the encoding (five decimal digits).
const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit chunk to land in printable ASCII.
const CHAR_OFFSET: u8 = 63;

/// Set on every chunk of a value except the last.
const CONTINUATION_BIT: i64 = 0x20;

const CHUNK_MASK: i64 = 0x1f;

/// Largest shift at which a further 5-bit chunk still fits in an `i64`.
const MAX_SHIFT: u32 = 55;

/// Scaled coordinates are clamped to this magnitude when encoding, so any
/// delta between two of them zig-zags into the 60 bits `decode` accepts.
const MAX_SCALED: i64 = (1 << 58) - 1;

/// Why a polyline string could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Malformation {
    /// Input ended before the final chunk of a value.
    #[error("input ends inside a value")]
    Truncated,
    /// A byte outside the `'?'..='~'` alphabet.
    #[error("invalid byte 0x{0:02x}")]
    InvalidByte(u8),
    /// A value with more chunks than fit in 64 bits.
    #[error("value exceeds 64 bits")]
    Overflow,
}

/// The only error the codec produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed polyline at byte {offset}: {reason}")]
pub struct MalformedPolyline {
    /// Byte offset where decoding stopped.
    pub offset: usize,
    pub reason: Malformation,
}

/// Decodes an encoded polyline into coordinates in path order.
///
/// The empty string decodes to an empty sequence.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, MalformedPolyline> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat_acc: i64 = 0;
    let mut lng_acc: i64 = 0;

    while index < bytes.len() {
        lat_acc = accumulate(lat_acc, decode_value(bytes, &mut index)?, index)?;
        lng_acc = accumulate(lng_acc, decode_value(bytes, &mut index)?, index)?;
        points.push(Coordinate::new(
            lat_acc as f64 / PRECISION,
            lng_acc as f64 / PRECISION,
        ));
    }

    Ok(points)
}

/// Encodes coordinates as a polyline string, latitude before longitude.
///
/// Coordinates are rounded to five decimal places. Out-of-range values are
/// clamped to about ±2.9e12 degrees and NaN encodes as 0, so such points do
/// not survive a round trip, but the output always decodes.
pub fn encode(points: &[Coordinate]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = scale(point.lat);
        let lng = scale(point.lng);
        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

/// Reads one zig-zag varint starting at `index`, advancing past it.
fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, MalformedPolyline> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let offset = *index;
        let byte = *bytes.get(offset).ok_or(MalformedPolyline {
            offset,
            reason: Malformation::Truncated,
        })?;
        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(MalformedPolyline {
                offset,
                reason: Malformation::InvalidByte(byte),
            });
        }
        if shift > MAX_SHIFT {
            return Err(MalformedPolyline {
                offset,
                reason: Malformation::Overflow,
            });
        }

        let chunk = i64::from(byte - CHAR_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        *index += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

fn accumulate(acc: i64, delta: i64, offset: usize) -> Result<i64, MalformedPolyline> {
    acc.checked_add(delta).ok_or(MalformedPolyline {
        offset,
        reason: Malformation::Overflow,
    })
}

fn encode_value(value: i64, out: &mut String) {
    let mut zigzag = (if value < 0 { !(value << 1) } else { value << 1 }) as u64;

    while zigzag >= CONTINUATION_BIT as u64 {
        out.push(chunk_char((zigzag & CHUNK_MASK as u64) as u8 | CONTINUATION_BIT as u8));
        zigzag >>= 5;
    }
    out.push(chunk_char(zigzag as u8));
}

fn chunk_char(chunk: u8) -> char {
    // chunk is at most 0x3f, so the sum stays inside '?'..='~'
    char::from(chunk + CHAR_OFFSET)
}

fn scale(degrees: f64) -> i64 {
    ((degrees * PRECISION).round() as i64).clamp(-MAX_SCALED, MAX_SCALED)
}

/// A route geometry as decoded coordinates.
///
/// Stores points directly for map rendering and distance work. The compact
/// string form only exists at the backend boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes a polyline string received from a routing backend.
    pub fn decode(encoded: &str) -> Result<Self, MalformedPolyline> {
        decode(encoded).map(Self::new)
    }

    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box to fit a map viewport to, `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.points)
    }

    /// Great-circle length of the path in meters.
    pub fn length_meters(&self) -> f64 {
        haversine::path_length_meters(&self.points)
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn canonical_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    #[test]
    fn test_decode_canonical() {
        assert_eq!(decode(CANONICAL).unwrap(), canonical_points());
    }

    #[test]
    fn test_encode_canonical() {
        assert_eq!(encode(&canonical_points()), CANONICAL);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").unwrap().is_empty());
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_truncated_mid_value() {
        let err = decode("_p~iF~ps|U_ulLnnqC_mqNvxq").unwrap_err();
        assert_eq!(err.reason, Malformation::Truncated);
        assert_eq!(err.offset, 25);
    }

    #[test]
    fn test_latitude_without_longitude() {
        // "_p~iF" is a complete latitude; the longitude never starts
        let err = decode("_p~iF").unwrap_err();
        assert_eq!(err, MalformedPolyline { offset: 5, reason: Malformation::Truncated });
    }

    #[test]
    fn test_invalid_byte() {
        let err = decode("_p~iF ps|U").unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.reason, Malformation::InvalidByte(b' '));
    }

    #[test]
    fn test_overlong_value() {
        let encoded = "~".repeat(20);
        let err = decode(&encoded).unwrap_err();
        assert_eq!(err.reason, Malformation::Overflow);
    }

    #[test]
    fn test_single_zero_point() {
        assert_eq!(encode(&[Coordinate::new(0.0, 0.0)]), "??");
        assert_eq!(decode("??").unwrap(), vec![Coordinate::new(0.0, 0.0)]);
    }

    #[test]
    fn test_repeated_point_kept() {
        let points = vec![Coordinate::new(1.0, 2.0), Coordinate::new(1.0, 2.0)];
        let decoded = decode(&encode(&points)).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded, points);
    }

    #[test]
    fn test_huge_values_still_decode() {
        let points = [
            Coordinate::new(1e300, -1e300),
            Coordinate::new(-1e300, 1e300),
            Coordinate::new(f64::INFINITY, f64::NAN),
        ];
        let decoded = decode(&encode(&points)).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[2].lng, 0.0);
    }

    #[test]
    fn test_error_display() {
        let err = decode("_p~iF").unwrap_err();
        assert_eq!(err.to_string(), "malformed polyline at byte 5: input ends inside a value");
    }

    #[test]
    fn test_polyline_wrapper() {
        let polyline = Polyline::decode(CANONICAL).unwrap();
        assert_eq!(polyline.len(), 3);
        assert!(!polyline.is_empty());
        assert_eq!(polyline.encode(), CANONICAL);
        assert_eq!(polyline.points(), &canonical_points()[..]);
        assert_eq!(polyline.clone().into_points(), canonical_points());
    }

    #[test]
    fn test_polyline_bounds() {
        let polyline = Polyline::decode(CANONICAL).unwrap();
        let bounds = polyline.bounds().unwrap();
        assert_eq!(bounds.north, 43.252);
        assert_eq!(bounds.west, -126.453);
        assert!(Polyline::default().bounds().is_none());
    }

    #[test]
    fn test_empty_polyline_length() {
        assert_eq!(Polyline::default().length_meters(), 0.0);
    }
}
