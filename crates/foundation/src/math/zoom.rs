/// `(max footprint diameter in meters, zoom)` buckets, smallest first.
const ZOOM_STEPS: [(f64, u8); 9] = [
    (200.0, 14),
    (500.0, 13),
    (1_000.0, 12),
    (2_000.0, 11),
    (5_000.0, 10),
    (10_000.0, 9),
    (20_000.0, 8),
    (50_000.0, 7),
    (100_000.0, 6),
];

/// Zoom used once a footprint outgrows every bucket.
pub const MIN_FOOTPRINT_ZOOM: u8 = 5;

/// Map zoom level that frames a footprint of `diameter_m`.
///
/// Monotonic non-increasing in the input. Non-finite sizes fall through to
/// [`MIN_FOOTPRINT_ZOOM`].
pub fn zoom_for_footprint(diameter_m: f64) -> u8 {
    ZOOM_STEPS
        .iter()
        .find(|(max_m, _)| diameter_m <= *max_m)
        .map(|(_, zoom)| *zoom)
        .unwrap_or(MIN_FOOTPRINT_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::{MIN_FOOTPRINT_ZOOM, zoom_for_footprint};

    #[test]
    fn known_buckets() {
        assert_eq!(zoom_for_footprint(150.0), 14);
        assert_eq!(zoom_for_footprint(200.0), 14);
        assert_eq!(zoom_for_footprint(600.0), 12);
        assert_eq!(zoom_for_footprint(1_000.0), 12);
        assert_eq!(zoom_for_footprint(60_000.0), 6);
        assert_eq!(zoom_for_footprint(250_000.0), MIN_FOOTPRINT_ZOOM);
        assert_eq!(zoom_for_footprint(f64::NAN), MIN_FOOTPRINT_ZOOM);
    }

    #[test]
    fn monotonic_non_increasing() {
        let mut prev = u8::MAX;
        let mut size = 1.0;
        while size < 1.0e6 {
            let z = zoom_for_footprint(size);
            assert!(z <= prev, "zoom rose at {size} m");
            prev = z;
            size *= 1.07;
        }
    }
}
