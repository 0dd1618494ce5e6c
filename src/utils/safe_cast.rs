//! Casting helpers between raster indices and floating point coordinates

/// Convert a raster index or count to f64
///
/// Exact for every value below 2^53, far beyond any raster size.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Raster indices are far below 2^53
pub fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Clamp and convert f64 to a pixel index in `0..=max`
///
/// Non-finite values map to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_sign_loss)] // Clamped to non-negative
#[allow(clippy::cast_precision_loss)] // Acceptable for clamping bounds
pub fn f64_to_usize_clamp(value: f64, max: usize) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let clamped = value.clamp(0.0, max as f64);
    (clamped as usize).min(max)
}

/// Round and clamp f64 into the `u16` range (depth readings in millimetres)
///
/// Non-finite values map to 0.
#[must_use]
pub fn f64_to_u16_clamp(value: f64) -> u16 {
    let clamped = f64_to_usize_clamp(value.round(), usize::from(u16::MAX));
    u16::try_from(clamped).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_f64_to_u16_clamp() {
        assert_eq!(f64_to_u16_clamp(1499.6), 1500);
        assert_eq!(f64_to_u16_clamp(-3.0), 0);
        assert_eq!(f64_to_u16_clamp(70_000.0), u16::MAX);
        assert_eq!(f64_to_u16_clamp(f64::NAN), 0);
    }

    #[test]
    fn test_usize_to_f64() {
        assert_eq!(usize_to_f64(0), 0.0);
        assert_eq!(usize_to_f64(511), 511.0);
        assert_eq!(usize_to_f64(512 * 424), 217_088.0);
    }

    #[test]
    fn test_f64_to_usize_clamp() {
        assert_eq!(f64_to_usize_clamp(50.0, 100), 50);
        assert_eq!(f64_to_usize_clamp(-10.0, 100), 0);
        assert_eq!(f64_to_usize_clamp(150.0, 100), 100);
        assert_eq!(f64_to_usize_clamp(f64::NAN, 100), 0);
        assert_eq!(f64_to_usize_clamp(f64::NEG_INFINITY, 100), 0);
        assert_eq!(f64_to_usize_clamp(f64::INFINITY, 100), 0);
        assert_eq!(f64_to_usize_clamp(7.5, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_clamp_always_within_bounds(value in any::<f64>(), max in 0usize..10_000) {
            prop_assert!(f64_to_usize_clamp(value, max) <= max);
        }

        #[test]
        fn prop_index_roundtrip(value in 0usize..10_000_000) {
            prop_assert_eq!(f64_to_usize_clamp(usize_to_f64(value), usize::MAX), value);
        }
    }
}
