//! Numeric helpers shared by the plotting and scanning code.

pub mod safe_cast;

use crate::constants::ROUNDING_EPSILON;

/// Round `number` up to `floor + acc`, or to the next integer when the
/// fractional part is already past `acc`.
///
/// With `acc = 0.4`: `4.3 -> 4.4`, `4.4 -> 4.4`, `4.5 -> 5.0`.
#[must_use]
pub fn upper_bound(number: f64, acc: f64) -> f64 {
    let integer_part = number.floor();
    let fraction = number - integer_part;
    if fraction < acc || (fraction - acc).abs() < ROUNDING_EPSILON {
        integer_part + acc
    } else {
        integer_part + 1.0
    }
}

/// Round `number` down to `floor + acc`, or to `floor` when the fractional
/// part has not reached `acc`.
///
/// With `acc = 0.4`: `4.5 -> 4.4`, `4.4 -> 4.4`, `4.3 -> 4.0`.
#[must_use]
pub fn lower_bound(number: f64, acc: f64) -> f64 {
    let integer_part = number.floor();
    let fraction = number - integer_part;
    if fraction > acc || (fraction - acc).abs() < ROUNDING_EPSILON {
        integer_part + acc
    } else {
        integer_part
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound() {
        assert!((upper_bound(4.3, 0.4) - 4.4).abs() < 1e-12);
        assert!((upper_bound(4.4, 0.4) - 4.4).abs() < 1e-12);
        assert!((upper_bound(4.5, 0.4) - 5.0).abs() < 1e-12);
        assert!((upper_bound(1.05, 0.3) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_lower_bound() {
        assert!((lower_bound(4.5, 0.4) - 4.4).abs() < 1e-12);
        assert!((lower_bound(4.4, 0.4) - 4.4).abs() < 1e-12);
        assert!((lower_bound(4.3, 0.4) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_enclose_value() {
        for &value in &[-1.35, -0.2, 0.12, 0.95, 1.3, 1.71, 2.0, 2.49] {
            assert!(lower_bound(value, 0.3) <= value + ROUNDING_EPSILON, "lower bound of {value}");
            assert!(upper_bound(value, 0.3) >= value - ROUNDING_EPSILON, "upper bound of {value}");
        }
    }

    #[test]
    fn test_negative_values_round_outwards() {
        assert!((upper_bound(-0.2, 0.3) - 0.0).abs() < 1e-12);
        assert!((lower_bound(-0.2, 0.3) + 0.7).abs() < 1e-12);
    }
}
