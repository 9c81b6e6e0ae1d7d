//! Level-derived scalar bonuses
//!
//! Pure functions mapping (current level, max level, curve parameters)
//! to a bonus coefficient under one of the named curve shapes.

use serde::{Deserialize, Serialize};

use super::round3;

/// Shape of the level-to-coefficient curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingCurve {
    /// Linear interpolation from 1 to the max-level coefficient.
    Flat,
    /// Exponential interpolation from 1 to the max-level coefficient.
    #[default]
    Multiplicative,
    /// Linear decay from 1.0 down to 0.25 at max level.
    ReverseMultiplicative,
}

/// Coefficient for a level under the given curve, rounded to 3 decimal
/// places. Starts from 1 at level 0 (the reverse curve starts from 1
/// and decays instead).
pub fn coefficient(
    curve: ScalingCurve,
    level: u32,
    max_level: u32,
    max_level_coefficient: f64,
) -> f64 {
    let progress = level as f64 / max_level as f64;
    match curve {
        ScalingCurve::Flat => 1.0 + round3((max_level_coefficient - 1.0) * progress),
        ScalingCurve::Multiplicative => round3(max_level_coefficient.powf(progress)),
        ScalingCurve::ReverseMultiplicative => round3(1.0 - 0.75 * progress),
    }
}

/// Additive level bonus, interpolated from 0 at level 0 to
/// `max_level_bonus` at max level. Starts from 0, unlike coefficients.
pub fn level_bonus(level: u32, max_level: u32, max_level_bonus: f64) -> f64 {
    max_level_bonus * level as f64 / max_level as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_endpoints() {
        assert_eq!(coefficient(ScalingCurve::Flat, 0, 60, 2.0), 1.0);
        assert_eq!(coefficient(ScalingCurve::Flat, 30, 60, 2.0), 1.5);
        assert_eq!(coefficient(ScalingCurve::Flat, 60, 60, 2.0), 2.0);
    }

    #[test]
    fn test_multiplicative_endpoints() {
        assert_eq!(coefficient(ScalingCurve::Multiplicative, 0, 60, 2.0), 1.0);
        assert_eq!(coefficient(ScalingCurve::Multiplicative, 60, 60, 2.0), 2.0);
        // halfway through the level range the bonus is sqrt(c)
        assert_eq!(coefficient(ScalingCurve::Multiplicative, 30, 60, 2.0), 1.414);
    }

    #[test]
    fn test_reverse_multiplicative_decays() {
        assert_eq!(coefficient(ScalingCurve::ReverseMultiplicative, 0, 60, 2.0), 1.0);
        assert_eq!(coefficient(ScalingCurve::ReverseMultiplicative, 30, 60, 2.0), 0.625);
        assert_eq!(coefficient(ScalingCurve::ReverseMultiplicative, 60, 60, 2.0), 0.25);
    }

    #[test]
    fn test_rounded_to_three_decimals() {
        // 1.4^(7/60) = 1.0400...
        let value = coefficient(ScalingCurve::Multiplicative, 7, 60, 1.4);
        assert_eq!(value, (value * 1000.0).round() / 1000.0);
    }

    #[test]
    fn test_level_bonus_interpolates_from_zero() {
        assert_eq!(level_bonus(0, 50, 5.0), 0.0);
        assert_eq!(level_bonus(25, 50, 5.0), 2.5);
        assert_eq!(level_bonus(50, 50, 5.0), 5.0);
    }
}
