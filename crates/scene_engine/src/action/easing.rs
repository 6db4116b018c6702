//! Easing curves for tweening actions and slide transitions

use serde::{Deserialize, Serialize};

use crate::foundation::math::constants::HALF_PI;

/// Maps linear progress in `[0, 1]` to eased progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Accelerating from zero velocity
    QuadraticIn,
    /// Decelerating to zero velocity
    QuadraticOut,
    /// Accelerating then decelerating
    QuadraticInOut,
    /// Cubic acceleration
    CubicIn,
    /// Cubic deceleration
    CubicOut,
    /// Cubic acceleration then deceleration
    CubicInOut,
    /// Sine acceleration
    SinusoidalIn,
    /// Sine deceleration
    SinusoidalOut,
    /// Sine acceleration then deceleration
    SinusoidalInOut,
}

impl Easing {
    /// Eased progress for linear progress `t`; input is clamped to `[0, 1]`
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => t * (2.0 - t),
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Self::SinusoidalIn => 1.0 - (t * f64::from(HALF_PI)).cos(),
            Self::SinusoidalOut => (t * f64::from(HALF_PI)).sin(),
            Self::SinusoidalInOut => 0.5 * (1.0 - (std::f64::consts::PI * t).cos()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SinusoidalIn,
        Easing::SinusoidalOut,
        Easing::SinusoidalInOut,
    ];

    #[test]
    fn test_curves_hit_endpoints() {
        for easing in ALL {
            assert_relative_eq!(easing.apply(0.0), 0.0, epsilon = 1e-6);
            assert_relative_eq!(easing.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_in_out_curves_are_symmetric_at_midpoint() {
        assert_relative_eq!(Easing::QuadraticInOut.apply(0.5), 0.5, epsilon = 1e-9);
        assert_relative_eq!(Easing::CubicInOut.apply(0.5), 0.5, epsilon = 1e-9);
        assert_relative_eq!(Easing::SinusoidalInOut.apply(0.5), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::QuadraticIn.apply(-0.5), 0.0);
    }
}
