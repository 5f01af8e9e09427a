//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Limit a value to the range `[min, max]`.
///
/// A NaN value is passed through unchanged, callers shall not feed NaN into
/// a demand.
pub fn clamp<T>(value: T, min: T, max: T) -> T 
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Limit a value to the symmetric range `[-limit, limit]`.
pub fn clamp_abs<T>(value: T, limit: T) -> T
where
    T: Float
{
    let limit = limit.abs();
    clamp(value, -limit, limit)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in radians into the range `[-pi, pi)`.
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float + FloatConst
{
    rem_euclid(value + T::PI(), T::PI() + T::PI()) - T::PI()
}

/// Returns true if `a` and `b` differ by no more than `eps`.
pub fn approx_eq<T>(a: T, b: T, eps: T) -> bool
where
    T: Float
{
    (a - b).abs() <= eps
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
        assert_eq!(clamp_abs(-3.0, 2.0), -2.0);
        assert_eq!(clamp_abs(3.0, -2.0), 2.0);
    }

    #[test]
    fn test_wrap_pi() {
        assert!(approx_eq(wrap_pi(3.0 * PI / 2.0), -PI / 2.0, 1e-12));
        assert!(approx_eq(wrap_pi(-3.0 * PI / 2.0), PI / 2.0, 1e-12));
        assert!(approx_eq(wrap_pi(0.5), 0.5, 1e-12));
        assert!(approx_eq(wrap_pi(PI), -PI, 1e-12));
    }
}
