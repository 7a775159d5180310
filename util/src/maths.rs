//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the range `[min, max]`.
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
    clamp(value, -limit.abs(), limit.abs())
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in degrees into the range `[-180, 180)`.
///
/// Used to get the shortest signed angle between two headings.
pub fn wrap_180<T>(angle_deg: T) -> T
where
    T: Float
{
    let half_turn = T::from(180.0).unwrap_or_else(T::zero);
    let full_turn = half_turn + half_turn;

    rem_euclid(angle_deg + half_turn, full_turn) - half_turn
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(96f64, -10f64, 10f64), 10f64);
        assert_eq!(clamp(-96f64, -10f64, 10f64), -10f64);
        assert_eq!(clamp(3f64, -10f64, 10f64), 3f64);
        assert_eq!(clamp_abs(-11f64, 10f64), -10f64);
        assert_eq!(clamp_abs(11f64, -10f64), 10f64);
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(-1f64, 3f64), 2f64);
        assert_eq!(rem_euclid(4f64, 3f64), 1f64);
        assert_eq!(rem_euclid(0f64, 3f64), 0f64);
    }

    #[test]
    fn test_wrap_180() {
        assert_eq!(wrap_180(0f64), 0f64);
        assert_eq!(wrap_180(190f64), -170f64);
        assert_eq!(wrap_180(-190f64), 170f64);
        assert_eq!(wrap_180(360f64), 0f64);
        assert_eq!(wrap_180(90f64 - 350f64), 100f64);
    }
}
