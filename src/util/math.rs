use num_traits::{Float, NumCast};

/// Magnitude below which a value is treated as a denormal and flushed.
pub const DENORMAL_THRESHOLD: f64 = 1e-15;

/// Flushes denormal, NaN and infinite values to exact zero.
///
/// Anything whose magnitude is below `DENORMAL_THRESHOLD` comes back as
/// `0.0`, as does anything non-finite, so the value can be stored as filter
/// state without dragging the FPU onto its slow path.
///
/// # Examples
///
/// ```
/// use vcf_rs::util::math::flush_denormal;
///
/// assert_eq!(flush_denormal(1e-20_f64), 0.0);
/// assert_eq!(flush_denormal(f64::NAN), 0.0);
/// assert_eq!(flush_denormal(0.25_f32), 0.25);
/// ```
pub fn flush_denormal<T>(value: T) -> T
where
    T: Float,
{
    let threshold: T =
        NumCast::from(DENORMAL_THRESHOLD).unwrap_or_else(T::min_positive_value);
    if !value.is_finite() || value.abs() < threshold {
        T::zero()
    } else {
        value
    }
}

/// Clamps `value` to `[lo, hi]`. A NaN input resolves to `lo`.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() || value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

#[cfg(test)]
mod test {
    use crate::util::math;

    #[test]
    fn test_flush_denormal() {
        assert_eq!(math::flush_denormal(1e-16_f64), 0.0);
        assert_eq!(math::flush_denormal(-1e-16_f64), 0.0);
        assert_eq!(math::flush_denormal(f64::INFINITY), 0.0);
        assert_eq!(math::flush_denormal(f64::NEG_INFINITY), 0.0);
        assert_eq!(math::flush_denormal(1e-14_f64), 1e-14);
        assert_eq!(math::flush_denormal(-0.5_f64), -0.5);
        assert_eq!(math::flush_denormal(std::f32::MIN_POSITIVE / 2.0), 0.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(math::clamp(50000.0, 20.0, 20000.0), 20000.0);
        assert_eq!(math::clamp(-1.0, 0.0, 4.0), 0.0);
        assert_eq!(math::clamp(2.5, 0.0, 4.0), 2.5);
        assert_eq!(math::clamp(std::f64::NAN, 0.0, 4.0), 0.0);
    }
}
