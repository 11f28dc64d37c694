//! Sample rate context shared by the coefficient calculation.

use crate::util::FilterError;

/// Rate used until the host reports its own clock.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Holds the sample rate and its reciprocal.
///
/// The rate is always finite and strictly positive, so `inverse()` never
/// divides by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRate {
    rate: f64,
    inverse: f64,
}

impl SampleRate {
    /// Creates a new context at `rate` Hz.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_rs::filter::sample_rate::SampleRate;
    ///
    /// let sr = SampleRate::new(48000.0).unwrap();
    /// assert_eq!(sr.hz(), 48000.0);
    /// assert!(SampleRate::new(0.0).is_err());
    /// ```
    pub fn new(rate: f64) -> Result<SampleRate, FilterError> {
        validate(rate)?;
        Ok(SampleRate {
            rate,
            inverse: 1.0 / rate,
        })
    }

    /// Adopts a new host clock rate. An invalid rate is rejected and the
    /// previous rate stays in effect.
    pub fn set(&mut self, rate: f64) -> Result<(), FilterError> {
        validate(rate)?;
        self.rate = rate;
        self.inverse = 1.0 / rate;
        Ok(())
    }

    pub fn hz(&self) -> f64 {
        self.rate
    }

    pub fn inverse(&self) -> f64 {
        self.inverse
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        SampleRate {
            rate: DEFAULT_SAMPLE_RATE,
            inverse: 1.0 / DEFAULT_SAMPLE_RATE,
        }
    }
}

fn validate(rate: f64) -> Result<(), FilterError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidSampleRate(rate))
    }
}

#[cfg(test)]
mod test {
    use crate::filter::sample_rate::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_reciprocal() {
        let sr = SampleRate::new(96000.0).unwrap();
        assert_approx_eq!(sr.inverse() * sr.hz(), 1.0);
    }

    #[test]
    fn test_rejects_bad_rates() {
        for &rate in &[0.0, -44100.0, std::f64::NAN, std::f64::INFINITY] {
            match SampleRate::new(rate) {
                Err(FilterError::InvalidSampleRate(_)) => (),
                other => panic!("{} was accepted: {:?}", rate, other),
            }
        }
    }

    #[test]
    fn test_set_keeps_previous_on_error() {
        let mut sr = SampleRate::new(48000.0).unwrap();
        assert!(sr.set(-1.0).is_err());
        assert_eq!(sr.hz(), 48000.0);
        assert_approx_eq!(sr.inverse(), 1.0 / 48000.0);

        sr.set(22050.0).unwrap();
        assert_eq!(sr.hz(), 22050.0);
    }

    #[test]
    fn test_default() {
        let sr = SampleRate::default();
        assert_eq!(sr.hz(), DEFAULT_SAMPLE_RATE);
    }
}
