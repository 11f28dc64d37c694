//! Error type shared across the crate and small numeric helpers used on the
//! audio path.

use std::error;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum FilterError {
    InvalidSampleRate(f64),
    InvalidSettings(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FilterError::InvalidSampleRate(rate) => write!(
                f,
                "Filter error: invalid sample rate {}, must be finite and greater than 0.0",
                rate
            ),
            FilterError::InvalidSettings(ref why) => {
                write!(f, "Filter error: could not decode settings: {}", why)
            }
        }
    }
}

impl error::Error for FilterError {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Denormal flushing and range clamping.
pub mod math;
