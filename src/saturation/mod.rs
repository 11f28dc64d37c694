//! Soft saturation used to give the filter its analog character.
//!
//! The transfer curve is a `tanh` soft clipper with a small squared term
//! added on top. The squared term is even-symmetric, so it contributes
//! second-order harmonics the way a slightly unbalanced transistor pair
//! does, while the `tanh` term supplies the odd harmonics and the bounded
//! output. The result is divided by the drive so the small-signal gain of
//! the curve stays at unity for every drive setting.
//!
//! Two drive settings are used by the filter: a gentle one on the input path
//! and a stronger one on the feedback path. The feedback saturation is the
//! only thing that bounds the amplitude once the filter self-oscillates.

/// Drive applied to the gain-scaled input sample.
pub const INPUT_DRIVE: f64 = 1.5;

/// Drive applied to the feedback memory before it is mixed back in.
pub const FEEDBACK_DRIVE: f64 = 2.0;

/// Level of the even-harmonic term relative to the `tanh` term.
const ASYMMETRY: f64 = 0.05;

/// Saturates `input` with the given `drive`.
///
/// A `drive` of zero or less returns the input untouched.
///
/// # Arguments
///
/// * `input` - Sample to saturate.
/// * `drive` - How hard the sample is pushed into the curve.
///
/// # Examples
///
/// ```
/// use vcf_rs::saturation::saturate;
///
/// assert_eq!(saturate(0.0, 2.0), 0.0);
/// assert_eq!(saturate(0.8, 0.0), 0.8);
///
/// // Large inputs are bounded by (1 + 0.05) / drive.
/// assert!(saturate(10.0, 2.0) <= 0.525);
/// ```
pub fn saturate(input: f64, drive: f64) -> f64 {
    if drive <= 0.0 {
        return input;
    }

    let driven = input * drive;
    let base = driven.tanh();
    let half = (driven * 0.5).tanh();
    (base + ASYMMETRY * half * half) / drive
}
