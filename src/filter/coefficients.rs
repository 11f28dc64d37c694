//! Maps cutoff and resonance onto the two scalars the cascade runs on.
//!
//! `g` is the per-stage integrator gain. The cutoff is pre-warped with the
//! bilinear transform before it is turned into `g`, which keeps the digital
//! response from bunching up towards Nyquist. `g` is held below 1.0 so each
//! one-pole recursion stays a convex blend of its state and its input.
//!
//! `k` is the feedback gain. The feedback path reads the previous output, so
//! the loop gain at which the filter starts to oscillate depends on `g`: it
//! is 4 for a vanishing cutoff and rises towards the top of the range. `k`
//! is scaled against that critical gain, which puts the onset of
//! self-oscillation at the same resonance for every cutoff and sample rate.

use crate::filter::sample_rate::SampleRate;
use crate::util::math::clamp;
use std::f64::consts::PI;

/// Lowest cutoff the calculator will produce coefficients for.
pub const MIN_CUTOFF: f64 = 20.0;

/// Highest cutoff as a fraction of the sample rate.
pub const NYQUIST_MARGIN: f64 = 0.45;

/// Upper bound on `g`.
pub const MAX_INTEGRATOR_GAIN: f64 = 0.99;

/// Resonance at which the loop gain reaches the critical gain.
pub const SELF_OSCILLATION_ONSET: f64 = 3.5;

/// Top of the resonance scale.
pub const MAX_RESONANCE: f64 = 4.0;

/// Largest critical gain over all `g`, reached at `g = 2/3`.
pub const MAX_CRITICAL_GAIN: f64 = 16.0;

/// Hard ceiling on `k`.
pub const FEEDBACK_CEILING: f64 =
    MAX_CRITICAL_GAIN * MAX_RESONANCE / SELF_OSCILLATION_ONSET;

/// Integrator and feedback gains for one sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coefficients {
    pub g: f64,
    pub k: f64,
}

/// Computes the filter coefficients for the given cutoff and resonance.
///
/// # Arguments
///
/// * `cutoff` - Cutoff frequency in Hz. Clamped to
///   `[MIN_CUTOFF, NYQUIST_MARGIN * sample rate]`.
/// * `resonance` - Resonance amount on the `[0, 4]` scale.
/// * `sample_rate` - The current sample rate context.
///
/// # Examples
///
/// ```
/// use vcf_rs::filter::coefficients::*;
/// use vcf_rs::filter::sample_rate::SampleRate;
///
/// let sr = SampleRate::new(48000.0).unwrap();
/// let c = compute_coefficients(1000.0, 3.5, &sr);
/// assert!(c.g > 0.0 && c.g < 1.0);
/// assert!((c.k - critical_feedback_gain(c.g)).abs() < 1e-12);
/// ```
pub fn compute_coefficients(
    cutoff: f64,
    resonance: f64,
    sample_rate: &SampleRate,
) -> Coefficients {
    let ceiling = sample_rate.hz() * NYQUIST_MARGIN;
    let cutoff = clamp(cutoff, MIN_CUTOFF.min(ceiling), ceiling);
    let omega = 2.0 * PI * cutoff;
    let warped = (omega * sample_rate.inverse() * 0.5).tan();
    let g = clamp(warped / (1.0 + warped), 0.0, MAX_INTEGRATOR_GAIN);

    Coefficients {
        g,
        k: feedback_gain(resonance, g),
    }
}

/// Loop gain at which a cascade with integrator gain `g` starts to
/// oscillate on its own.
///
/// The first term is the crossing of the loop phase through -180 degrees
/// inside the band, the second the crossing at Nyquist, which takes over for
/// `g` above 2/3.
pub fn critical_feedback_gain(g: f64) -> f64 {
    let in_band = ((2.0 - g) / (1.0 - g)).powi(2);
    let at_nyquist = ((2.0 - g) / g).powi(4);
    in_band.min(at_nyquist)
}

/// Feedback gain for a resonance amount at integrator gain `g`.
///
/// # Examples
///
/// ```
/// use vcf_rs::filter::coefficients::*;
///
/// let g = 0.1;
/// assert_eq!(feedback_gain(0.0, g), 0.0);
/// assert!(feedback_gain(3.4, g) < critical_feedback_gain(g));
/// assert!(feedback_gain(3.6, g) > critical_feedback_gain(g));
/// ```
pub fn feedback_gain(resonance: f64, g: f64) -> f64 {
    let resonance = clamp(resonance, 0.0, MAX_RESONANCE);
    let k = critical_feedback_gain(g) * resonance / SELF_OSCILLATION_ONSET;
    k.min(FEEDBACK_CEILING)
}
