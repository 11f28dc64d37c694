//! The four-pole zero-delay-feedback cascade.
//!
//! Each call to `ZdfCore::process` is one state transition: the gain-scaled
//! input is saturated, the previous fourth-stage output is saturated and
//! subtracted through the feedback gain, and the result is pushed through
//! four identical one-pole sections. The previous output stands in for the
//! unknown current output inside the feedback path, which avoids a
//! root-finding step per sample while the cascade itself still sees the
//! full input in the same call.
//!
//! The stages are linear. Nonlinearity only enters at the input and at the
//! feedback injection, so with `g` in `[0, 1)` every stage output is a convex
//! blend of the stage state and the stage input and the cascade can never
//! grow on its own. Resonance and self-oscillation come from the feedback
//! loop alone. Once the loop gain passes its critical value the feedback
//! saturation is what holds the oscillation at a finite amplitude.

use crate::filter::coefficients::Coefficients;
use crate::saturation::{saturate, FEEDBACK_DRIVE, INPUT_DRIVE};
use crate::util::math::flush_denormal;

/// Number of one-pole sections in the cascade.
pub const POLES: usize = 4;

/// Pole states and feedback memory of one filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZdfCore {
    poles: [f64; POLES],
    feedback: f64,
}

impl ZdfCore {
    pub fn new() -> ZdfCore {
        ZdfCore::default()
    }

    /// Runs one sample through the filter.
    ///
    /// # Arguments
    ///
    /// * `input` - Raw input sample.
    /// * `gain` - Input gain applied before the input saturation.
    /// * `coeffs` - Integrator and feedback gains for this sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_rs::filter::coefficients::Coefficients;
    /// use vcf_rs::filter::zdf::ZdfCore;
    ///
    /// let mut core = ZdfCore::new();
    /// let coeffs = Coefficients { g: 0.1, k: 1.0 };
    /// let out = core.process(1.0, 1.0, coeffs);
    /// assert!(out > 0.0 && out < 1e-3);
    /// assert_eq!(core.feedback(), out);
    /// ```
    pub fn process(&mut self, input: f64, gain: f64, coeffs: Coefficients) -> f64 {
        let driven_input = saturate(input * gain, INPUT_DRIVE);
        let driven_feedback = saturate(self.feedback, FEEDBACK_DRIVE);
        let stage_input = driven_input - coeffs.k * driven_feedback;

        let out = self.cascade(stage_input, coeffs.g);
        self.feedback = out;
        out
    }

    /// Pushes `input` through the four linear stages and stores the new
    /// stage outputs. Returns the flushed fourth-stage output.
    pub fn cascade(&mut self, input: f64, g: f64) -> f64 {
        let mut stage_input = input;
        for state in self.poles.iter_mut() {
            let out = *state + g * (stage_input - *state);
            *state = flush_denormal(out);
            stage_input = out;
        }
        flush_denormal(stage_input)
    }

    /// Zeroes the pole states and the feedback memory.
    pub fn reset(&mut self) {
        self.poles = [0.0; POLES];
        self.feedback = 0.0;
    }

    pub fn poles(&self) -> &[f64; POLES] {
        &self.poles
    }

    /// Fourth-stage output of the previous sample.
    pub fn feedback(&self) -> f64 {
        self.feedback
    }

    /// True once every state has been flushed to exact zero.
    pub fn is_silent(&self) -> bool {
        self.feedback == 0.0 && self.poles.iter().all(|&p| p == 0.0)
    }
}
