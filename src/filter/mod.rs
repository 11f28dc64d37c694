//! The filter itself.
//!
//! The four-pole low-pass is built from four identical one-pole sections
//! with a global feedback path from the last section back to the input. On
//! its own the cascade rolls off at 24 dB/octave and is unconditionally
//! stable. Feeding the output back inverted raises a resonant peak near the
//! cutoff, and with enough feedback the loop sustains a sine-like oscillation
//! with no input at all.
//!
//! * `coefficients` - cutoff and resonance to integrator and feedback gains
//! * `zdf` - the cascade and its state
//! * `sample_rate` - the sample rate context
//! * `ssm2044` - the complete filter instance with block processing
//! * `ssm2044_node` - a pipeline node wrapping the filter
pub mod coefficients;
pub mod sample_rate;
pub mod ssm2044;
pub mod ssm2044_node;
pub mod zdf;
