//! A four-pole voltage-controlled low-pass filter in the style of the SSM2044.
//!
//! `Ssm2044` ties the pieces together: on every sample the parameter
//! resolver picks cutoff, resonance and gain, the coefficient calculator
//! turns them into `(g, k)`, and the ZDF core filters the sample. No memory
//! is allocated and nothing is logged once processing has started.
//!
//! The held parameter values and the streaming flags live in a shared
//! `Controls` so a control thread can change them while the audio thread
//! keeps running. The audio thread takes one snapshot of them at the start
//! of each block.

use crate::control::{resolve, Controls, FilterSettings, Param, ParamStreams};
use crate::filter::coefficients::{compute_coefficients, Coefficients};
use crate::filter::sample_rate::SampleRate;
use crate::filter::zdf::ZdfCore;
use crate::util::math::flush_denormal;
use crate::util::FilterError;
use log::{debug, warn};
use std::sync::Arc;

/// One filter instance.
#[derive(Debug)]
pub struct Ssm2044 {
    core: ZdfCore,
    coeffs: Coefficients,
    sample_rate: SampleRate,
    controls: Arc<Controls>,
}

impl Ssm2044 {
    /// Creates a filter running at `sample_rate` Hz with the default
    /// parameter values.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_rs::filter::ssm2044::Ssm2044;
    ///
    /// let mut filter = Ssm2044::new(48000.0).unwrap();
    /// let out = filter.process_sample(1.0, 1000.0, 0.5, 1.0);
    /// assert!(out > 0.0);
    /// ```
    pub fn new(sample_rate: f64) -> Result<Ssm2044, FilterError> {
        Ssm2044::with_settings(sample_rate, FilterSettings::default())
    }

    /// Creates a filter with the given initial held values. Values outside
    /// their ranges are clamped.
    pub fn with_settings(
        sample_rate: f64,
        settings: FilterSettings,
    ) -> Result<Ssm2044, FilterError> {
        let sample_rate = SampleRate::new(sample_rate)?;
        Ok(Ssm2044 {
            core: ZdfCore::new(),
            coeffs: Coefficients::default(),
            sample_rate,
            controls: Arc::new(Controls::new(settings)),
        })
    }

    /// Adopts the host's sample rate. Must be called whenever the host clock
    /// changes. An invalid rate is rejected and the previous rate is kept.
    pub fn configure(&mut self, sample_rate: f64) -> Result<(), FilterError> {
        match self.sample_rate.set(sample_rate) {
            Ok(()) => {
                debug!("sample rate set to {} Hz", sample_rate);
                Ok(())
            }
            Err(e) => {
                warn!("{}; keeping {} Hz", e, self.sample_rate.hz());
                Err(e)
            }
        }
    }

    pub fn sample_rate(&self) -> &SampleRate {
        &self.sample_rate
    }

    /// Handle for updating held values and streaming flags from another
    /// thread.
    pub fn controls(&self) -> Arc<Controls> {
        Arc::clone(&self.controls)
    }

    pub fn set_held_parameter(&self, param: Param, value: f64) {
        self.controls.set_held(param, value);
    }

    pub fn set_streaming_flag(&self, param: Param, streaming: bool) {
        self.controls.set_streaming(param, streaming);
    }

    /// Filters one sample with already-resolved parameters.
    ///
    /// # Arguments
    ///
    /// * `input` - Raw input sample.
    /// * `cutoff` - Cutoff in Hz.
    /// * `resonance` - Resonance on the `[0, 4]` scale.
    /// * `gain` - Input gain on the `[0, 4]` scale.
    pub fn process_sample(
        &mut self,
        input: f64,
        cutoff: f64,
        resonance: f64,
        gain: f64,
    ) -> f64 {
        self.coeffs = compute_coefficients(cutoff, resonance, &self.sample_rate);
        flush_denormal(self.core.process(input, gain, self.coeffs))
    }

    /// Filters a block of samples.
    ///
    /// For each parameter flagged as streaming, the matching slice in
    /// `streams` supplies one value per frame; every other parameter uses
    /// its held value. Frames missing from a short stream fall back to the
    /// held value as well. Returns the number of frames written, which is
    /// the shorter of `input` and `output`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_rs::prelude::*;
    ///
    /// let mut filter = Ssm2044::new(44100.0).unwrap();
    /// let sweep: Vec<f64> = (0..64).map(|i| 200.0 + 50.0 * i as f64).collect();
    /// filter.set_streaming_flag(Param::Cutoff, true);
    ///
    /// let input = vec![0.5; 64];
    /// let mut output = vec![0.0; 64];
    /// let streams = ParamStreams { cutoff: Some(&sweep[..]), ..Default::default() };
    /// let frames = filter.process_block(&input, streams, &mut output);
    /// assert_eq!(frames, 64);
    /// ```
    pub fn process_block(
        &mut self,
        input: &[f64],
        streams: ParamStreams,
        output: &mut [f64],
    ) -> usize {
        let topology = self.controls.topology();
        let held = self.controls.snapshot();
        let attached = |param: Param, flag: bool| {
            if flag {
                streams.get(param)
            } else {
                None
            }
        };
        let cutoff_in = attached(Param::Cutoff, topology[0]);
        let resonance_in = attached(Param::Resonance, topology[1]);
        let gain_in = attached(Param::Gain, topology[2]);

        let frames = input.len().min(output.len());
        for i in 0..frames {
            let at = |s: Option<&[f64]>| s.and_then(|s| s.get(i)).cloned();
            let cutoff = resolve(Param::Cutoff, at(cutoff_in), held.cutoff);
            let resonance =
                resolve(Param::Resonance, at(resonance_in), held.resonance);
            let gain = resolve(Param::Gain, at(gain_in), held.gain);
            output[i] = self.process_sample(input[i], cutoff, resonance, gain);
        }
        frames
    }

    /// Clears the filter memory. Parameters are left alone.
    pub fn reset(&mut self) {
        debug!("filter state reset");
        self.core.reset();
    }

    /// Coefficients computed for the most recent sample.
    pub fn last_coefficients(&self) -> Coefficients {
        self.coeffs
    }

    pub fn state(&self) -> &ZdfCore {
        &self.core
    }
}

impl Default for Ssm2044 {
    fn default() -> Self {
        Ssm2044 {
            core: ZdfCore::new(),
            coeffs: Coefficients::default(),
            sample_rate: SampleRate::default(),
            controls: Arc::new(Controls::default()),
        }
    }
}
