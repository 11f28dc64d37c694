//! Control-side state for the filter: held parameter values, the per-parameter
//! streaming flags, and the resolver that picks between a stream and a held
//! value for every sample.
//!
//! `Controls` is shared between the control thread and the audio thread
//! through an `Arc`. Every field is a single lock-free word, so a write from
//! the control thread never blocks the audio thread. A held value written
//! mid-block may be seen one sample late, which is fine for control data.

use crate::util::math::clamp;
use crate::util::FilterError;
use crossbeam::atomic::AtomicCell;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

pub const CUTOFF_RANGE: (f64, f64) = (20.0, 20000.0);
pub const RESONANCE_RANGE: (f64, f64) = (0.0, 4.0);
pub const GAIN_RANGE: (f64, f64) = (0.0, 4.0);

/// The three modulatable filter parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Cutoff,
    Resonance,
    Gain,
}

impl Param {
    pub const ALL: [Param; 3] = [Param::Cutoff, Param::Resonance, Param::Gain];

    /// Valid `(min, max)` range for the parameter.
    pub fn range(self) -> (f64, f64) {
        match self {
            Param::Cutoff => CUTOFF_RANGE,
            Param::Resonance => RESONANCE_RANGE,
            Param::Gain => GAIN_RANGE,
        }
    }

    pub fn clamp(self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        clamp(value, lo, hi)
    }

    fn index(self) -> usize {
        match self {
            Param::Cutoff => 0,
            Param::Resonance => 1,
            Param::Gain => 2,
        }
    }
}

/// Picks the streamed value when there is one, the held value otherwise,
/// and clamps the result to the parameter's range.
///
/// # Examples
///
/// ```
/// use vcf_rs::control::{resolve, Param};
///
/// assert_eq!(resolve(Param::Cutoff, Some(50000.0), 1000.0), 20000.0);
/// assert_eq!(resolve(Param::Resonance, None, -1.0), 0.0);
/// assert_eq!(resolve(Param::Gain, Some(2.0), 1.0), 2.0);
/// ```
pub fn resolve(param: Param, stream: Option<f64>, held: f64) -> f64 {
    param.clamp(stream.unwrap_or(held))
}

/// Creation-time parameter values. Also used to snapshot the held values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub cutoff: f64,
    pub resonance: f64,
    pub gain: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            cutoff: 1000.0,
            resonance: 0.5,
            gain: 1.0,
        }
    }
}

impl FilterSettings {
    /// Returns a copy with every value inside its parameter range.
    pub fn clamped(self) -> FilterSettings {
        FilterSettings {
            cutoff: Param::Cutoff.clamp(self.cutoff),
            resonance: Param::Resonance.clamp(self.resonance),
            gain: Param::Gain.clamp(self.gain),
        }
    }

    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Cutoff => self.cutoff,
            Param::Resonance => self.resonance,
            Param::Gain => self.gain,
        }
    }

    /// Encodes the settings as CBOR.
    pub fn to_cbor(&self) -> Result<Vec<u8>, FilterError> {
        serde_cbor::to_vec(self)
            .map_err(|e| FilterError::InvalidSettings(e.to_string()))
    }

    /// Decodes settings from CBOR. Missing fields take their defaults and
    /// every value is clamped into range.
    pub fn from_cbor(bytes: &[u8]) -> Result<FilterSettings, FilterError> {
        match serde_cbor::from_slice::<FilterSettings>(bytes) {
            Ok(settings) => Ok(settings.clamped()),
            Err(e) => {
                warn!("rejecting filter settings: {}", e);
                Err(FilterError::InvalidSettings(e.to_string()))
            }
        }
    }
}

/// Held values and streaming flags shared with the control thread.
#[derive(Debug)]
pub struct Controls {
    held: [AtomicCell<f64>; 3],
    streaming: [AtomicBool; 3],
}

impl Controls {
    pub fn new(settings: FilterSettings) -> Controls {
        let settings = settings.clamped();
        Controls {
            held: [
                AtomicCell::new(settings.cutoff),
                AtomicCell::new(settings.resonance),
                AtomicCell::new(settings.gain),
            ],
            streaming: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// Sets the value used for `param` while no stream is attached to it.
    /// The value is clamped on receipt.
    pub fn set_held(&self, param: Param, value: f64) {
        self.held[param.index()].store(param.clamp(value));
    }

    pub fn held(&self, param: Param) -> f64 {
        self.held[param.index()].load()
    }

    /// Declares whether a per-sample stream drives `param`. Hosts change
    /// this between blocks; the audio thread reads it once per block.
    pub fn set_streaming(&self, param: Param, streaming: bool) {
        let was = self.streaming[param.index()].swap(streaming, Ordering::AcqRel);
        if was != streaming {
            debug!("{:?} streaming: {}", param, streaming);
        }
    }

    pub fn is_streaming(&self, param: Param) -> bool {
        self.streaming[param.index()].load(Ordering::Acquire)
    }

    /// Streaming flags in `Param::ALL` order.
    pub fn topology(&self) -> [bool; 3] {
        [
            self.is_streaming(Param::Cutoff),
            self.is_streaming(Param::Resonance),
            self.is_streaming(Param::Gain),
        ]
    }

    /// Current held values.
    pub fn snapshot(&self) -> FilterSettings {
        FilterSettings {
            cutoff: self.held(Param::Cutoff),
            resonance: self.held(Param::Resonance),
            gain: self.held(Param::Gain),
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Controls::new(FilterSettings::default())
    }
}

/// Optional per-sample parameter streams for one block.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParamStreams<'a> {
    pub cutoff: Option<&'a [f64]>,
    pub resonance: Option<&'a [f64]>,
    pub gain: Option<&'a [f64]>,
}

impl<'a> ParamStreams<'a> {
    pub fn get(&self, param: Param) -> Option<&'a [f64]> {
        match param {
            Param::Cutoff => self.cutoff,
            Param::Resonance => self.resonance,
            Param::Gain => self.gain,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::control::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_resolve_prefers_stream() {
        assert_eq!(resolve(Param::Cutoff, Some(440.0), 1000.0), 440.0);
        assert_eq!(resolve(Param::Cutoff, None, 1000.0), 1000.0);
    }

    #[test]
    fn test_resolve_clamps() {
        assert_eq!(resolve(Param::Cutoff, Some(50000.0), 1000.0), 20000.0);
        assert_eq!(resolve(Param::Cutoff, Some(5.0), 1000.0), 20.0);
        assert_eq!(resolve(Param::Resonance, Some(-1.0), 0.5), 0.0);
        assert_eq!(resolve(Param::Resonance, None, 9.0), 4.0);
        assert_eq!(resolve(Param::Gain, Some(-0.5), 1.0), 0.0);
        assert_eq!(resolve(Param::Gain, None, 12.0), 4.0);
        assert_eq!(resolve(Param::Gain, Some(std::f64::NAN), 1.0), 0.0);
    }

    #[test]
    fn test_held_values_clamped_on_receipt() {
        let controls = Controls::default();
        controls.set_held(Param::Cutoff, 50000.0);
        controls.set_held(Param::Resonance, -1.0);
        controls.set_held(Param::Gain, 2.5);
        assert_eq!(controls.held(Param::Cutoff), 20000.0);
        assert_eq!(controls.held(Param::Resonance), 0.0);
        assert_eq!(controls.held(Param::Gain), 2.5);
    }

    #[test]
    fn test_defaults() {
        let controls = Controls::default();
        assert_eq!(controls.snapshot(), FilterSettings::default());
        assert_eq!(controls.topology(), [false, false, false]);
    }

    #[test]
    fn test_streaming_flags() {
        let controls = Controls::default();
        controls.set_streaming(Param::Resonance, true);
        assert_eq!(controls.topology(), [false, true, false]);
        controls.set_streaming(Param::Resonance, false);
        controls.set_streaming(Param::Gain, true);
        assert!(!controls.is_streaming(Param::Resonance));
        assert!(controls.is_streaming(Param::Gain));
    }

    #[test]
    // Held values written from another thread become visible here.
    fn test_cross_thread_writes() {
        let controls = Arc::new(Controls::default());
        let writer = Arc::clone(&controls);
        let handle = thread::spawn(move || {
            for i in 0..1000 {
                writer.set_held(Param::Cutoff, 100.0 + i as f64);
            }
            writer.set_streaming(Param::Cutoff, true);
        });
        assert!(handle.join().is_ok());
        assert_eq!(controls.held(Param::Cutoff), 1099.0);
        assert!(controls.is_streaming(Param::Cutoff));
    }

    #[test]
    fn test_settings_cbor() {
        let settings = FilterSettings {
            cutoff: 350.0,
            resonance: 3.6,
            gain: 1.5,
        };
        let bytes = settings.to_cbor().unwrap();
        assert_eq!(FilterSettings::from_cbor(&bytes).unwrap(), settings);
    }

    #[test]
    fn test_settings_cbor_clamps_and_rejects() {
        let wild = FilterSettings {
            cutoff: 1e6,
            resonance: -3.0,
            gain: 1.0,
        };
        let bytes = serde_cbor::to_vec(&wild).unwrap();
        let decoded = FilterSettings::from_cbor(&bytes).unwrap();
        assert_eq!(decoded.cutoff, 20000.0);
        assert_eq!(decoded.resonance, 0.0);

        match FilterSettings::from_cbor(&[0xff, 0x00, 0x13]) {
            Err(FilterError::InvalidSettings(_)) => (),
            other => panic!("garbage decoded: {:?}", other),
        }
    }

    #[test]
    fn test_stream_lookup() {
        let cutoff = [100.0, 200.0];
        let streams = ParamStreams {
            cutoff: Some(&cutoff[..]),
            ..Default::default()
        };
        assert_eq!(streams.get(Param::Cutoff), Some(&cutoff[..]));
        assert!(streams.get(Param::Gain).is_none());
    }
}
