//! This module provides an easy single import for those using this crate.

pub use crate::control::{Controls, FilterSettings, Param, ParamStreams};
pub use crate::filter::coefficients::{compute_coefficients, Coefficients};
pub use crate::filter::sample_rate::SampleRate;
pub use crate::filter::ssm2044::Ssm2044;
pub use crate::node::{Node, NodeError};
pub use crate::util::FilterError;
pub use crossbeam::channel::{self, Receiver, Sender};
pub use std::thread;

pub type NodeReceiver<T> = Option<Receiver<T>>;
pub type NodeSender<T> = Vec<Sender<T>>;
