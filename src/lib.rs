extern crate crossbeam;

#[macro_use]
pub mod node;
pub mod control;
pub mod filter;
pub mod prelude;
pub mod saturation;
pub mod util;

pub use crossbeam::channel;
pub use crossbeam::channel::{Receiver, Sender};
