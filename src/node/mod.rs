//! Provides an infrastructure to create processing nodes, connect nodes
//! together via crossbeam channels, and start nodes running in their own
//! independent threads.
//!
//! # Example
//!
//! ```
//! #[macro_use] extern crate vcf_rs;
//! use vcf_rs::prelude::*;
//!
//! # fn main() {
//! // A source producing blocks of silence and a sink checking them.
//! create_node!(Source: Vec<f64>, [], [], |_| Ok(vec![0.0; 64]));
//! create_node!(Sink: (), [], [recv: Vec<f64>], |_, x: Vec<f64>| {
//!     assert_eq!(x.len(), 64);
//!     Ok(())
//! });
//!
//! let mut source = Source::new();
//! let mut sink = Sink::new();
//!
//! // `source` now sends its blocks to `sink`, which receives them on `recv`.
//! connect_nodes!(source, sink, recv);
//! start_nodes!(source);
//! sink.call().unwrap();
//! # }
//! ```

use crossbeam::channel::{Receiver, Sender};
use std::error;
use std::fmt;

/// The trait that all nodes in the library implement. `call` receives one
/// value from every input, runs the node once and sends the result on.
pub trait Node {
    fn call(&mut self) -> Result<(), NodeError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeError {
    /// An input channel was never connected or its sender hung up.
    DisconnectedError,
    /// A downstream receiver hung up.
    CommError,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let desc = match *self {
            NodeError::DisconnectedError => "Input channel is disconnected",
            NodeError::CommError => "Could not send to a connected node",
        };
        write!(f, "Node error: {}", desc)
    }
}

impl error::Error for NodeError {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Receives the next value on a node input. An input that was never
/// connected, or whose sender hung up, is a `DisconnectedError`.
pub fn recv_input<T>(input: &Option<Receiver<T>>) -> Result<T, NodeError> {
    match *input {
        Some(ref r) => r.recv().map_err(|_| NodeError::DisconnectedError),
        None => Err(NodeError::DisconnectedError),
    }
}

/// Sends a copy of `value` to every connected node.
pub fn broadcast<T: Clone>(senders: &[Sender<T>], value: T) -> Result<(), NodeError> {
    for send in senders {
        send.send(value.clone()).map_err(|_| NodeError::CommError)?;
    }
    Ok(())
}

/// Creates a structure with crossbeam senders and receivers automatically and
/// implements the `Node` trait for it.
///
/// # Arguments
///
/// create_node!(name: out_type, [fields: field_type], [recv: recv_type], func);
///
/// - name: The name of the node to construct.
/// - out_type: The type the node outputs, can be () if the node doesn't send
///   anything to another node.
/// - [fields: field_type]: State fields added to the structure and taken as
///   arguments by `new`.
/// - [recv: recv_type]: Receiver field names and the type each receives.
/// - func: Runs once per `call()`. It takes a mutable reference to the node
///   followed by one value per receiver and returns
///   `Result<out_type, NodeError>`.
#[macro_export]
macro_rules! create_node {
    ($name:ident: $out:ty, [$($state:ident: $type:ty),*], [$($recv:ident: $in:ty),*], $func:expr) => {
        pub struct $name {
            $(
                pub $recv: Option<$crate::Receiver<$in>>,
            )*
            pub sender: Vec<$crate::Sender<$out>>,
            $(
                pub $state: $type,
            )*
        }

        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new($($state: $type,)*) -> $name {
                $name {
                    $(
                        $recv: None,
                    )*
                    $(
                        $state,
                    )*
                    sender: vec![],
                }
            }
        }

        impl $crate::node::Node for $name {
            fn call(&mut self) -> Result<(), $crate::node::NodeError> {
                $(
                    let $recv = $crate::node::recv_input(&self.$recv)?;
                )*
                let res: Result<$out, $crate::node::NodeError> =
                    ($func)(&mut *self, $($recv,)*);
                $crate::node::broadcast(&self.sender, res?)
            }
        }
    };
}

/// Connects two nodes together with a crossbeam channel. The first node
/// pushes onto its `sender` list, the second receives on the named field.
///
/// ```
/// # #[macro_use] extern crate vcf_rs;
/// # use vcf_rs::prelude::*;
/// # fn main() {
/// # create_node!(Node1: u32, [], [], |_| Ok(1));
/// # create_node!(Node2: (), [], [recv: u32], |_, x: u32| { assert_eq!(x, 1); Ok(()) });
/// let mut node1 = Node1::new();
/// let mut node2 = Node2::new();
///
/// connect_nodes!(node1, node2, recv);
/// # }
/// ```
#[macro_export]
macro_rules! connect_nodes {
    ($n1:ident, $n2:ident, $recv:ident) => {{
        let (send, recv) = $crate::channel::bounded(0);
        $n1.sender.push(send);
        $n2.$recv = Some(recv);
    }};
}

/// Spawns a thread for each node in order. Each thread calls its node until
/// the node reports an error, which is how a pipeline shuts down once a
/// neighbour goes away.
#[macro_export]
macro_rules! start_nodes {
    ($($node:ident),+) => {
        $(
            ::std::thread::spawn(move || {
                use $crate::node::Node;
                while $node.call().is_ok() {}
            });
        )*
    }
}
