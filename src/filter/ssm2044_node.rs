//! A node that runs blocks of samples through an `Ssm2044`.
//!
//! `create_node!` only builds concrete types, so the generic node implements
//! `Node` itself on top of the same `recv_input` and `broadcast` helpers the
//! macro expands to.

use crate::control::{Controls, ParamStreams};
use crate::filter::ssm2044::Ssm2044;
use crate::node::{broadcast, recv_input};
use crate::prelude::*;
use num_traits::{Float, NumCast};
use std::sync::Arc;

/// A node that filters blocks of samples with held parameter values.
///
/// Samples are converted to `f64` for processing and back to `T` on the way
/// out. The held values can be changed while the node runs through the
/// handle returned by `controls()`.
pub struct Ssm2044Node<T>
where
    T: Float,
{
    pub input: NodeReceiver<Vec<T>>,
    filter: Ssm2044,
    scratch_in: Vec<f64>,
    scratch_out: Vec<f64>,
    pub sender: NodeSender<Vec<T>>,
}

impl<T> Ssm2044Node<T>
where
    T: Float,
{
    pub fn new(filter: Ssm2044) -> Self {
        Ssm2044Node {
            input: None,
            filter,
            scratch_in: Vec::new(),
            scratch_out: Vec::new(),
            sender: Vec::new(),
        }
    }

    pub fn controls(&self) -> Arc<Controls> {
        self.filter.controls()
    }

    /// Filters one block. The scratch buffers only grow when a block is
    /// longer than any seen before.
    pub fn run(&mut self, input: &[T]) -> Result<Vec<T>, NodeError> {
        self.scratch_in.clear();
        self.scratch_in
            .extend(input.iter().map(|x| x.to_f64().unwrap_or(0.0)));
        self.scratch_out.resize(input.len(), 0.0);

        self.filter.process_block(
            &self.scratch_in,
            ParamStreams::default(),
            &mut self.scratch_out,
        );

        Ok(self
            .scratch_out
            .iter()
            .map(|&y| NumCast::from(y).unwrap_or_else(T::zero))
            .collect())
    }
}

impl<T> Node for Ssm2044Node<T>
where
    T: Float,
{
    fn call(&mut self) -> Result<(), NodeError> {
        let block = recv_input(&self.input)?;
        let res = self.run(&block)?;
        broadcast(&self.sender, res)
    }
}

/// Constructs a new `Ssm2044Node<T>` at the given sample rate with the
/// default parameter values.
///
/// # Examples
///
/// ```
/// use vcf_rs::filter::ssm2044_node::ssm2044_node;
/// use vcf_rs::prelude::*;
///
/// let mut node = ssm2044_node::<f32>(48000.0).unwrap();
/// node.controls().set_held(Param::Resonance, 3.0);
/// let out = node.run(&[1.0, 0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(out.len(), 4);
/// ```
pub fn ssm2044_node<T>(sample_rate: f64) -> Result<Ssm2044Node<T>, FilterError>
where
    T: Float,
{
    Ok(Ssm2044Node::new(Ssm2044::new(sample_rate)?))
}

/// Constructs a new `Ssm2044Node<T>` with the given initial settings.
pub fn ssm2044_node_with_settings<T>(
    sample_rate: f64,
    settings: FilterSettings,
) -> Result<Ssm2044Node<T>, FilterError>
where
    T: Float,
{
    Ok(Ssm2044Node::new(Ssm2044::with_settings(sample_rate, settings)?))
}

#[cfg(test)]
mod test {
    use crate::filter::ssm2044::Ssm2044;
    use crate::filter::ssm2044_node;
    use crate::prelude::*;
    use assert_approx_eq::assert_approx_eq;
    use std::thread;

    #[test]
    // A test to verify the node filters exactly like the bare filter.
    fn test_ssm2044_node() {
        create_node!(
            SomeSamples: Vec<f64>,
            [blocks: Vec<Vec<f64>>],
            [],
            |node: &mut SomeSamples| -> Result<Vec<f64>, NodeError> {
                if node.blocks.is_empty() {
                    Ok(vec![0.0; 16])
                } else {
                    Ok(node.blocks.remove(0))
                }
            }
        );

        let blocks: Vec<Vec<f64>> = (0..4)
            .map(|b| (0..16).map(|i| ((b * 16 + i) as f64 * 0.3).sin()).collect())
            .collect();
        let mut source = SomeSamples::new(blocks.clone());

        let mut mynode = ssm2044_node::ssm2044_node::<f64>(44100.0).unwrap();

        create_node!(
            CheckNode: (),
            [state: Vec<f64>],
            [recv: Vec<f64>],
            |node: &mut CheckNode, x: Vec<f64>| -> Result<(), NodeError> {
                node.state.extend(x);
                Ok(())
            }
        );
        let mut check_node = CheckNode::new(Vec::new());

        connect_nodes!(source, mynode, input);
        connect_nodes!(mynode, check_node, recv);
        start_nodes!(source, mynode);
        let check = thread::spawn(move || {
            for _ in 0..4 {
                check_node.call().unwrap();
            }
            check_node.state
        });
        let got = check.join().unwrap();

        let mut reference = Ssm2044::new(44100.0).unwrap();
        let expected: Vec<f64> = blocks
            .iter()
            .flatten()
            .map(|&x| reference.process_sample(x, 1000.0, 0.5, 1.0))
            .collect();
        assert_eq!(got.len(), 64);
        for (g, e) in got.iter().zip(expected.iter()) {
            assert_approx_eq!(*g, *e);
        }
    }

    #[test]
    fn test_f32_conversion() {
        let mut node = ssm2044_node::ssm2044_node_with_settings::<f32>(
            48000.0,
            FilterSettings {
                cutoff: 20000.0,
                resonance: 0.0,
                gain: 1.0,
            },
        )
        .unwrap();
        let out = node.run(&[0.25_f32; 4096]).unwrap();
        assert_eq!(out.len(), 4096);
        // Wide open with no resonance the filter settles on the saturated
        // input level.
        let settled = crate::saturation::saturate(0.25, crate::saturation::INPUT_DRIVE);
        assert_approx_eq!(out[4095] as f64, settled, 1e-6);
    }

    #[test]
    fn test_bad_rate() {
        assert!(ssm2044_node::ssm2044_node::<f64>(-1.0).is_err());
    }
}
