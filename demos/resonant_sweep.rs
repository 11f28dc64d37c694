//! Renders a sawtooth through the filter node while the main thread sweeps the
//! cutoff from 80 Hz to 8 kHz and back at high resonance. The result is
//! written as raw little-endian f32 mono at 48 kHz:
//!
//! ```text
//! cargo run --example resonant_sweep -- sweep.raw
//! aplay -f FLOAT_LE -r 48000 -c 1 sweep.raw
//! ```
#[macro_use]
extern crate vcf_rs;

use byteorder::{LittleEndian, WriteBytesExt};
use log::info;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;
use vcf_rs::filter::ssm2044_node::ssm2044_node_with_settings;
use vcf_rs::prelude::*;

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK: usize = 512;
const SECONDS: usize = 8;

fn main() {
    env_logger::init();
    let path = env::args().nth(1).unwrap_or_else(|| "sweep.raw".to_string());
    let total_blocks = SECONDS * SAMPLE_RATE as usize / BLOCK;

    create_node!(
        Saw: Vec<f32>,
        [phase: f64, freq: f64],
        [],
        |node: &mut Saw| -> Result<Vec<f32>, NodeError> {
            let step = node.freq / SAMPLE_RATE;
            let mut block = Vec::with_capacity(BLOCK);
            for _ in 0..BLOCK {
                block.push((0.5 * (2.0 * node.phase - 1.0)) as f32);
                node.phase = (node.phase + step).fract();
            }
            Ok(block)
        }
    );
    create_node!(
        Writer: (),
        [out: BufWriter<File>, blocks: usize],
        [recv: Vec<f32>],
        |node: &mut Writer, x: Vec<f32>| -> Result<(), NodeError> {
            for s in x {
                node.out
                    .write_f32::<LittleEndian>(s)
                    .map_err(|_| NodeError::CommError)?;
            }
            node.blocks += 1;
            Ok(())
        }
    );

    let mut saw = Saw::new(0.0, 110.0);
    let mut vcf = ssm2044_node_with_settings::<f32>(
        SAMPLE_RATE,
        FilterSettings {
            cutoff: 80.0,
            resonance: 3.3,
            gain: 1.0,
        },
    )
    .unwrap();
    let controls = vcf.controls();
    let file = File::create(&path).unwrap();
    let mut writer = Writer::new(BufWriter::new(file), 0);

    connect_nodes!(saw, vcf, input);
    connect_nodes!(vcf, writer, recv);
    start_nodes!(saw, vcf);

    // The main thread plays the control side: one cutoff update per block,
    // exponential up then down.
    let now = Instant::now();
    while writer.blocks < total_blocks {
        let t = writer.blocks as f64 / total_blocks as f64;
        let tri = 1.0 - (2.0 * t - 1.0).abs();
        controls.set_held(Param::Cutoff, 80.0 * 100.0_f64.powf(tri));
        writer.call().unwrap();
    }
    writer.out.flush().unwrap();
    info!(
        "wrote {} samples to {} in {:?}",
        total_blocks * BLOCK,
        path,
        now.elapsed()
    );
}
