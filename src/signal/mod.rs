//! Signal domain — synthesis parameters, sample batches, and the waveform math.
//!
//! The service evaluates [`synth::synthesize`] over a [`SweepParams`] request;
//! the client decodes the resulting CSV into a [`SampleBatch`]. Both sides
//! share these types, which *is* the wire contract.

pub mod batch;
pub mod kind;
pub mod params;
pub mod synth;

pub use batch::{BatchError, SampleBatch, COLUMNS};
pub use kind::SignalKind;
pub use params::{ParamsError, SweepParams, WaveParams, MIN_SAMPLES};
pub use synth::synthesize;
