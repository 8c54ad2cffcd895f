//! Waveform synthesis — evenly spaced sampling and sinusoid evaluation.
//!
//! Everything here is a pure function of its inputs: the service applies
//! these to a [`SweepParams`] and the result is fully determined by the
//! request, so identical requests produce identical batches.

use std::f64::consts::PI;

use super::batch::SampleBatch;
use super::params::SweepParams;

/// Sample `count` points evenly over the closed interval `[t_start, t_end]`.
///
/// Both endpoints are included; the step is `(t_end - t_start) / (count - 1)`.
/// A single-point request collapses to `[t_start]`.
pub fn time_vector(t_start: f64, t_end: f64, count: usize) -> Vec<f64> {
    let dt = if count > 1 {
        (t_end - t_start) / (count as f64 - 1.0)
    } else {
        0.0
    };
    (0..count).map(|i| t_start + i as f64 * dt).collect()
}

/// Evaluate `a * sin(2π f t + phi)` at each time point.
pub fn sinusoid(t: &[f64], amplitude: f64, frequency: f64, phase: f64) -> Vec<f64> {
    t.iter()
        .map(|&time| amplitude * (2.0 * PI * frequency * time + phase).sin())
        .collect()
}

/// Elementwise sum of two equal-length series.
pub fn sum_series(x1: &[f64], x2: &[f64]) -> Vec<f64> {
    x1.iter().zip(x2).map(|(&a, &b)| a + b).collect()
}

/// Elementwise difference `x1 - x2`.
pub fn diff_series(x1: &[f64], x2: &[f64]) -> Vec<f64> {
    x1.iter().zip(x2).map(|(&a, &b)| a - b).collect()
}

/// Elementwise product of two equal-length series.
pub fn product_series(x1: &[f64], x2: &[f64]) -> Vec<f64> {
    x1.iter().zip(x2).map(|(&a, &b)| a * b).collect()
}

/// Compute the full batch for one request: time vector, both base
/// sinusoids, and the three combinations.
pub fn synthesize(params: &SweepParams) -> SampleBatch {
    let t = time_vector(params.t_start, params.t_end, params.samples);
    let x1 = sinusoid(&t, params.a1, params.f1, params.phi1);
    let x2 = sinusoid(&t, params.a2, params.f2, params.phi2);
    let y1 = sum_series(&x1, &x2);
    let y2 = diff_series(&x1, &x2);
    let y3 = product_series(&x1, &x2);
    SampleBatch {
        t,
        x1,
        x2,
        y1,
        y2,
        y3,
    }
}
