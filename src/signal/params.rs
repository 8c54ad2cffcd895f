//! Synthesis parameters — the user-editable wave settings and the wire request.
//!
//! [`WaveParams`] is what the user edits (amplitudes, frequencies, phases,
//! sample count). A fresh [`SweepParams`] is built from it on every tick by
//! folding in the current window bounds; nothing is memoized between ticks.

use serde::{Deserialize, Serialize};

/// Smallest sample count the service will compute. Requests are clamped up
/// to this client-side before they are sent.
pub const MIN_SAMPLES: usize = 50;

/// A parameter failed client-side validation; no request is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamsError {
    /// Name of the offending field (e.g. `"f1"`).
    pub field: &'static str,
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parameter {} is not a finite number", self.field)
    }
}

impl std::error::Error for ParamsError {}

/// User-editable synthesis settings for the two channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    /// Amplitude of x1 (unit-less).
    pub a1: f64,
    /// Amplitude of x2 (unit-less).
    pub a2: f64,
    /// Frequency of x1 in Hz.
    pub f1: f64,
    /// Frequency of x2 in Hz.
    pub f2: f64,
    /// Phase of x1 in radians.
    pub phi1: f64,
    /// Phase of x2 in radians.
    pub phi2: f64,
    /// Requested points per batch; clamped up to [`MIN_SAMPLES`].
    pub samples: usize,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            a1: 1.0,
            a2: 0.5,
            f1: 1.0,
            f2: 2.0,
            phi1: 0.0,
            phi2: 0.0,
            samples: 200,
        }
    }
}

impl WaveParams {
    /// Check that every real-valued field is finite.
    ///
    /// NaN or infinite values never reach the wire; they are reported before
    /// any fetch is attempted.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let fields = [
            (self.a1, "a1"),
            (self.a2, "a2"),
            (self.f1, "f1"),
            (self.f2, "f2"),
            (self.phi1, "phi1"),
            (self.phi2, "phi2"),
        ];
        for (value, field) in fields {
            if !value.is_finite() {
                return Err(ParamsError { field });
            }
        }
        Ok(())
    }

    /// Build the wire request for the window `[t_start, t_end]`.
    ///
    /// The sample count is clamped up to [`MIN_SAMPLES`] here, so a too-small
    /// form value deterministically becomes a valid request.
    pub fn sweep(&self, t_start: f64, t_end: f64) -> SweepParams {
        SweepParams {
            a1: self.a1,
            a2: self.a2,
            f1: self.f1,
            f2: self.f2,
            phi1: self.phi1,
            phi2: self.phi2,
            t_start,
            t_end,
            samples: self.samples.max(MIN_SAMPLES),
        }
    }
}

/// One complete synthesis request: wave settings plus window bounds.
///
/// Field names are the wire contract; the JSON body of a service request
/// serializes exactly these keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    pub a1: f64,
    pub a2: f64,
    pub f1: f64,
    pub f2: f64,
    pub phi1: f64,
    pub phi2: f64,
    /// Window start in seconds; must not exceed `t_end`.
    pub t_start: f64,
    /// Window end in seconds.
    pub t_end: f64,
    /// Number of evenly spaced points over `[t_start, t_end]`.
    pub samples: usize,
}
