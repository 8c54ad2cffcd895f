//! Sliding window state — the `[t_start, t_end]` interval currently swept.
//!
//! The window has a fixed width. Each successful tick advances `t_end` by a
//! small step, far smaller than the width, so consecutive windows overlap
//! heavily; that overlap is what makes the display scroll smoothly instead
//! of jumping between disjoint frames.

/// Sliding time window with fixed duration and advance step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepWindow {
    duration: f64,
    step: f64,
    t_end: f64,
}

impl SweepWindow {
    /// Create a window of the given width. A fresh window ends at
    /// `duration`, so the first sweep covers `[0, duration]`.
    pub fn new(duration: f64, step: f64) -> Self {
        Self {
            duration,
            step,
            t_end: duration,
        }
    }

    /// Window start: `max(0, t_end - duration)`.
    pub fn start(&self) -> f64 {
        (self.t_end - self.duration).max(0.0)
    }

    /// Window end.
    pub fn end(&self) -> f64 {
        self.t_end
    }

    /// Fixed window width in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Advance step in seconds.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Move the window forward by one step.
    ///
    /// Called after a successful fetch only; a failed tick leaves the
    /// window exactly where it was.
    pub fn advance(&mut self) {
        self.t_end += self.step;
    }

    /// Re-zero the window so the next sweep covers `[0, duration]` again.
    pub fn reset(&mut self) {
        self.t_end = self.duration;
    }
}
