//! Signal selection — which of the five series is displayed and exported.

use std::str::FromStr;

/// The signal currently rendered and exported.
///
/// Selection changes independently of window advancement: a batch carries all
/// five series, so switching never needs a new fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalKind {
    /// First base sinusoid.
    #[default]
    X1,
    /// Second base sinusoid.
    X2,
    /// y1 = x1 + x2.
    Sum,
    /// y2 = x1 - x2.
    Diff,
    /// y3 = x1 * x2.
    Product,
}

impl SignalKind {
    /// All selections, in display order.
    pub const ALL: [SignalKind; 5] = [
        SignalKind::X1,
        SignalKind::X2,
        SignalKind::Sum,
        SignalKind::Diff,
        SignalKind::Product,
    ];

    /// Column name on the wire (`x1`, `x2`, `y1`, `y2`, `y3`).
    pub fn column(&self) -> &'static str {
        match self {
            SignalKind::X1 => "x1",
            SignalKind::X2 => "x2",
            SignalKind::Sum => "y1",
            SignalKind::Diff => "y2",
            SignalKind::Product => "y3",
        }
    }

    /// Human-readable label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::X1 => "x1(t)",
            SignalKind::X2 => "x2(t)",
            SignalKind::Sum => "y1(t) = x1 + x2",
            SignalKind::Diff => "y2(t) = x1 - x2",
            SignalKind::Product => "y3(t) = x1 * x2",
        }
    }

    /// Columns written on export, in order.
    ///
    /// Base signals export alone with the time column; derived signals also
    /// carry the two contributing base series.
    pub fn export_columns(&self) -> &'static [&'static str] {
        match self {
            SignalKind::X1 => &["t", "x1"],
            SignalKind::X2 => &["t", "x2"],
            SignalKind::Sum => &["t", "x1", "x2", "y1"],
            SignalKind::Diff => &["t", "x1", "x2", "y2"],
            SignalKind::Product => &["t", "x1", "x2", "y3"],
        }
    }

    /// Stem of the default export filename.
    pub fn file_stem(&self) -> &'static str {
        match self {
            SignalKind::X1 => "x1",
            SignalKind::X2 => "x2",
            SignalKind::Sum => "y1_x1_plus_x2",
            SignalKind::Diff => "y2_x1_minus_x2",
            SignalKind::Product => "y3_x1_times_x2",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    /// Parse a wire column name. Accepts `x1|x2|y1|y2|y3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x1" => Ok(SignalKind::X1),
            "x2" => Ok(SignalKind::X2),
            "y1" => Ok(SignalKind::Sum),
            "y2" => Ok(SignalKind::Diff),
            "y3" => Ok(SignalKind::Product),
            other => Err(format!(
                "unknown signal {other:?} (expected x1, x2, y1, y2 or y3)"
            )),
        }
    }
}
