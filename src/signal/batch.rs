//! Sample batches — six aligned series and the CSV wire codec.
//!
//! The wire format is one header row `t,x1,x2,y1,y2,y3` followed by one row
//! per sample. Both the column names and their order are part of the service
//! contract; the decoder rejects anything else outright.

use serde::{Deserialize, Serialize};

use super::kind::SignalKind;

/// Wire column names, in order.
pub const COLUMNS: [&str; 6] = ["t", "x1", "x2", "y1", "y2", "y3"];

/// A decoded batch failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The header row did not match the contract.
    Header { found: String },
    /// A data row failed to parse.
    Row(String),
    /// The body carried a header but no samples.
    Empty,
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Header { found } => write!(
                f,
                "unexpected CSV header {found:?} (expected t,x1,x2,y1,y2,y3)"
            ),
            BatchError::Row(e) => write!(f, "malformed CSV row: {e}"),
            BatchError::Empty => write!(f, "CSV body contains no samples"),
        }
    }
}

impl std::error::Error for BatchError {}

/// One row on the wire. Field order defines the column order.
#[derive(Debug, Serialize, Deserialize)]
struct SampleRow {
    t: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
    y3: f64,
}

/// One fetched window of samples: the time column plus all five series.
///
/// All six vectors have the same length; decoding keeps them aligned by
/// construction (each parsed row contributes exactly one value per series).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBatch {
    pub t: Vec<f64>,
    pub x1: Vec<f64>,
    pub x2: Vec<f64>,
    pub y1: Vec<f64>,
    pub y2: Vec<f64>,
    pub y3: Vec<f64>,
}

impl SampleBatch {
    /// Number of samples per series.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// True when the batch holds no samples.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// The series selected by `kind`.
    pub fn series(&self, kind: SignalKind) -> &[f64] {
        match kind {
            SignalKind::X1 => &self.x1,
            SignalKind::X2 => &self.x2,
            SignalKind::Sum => &self.y1,
            SignalKind::Diff => &self.y2,
            SignalKind::Product => &self.y3,
        }
    }

    /// Look up a column by wire name, including `t`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            "t" => Some(&self.t),
            "x1" => Some(&self.x1),
            "x2" => Some(&self.x2),
            "y1" => Some(&self.y1),
            "y2" => Some(&self.y2),
            "y3" => Some(&self.y3),
            _ => None,
        }
    }

    /// Encode the batch as wire CSV.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        wtr.write_record(COLUMNS)?;
        for i in 0..self.len() {
            wtr.serialize(SampleRow {
                t: self.t[i],
                x1: self.x1[i],
                x2: self.x2[i],
                y1: self.y1[i],
                y2: self.y2[i],
                y3: self.y3[i],
            })?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decode wire CSV, enforcing the exact header contract.
    pub fn from_csv(text: &str) -> Result<Self, BatchError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| BatchError::Row(e.to_string()))?
            .clone();
        if headers.iter().ne(COLUMNS) {
            return Err(BatchError::Header {
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }

        let mut batch = SampleBatch::default();
        for row in rdr.deserialize::<SampleRow>() {
            let row = row.map_err(|e| BatchError::Row(e.to_string()))?;
            batch.t.push(row.t);
            batch.x1.push(row.x1);
            batch.x2.push(row.x2);
            batch.y1.push(row.y1);
            batch.y2.push(row.y2);
            batch.y3.push(row.y3);
        }
        if batch.is_empty() {
            return Err(BatchError::Empty);
        }
        Ok(batch)
    }
}
