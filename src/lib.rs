use csv::ReaderBuilder;
use ndarray::Array2;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod disjoint_sets;
pub mod linkage;

pub use disjoint_sets::DisjointSets;
pub use linkage::{single_linkage, Clustering};

/// Everything that can go wrong between loading a point file and reporting
/// the final clusters.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("invalid cluster count {k}: must be between 1 and {n}")]
    InvalidClusterCount { k: usize, n: usize },

    #[error("no data points were loaded")]
    EmptyInput,

    #[error("row {row} has {found} attributes but the first row has {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: cannot parse {token:?} as a number")]
    InvalidNumber {
        row: usize,
        column: usize,
        token: String,
    },

    /// The merge queue ran dry before enough clusters were merged. The
    /// all-pairs generator makes this unreachable for any non-empty input,
    /// so hitting it means a logic defect, not bad data.
    #[error("candidate pair queue exhausted with {remaining} clusters left, target was {target}")]
    PairQueueExhausted { remaining: usize, target: usize },

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// A set of points loaded from a TSV file, one point per row.
///
/// Every row holds the same number of attributes; the loader rejects input
/// where that does not hold, and `Array2` keeps it true afterwards.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub data: Array2<f32>,
}

impl DataSet {
    /// Read a headerless TSV file into a DataSet.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self, ClusterError> {
        let file = File::open(path.as_ref()).map_err(|source| ClusterError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Read tab-separated point rows from any reader.
    ///
    /// Blank lines are skipped. The first row fixes the attribute count;
    /// rows of any other length and tokens that are not numbers are
    /// rejected outright rather than padded or patched.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ClusterError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut flat: Vec<f32> = Vec::new();
        let mut nrows = 0;
        let mut ncols = 0;

        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            if i == 0 {
                ncols = record.len();
            } else if record.len() != ncols {
                return Err(ClusterError::RowLengthMismatch {
                    row: i + 1,
                    expected: ncols,
                    found: record.len(),
                });
            }

            for (j, token) in record.iter().enumerate() {
                let value =
                    token
                        .trim()
                        .parse::<f32>()
                        .map_err(|_| ClusterError::InvalidNumber {
                            row: i + 1,
                            column: j + 1,
                            token: token.to_string(),
                        })?;
                flat.push(value);
            }
            nrows += 1;
        }

        if nrows == 0 {
            return Err(ClusterError::EmptyInput);
        }

        let data = Array2::from_shape_vec((nrows, ncols), flat)?;
        Ok(Self { data })
    }

    /// Number of points.
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of attributes per point.
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// Cluster the points down to exactly `k` clusters.
    pub fn single_linkage(&self, k: usize) -> Result<Clustering, ClusterError> {
        linkage::single_linkage(&self.data, k)
    }
}
