use thiserror::Error;

/// Violated preconditions of a clustering or classification call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("no feature rows were given")]
    EmptyInput,
    #[error("feature rows have zero dimensions")]
    ZeroDimensions,
    #[error("feature row {row} has {found} dimensions, expected {expected}")]
    RowLengthMismatch { row: usize, expected: usize, found: usize },
    #[error("feature row {row} has a non-finite value in column {column}")]
    NonFinite { row: usize, column: usize },
    #[error("at least one cluster has to be requested")]
    NoClusters,
    #[error("requested {requested} clusters from only {rows} feature rows")]
    TooManyClusters { requested: usize, rows: usize },
    #[error("centroid list is empty")]
    NoCentroids,
    #[error("row has {found} dimensions, but centroids have {expected}")]
    CentroidLengthMismatch { expected: usize, found: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
