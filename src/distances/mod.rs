use crate::Primitive;

mod euclideandistance;
mod histogramdistance;
mod columndistance;

pub use euclideandistance::{EuclideanDistance, SquaredEuclideanDistance};
pub use histogramdistance::HistogramDistance;
pub use columndistance::{RelevantColumns, MeanAbsoluteDistance, RootMeanSquareDistance};

/// Metric used to compare a feature row against a centroid.
///
/// Implementations have to be pure and return a non-negative value. Both slices always have
/// the same length. Any `Fn(&[T], &[T]) -> T` closure can be used as a distance function:
///
/// ```rust
/// use cluster::*;
///
/// let engine = ClusterEngine::<f64>::with_distance(|row: &[f64], centroid: &[f64]| {
///     row.iter().zip(centroid).map(|(r, c)| (r - c).abs()).fold(0.0, f64::max)
/// });
/// assert!(engine.is_configured());
/// ```
pub trait DistanceFunction<T: Primitive>: Send + Sync {
    fn distance(&self, row: &[T], centroid: &[T]) -> T;
}

impl<T, F> DistanceFunction<T> for F
where
    T: Primitive,
    F: Fn(&[T], &[T]) -> T + Send + Sync,
{
    #[inline(always)]
    fn distance(&self, row: &[T], centroid: &[T]) -> T {
        self(row, centroid)
    }
}

/// Placeholder metric of an unconfigured [`ClusterEngine`](crate::ClusterEngine).
///
/// Every row is equidistant to every centroid, so clustering with it degenerates to an
/// arbitrary grouping. It only exists so that an engine is usable before a real metric is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroDistance;

impl<T: Primitive> DistanceFunction<T> for ZeroDistance {
    #[inline(always)]
    fn distance(&self, _: &[T], _: &[T]) -> T {
        T::zero()
    }
}
