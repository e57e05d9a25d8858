use crate::{DistanceFunction, Primitive};

/// Compares rows as histograms: sums the absolute difference between the running
/// cumulative sums of both rows (earth mover's distance for equally-spaced bins).
#[derive(Clone, Copy, Debug, Default)]
pub struct HistogramDistance;

impl<T: Primitive> DistanceFunction<T> for HistogramDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        let mut total = T::zero();
        let mut cdf_a = T::zero();
        let mut cdf_b = T::zero();
        for (x, y) in a.iter().zip(b.iter()) {
            cdf_a += x;
            cdf_b += y;
            total += (cdf_a - cdf_b).abs();
        }
        total
    }
}
