use crate::{DistanceFunction, Primitive};

/// Straight-line distance between row and centroid.
#[derive(Clone, Copy, Debug, Default)]
pub struct EuclideanDistance;

impl<T: Primitive> DistanceFunction<T> for EuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        SquaredEuclideanDistance.distance(a, b).sqrt()
    }
}

/// Sum of squared coordinate differences. Ranks centroids exactly like [`EuclideanDistance`],
/// but the average distance of a result is then a mean squared error.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredEuclideanDistance;

impl<T: Primitive> DistanceFunction<T> for SquaredEuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        a.iter()
            .zip(b.iter())
            .map(|(&sp, &cp)| sp - cp)  // <sample> - <centroid>
            .map(|v| v * v)             // <vec_components> ^2
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn euclidean_f32() { euclidean::<f32>(); }
    #[test] fn euclidean_f64() { euclidean::<f64>(); }

    fn euclidean<T: Primitive>() {
        let a: &[T] = &[T::zero(), T::zero()];
        let b: &[T] = &[T::from(3.0).unwrap(), T::from(4.0).unwrap()];
        assert_eq!(EuclideanDistance.distance(a, b), T::from(5.0).unwrap());
        assert_eq!(SquaredEuclideanDistance.distance(a, b), T::from(25.0).unwrap());
        assert_eq!(EuclideanDistance.distance(b, b), T::zero());
    }
}
