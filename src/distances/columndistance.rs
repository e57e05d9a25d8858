use crate::{DistanceFunction, Primitive};
use std::sync::Arc;

/// Indices of the feature columns that take part in a distance calculation.
///
/// Feature rows often contain columns that never differ between classes. These are
/// determined upstream (e.g. stored as a per-column active flag next to a model's centroids)
/// and only the remaining columns are compared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelevantColumns(Arc<[usize]>);

impl RelevantColumns {
    pub fn new(columns: Vec<usize>) -> Self {
        Self(columns.into())
    }

    /// Every column of a row with `dims` dimensions.
    pub fn all(dims: usize) -> Self {
        Self::new((0..dims).collect())
    }

    /// Columns whose flag is set.
    pub fn from_flags(flags: &[bool]) -> Self {
        Self::new(flags.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().cloned()
    }

    /// Averages `f(row[i], centroid[i])` over all relevant columns present in both rows.
    /// Columns beyond the shorter row are skipped. Without any compared column, the result is zero.
    #[inline(always)]
    fn mean_of<T: Primitive>(&self, a: &[T], b: &[T], f: impl Fn(T, T) -> T) -> T {
        let dims = a.len().min(b.len());
        let (total, cnt) = self.iter()
            .filter(|&i| i < dims)
            .fold((T::zero(), 0usize), |(total, cnt), i| (total + f(a[i], b[i]), cnt + 1));
        match cnt {
            0 => T::zero(),
            cnt => total / T::from(cnt).unwrap(),
        }
    }
}

/// Average absolute difference over the relevant columns.
#[derive(Clone, Debug)]
pub struct MeanAbsoluteDistance {
    columns: RelevantColumns,
}

impl MeanAbsoluteDistance {
    pub fn new(columns: RelevantColumns) -> Self {
        Self { columns }
    }
}

impl<T: Primitive> DistanceFunction<T> for MeanAbsoluteDistance {
    fn distance(&self, a: &[T], b: &[T]) -> T {
        self.columns.mean_of(a, b, |x, y| (x - y).abs())
    }
}

/// Root of the mean squared difference over the relevant columns.
#[derive(Clone, Debug)]
pub struct RootMeanSquareDistance {
    columns: RelevantColumns,
}

impl RootMeanSquareDistance {
    pub fn new(columns: RelevantColumns) -> Self {
        Self { columns }
    }
}

impl<T: Primitive> DistanceFunction<T> for RootMeanSquareDistance {
    fn distance(&self, a: &[T], b: &[T]) -> T {
        self.columns.mean_of(a, b, |x, y| (x - y) * (x - y)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevant_columns_from_flags() {
        let columns = RelevantColumns::from_flags(&[false, true, true, false, true]);
        assert_eq!(columns.iter().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(RelevantColumns::all(3), RelevantColumns::new(vec![0, 1, 2]));
        assert!(RelevantColumns::from_flags(&[false, false]).is_empty());
    }

    #[test]
    fn mean_absolute_ignores_inactive_columns() {
        let dist = MeanAbsoluteDistance::new(RelevantColumns::new(vec![0, 2]));
        let (a, b): (&[f64], &[f64]) = (&[1.0, 1000.0, 4.0], &[3.0, -1000.0, 0.0]);
        assert_eq!(dist.distance(a, b), 3.0);
    }

    #[test]
    fn root_mean_square_over_all_columns() {
        let dist = RootMeanSquareDistance::new(RelevantColumns::all(2));
        let (a, b): (&[f32], &[f32]) = (&[0.0, 0.0], &[3.0, 5.0]);
        assert_approx_eq!(dist.distance(a, b), 17.0f32.sqrt(), 1e-6);
    }

    #[test]
    fn no_relevant_columns_means_no_distance() {
        let dist = MeanAbsoluteDistance::new(RelevantColumns::new(vec![]));
        let (a, b): (&[f64], &[f64]) = (&[1.0], &[2.0]);
        assert_eq!(dist.distance(a, b), 0.0);
        assert_eq!(RootMeanSquareDistance::new(RelevantColumns::new(vec![])).distance(a, b), 0.0);
    }

    #[test]
    fn columns_beyond_the_rows_are_skipped() {
        let dist = MeanAbsoluteDistance::new(RelevantColumns::from_flags(&[true, true, true]));
        let (a, b): (&[f64], &[f64]) = (&[0.0, 1.0], &[2.0, 5.0]);
        assert_eq!(dist.distance(a, b), 3.0);
        let dist = RootMeanSquareDistance::new(RelevantColumns::new(vec![7, 9]));
        assert_eq!(dist.distance(a, b), 0.0);
    }
}
